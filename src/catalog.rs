// src/catalog.rs
//! Resolved catalog and the read-only views derived from it.

use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::Deref;

use crate::record::ContentRecord;
use crate::related;
use crate::remote::RemoteStatus;

/// Identity-unique, visibility-filtered records sorted by `published_at` desc.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<ContentRecord>,
    #[serde(skip)]
    remote: RemoteStatus,
}

impl Catalog {
    pub(crate) fn new(records: Vec<ContentRecord>, remote: RemoteStatus) -> Self {
        Self { records, remote }
    }

    /// Whether remote content took part in this resolution.
    pub fn remote_status(&self) -> RemoteStatus {
        self.remote
    }

    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ContentRecord> {
        self.records
    }

    /// First record flagged featured; the newest wins when several are.
    pub fn featured(&self) -> Option<&ContentRecord> {
        self.records.iter().find(|r| r.featured)
    }

    pub fn categories(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.category.clone()).collect()
    }

    pub fn by_slug(&self, slug: &str) -> Option<&ContentRecord> {
        self.records.iter().find(|r| r.slug == slug)
    }

    pub fn related(&self, slug: &str, limit: usize) -> Vec<&ContentRecord> {
        related::related(&self.records, slug, limit)
    }
}

impl Deref for Catalog {
    type Target = [ContentRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}
