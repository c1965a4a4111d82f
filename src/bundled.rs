// src/bundled.rs
//! Bundled dataset shipped inside the binary.
//!
//! Parsed once per process; every [`BundledSource`] handed out afterwards is a
//! cheap clone over the same immutable slice.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;

use crate::record::{ContentRecord, RawRecord};

const EMBEDDED_POSTS: &str = include_str!("../data/posts.json");

#[derive(Debug, Clone)]
pub struct BundledSource {
    records: Arc<[ContentRecord]>,
}

impl BundledSource {
    /// Wrap an explicit record list (synthetic datasets in tests, overrides).
    pub fn from_records(records: Vec<ContentRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// The dataset compiled into the binary, parsed on first use.
    pub fn embedded() -> Result<Self> {
        static EMBEDDED: OnceCell<BundledSource> = OnceCell::new();
        EMBEDDED
            .get_or_try_init(|| {
                Self::parse(EMBEDDED_POSTS).context("parsing embedded data/posts.json")
            })
            .cloned()
    }

    /// Load a dataset override from disk (same JSON array shape).
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading bundled dataset from {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a JSON array of records. A record that fails normalization fails
    /// the whole load: this is build-time data.
    pub fn parse(json: &str) -> Result<Self> {
        let raws: Vec<RawRecord> = serde_json::from_str(json)?;
        let mut records = Vec::with_capacity(raws.len());
        for (idx, raw) in raws.into_iter().enumerate() {
            let rec = ContentRecord::from_raw(raw)
                .with_context(|| format!("bundled record #{idx}"))?;
            records.push(rec);
        }
        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[ContentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn embedded_dataset_parses_with_unique_slugs() {
        let src = BundledSource::embedded().unwrap();
        assert!(!src.is_empty());
        let mut seen = HashSet::new();
        for r in src.records() {
            assert!(seen.insert(r.slug.as_str()), "duplicate slug {}", r.slug);
        }
    }

    #[test]
    fn embedded_is_shared_between_calls() {
        let a = BundledSource::embedded().unwrap();
        let b = BundledSource::embedded().unwrap();
        assert!(Arc::ptr_eq(&a.records, &b.records));
    }

    #[test]
    fn bad_record_fails_the_load() {
        let json = r#"[
            {"slug": "ok", "publishedAt": "2025-01-01"},
            {"slug": "", "publishedAt": "2025-01-01"}
        ]"#;
        let err = BundledSource::parse(json).unwrap_err();
        assert!(format!("{err:#}").contains("bundled record #1"));
    }

    #[test]
    fn override_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("posts.json");
        std::fs::write(&p, r#"[{"slug": "only", "publishedAt": "2025-05-05"}]"#).unwrap();
        let src = BundledSource::from_path(&p).unwrap();
        assert_eq!(src.len(), 1);
        assert_eq!(src.records()[0].slug, "only");
    }
}
