// src/engine.rs
//! # Content Engine
//! Caller-facing operations over the resolved catalog.
//!
//! Every async view re-resolves the catalog (one remote read, no memoization),
//! so two calls may observe different remote content. Callers that need
//! several views of the same snapshot should call [`ContentEngine::resolve_catalog`]
//! once and use the [`Catalog`] methods.

use anyhow::Result;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::audit::{self, DuplicateAsset};
use crate::bundled::BundledSource;
use crate::catalog::Catalog;
use crate::config::CatalogConfig;
use crate::record::ContentRecord;
use crate::remote::{fetch_remote, DisabledRemote, HttpRemoteSource, RemoteFetch, RemoteSource};
use crate::resolver::CatalogResolver;

#[derive(Clone)]
pub struct ContentEngine {
    resolver: CatalogResolver,
    related_limit: usize,
}

impl ContentEngine {
    pub fn new(bundled: BundledSource, remote: Arc<dyn RemoteSource>) -> Self {
        Self {
            resolver: CatalogResolver::new(bundled, remote),
            related_limit: crate::config::DEFAULT_RELATED_LIMIT,
        }
    }

    /// Bundled-only engine (remote disabled).
    pub fn bundled_only(bundled: BundledSource) -> Self {
        Self::new(bundled, Arc::new(DisabledRemote))
    }

    pub fn with_related_limit(mut self, limit: usize) -> Self {
        self.related_limit = limit.max(1);
        self
    }

    /// Wire bundled source and remote endpoint from configuration.
    pub fn from_config(cfg: &CatalogConfig) -> Result<Self> {
        let bundled = match &cfg.bundled_path {
            Some(p) => BundledSource::from_path(p)?,
            None => BundledSource::embedded()?,
        };
        let remote: Arc<dyn RemoteSource> = match HttpRemoteSource::from_config(&cfg.remote)? {
            Some(http) => {
                tracing::info!(target: "catalog", url = http.url(), "remote content source enabled");
                Arc::new(http)
            }
            None => {
                tracing::info!(target: "catalog", "remote content source disabled; bundled only");
                Arc::new(DisabledRemote)
            }
        };
        Ok(Self::new(bundled, remote).with_related_limit(cfg.related_limit))
    }

    pub fn resolver(&self) -> &CatalogResolver {
        &self.resolver
    }

    pub fn related_limit(&self) -> usize {
        self.related_limit
    }

    pub fn resolve_visible(&self) -> Vec<ContentRecord> {
        self.resolver.resolve_visible()
    }

    pub async fn resolve_catalog(&self) -> Catalog {
        self.resolver.resolve_catalog().await
    }

    pub async fn fetch_remote(&self) -> RemoteFetch {
        fetch_remote(self.resolver.remote()).await
    }

    pub async fn get_featured(&self) -> Option<ContentRecord> {
        self.resolve_catalog().await.featured().cloned()
    }

    pub async fn list_categories(&self) -> BTreeSet<String> {
        self.resolve_catalog().await.categories()
    }

    pub async fn get_by_slug(&self, slug: &str) -> Option<ContentRecord> {
        self.resolve_catalog().await.by_slug(slug).cloned()
    }

    pub async fn get_related(&self, slug: &str, limit: usize) -> Vec<ContentRecord> {
        let catalog = self.resolve_catalog().await;
        catalog.related(slug, limit).into_iter().cloned().collect()
    }

    pub async fn get_related_default(&self, slug: &str) -> Vec<ContentRecord> {
        self.get_related(slug, self.related_limit).await
    }

    /// Audits the bundled dataset only.
    pub fn find_duplicate_assets(&self) -> Vec<DuplicateAsset> {
        audit::find_duplicate_assets(self.resolver.bundled().records())
    }
}

impl std::fmt::Debug for ContentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentEngine")
            .field("resolver", &self.resolver)
            .field("related_limit", &self.related_limit)
            .finish()
    }
}
