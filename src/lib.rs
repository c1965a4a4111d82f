// src/lib.rs
// Public library surface for the service binary and integration tests.

pub mod api;
pub mod audit;
pub mod bundled;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod record;
pub mod related;
pub mod remote;
pub mod resolver;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::bundled::BundledSource;
pub use crate::catalog::Catalog;
pub use crate::config::CatalogConfig;
pub use crate::engine::ContentEngine;
pub use crate::record::{Author, ContentRecord, Status};
pub use crate::remote::{RemoteFetch, RemoteSource, RemoteStatus};

use axum::Router;
use tracing::info;

use crate::metrics::Metrics;

/// Service wiring shared by the binary and tests: engine from `cfg`, startup
/// asset audit, feed routes plus `/metrics`.
///
/// `metrics` must already hold the installed recorder.
pub fn app(cfg: &CatalogConfig, metrics: &Metrics) -> anyhow::Result<Router> {
    let engine = ContentEngine::from_config(cfg)?;
    let bundled = engine.resolver().bundled();
    metrics.record_bundled(bundled.len());

    // Diagnostic only; findings never block startup.
    let findings = audit::report_duplicate_assets(bundled.records());
    info!(
        target: "catalog",
        bundled = bundled.len(),
        duplicates = findings.len(),
        related_limit = engine.related_limit(),
        "content engine ready"
    );

    Ok(router(AppState::new(engine)).merge(metrics.router()))
}
