//! Content Catalog Service — Binary Entrypoint
//! Boots the Axum feed: configuration, bundled dataset, asset audit, metrics.

use anyhow::Context;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use content_catalog::{metrics::Metrics, CatalogConfig};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - CATALOG_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("CATALOG_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog=debug,remote=debug,audit=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = CatalogConfig::load_default().context("loading catalog config")?;
    let metrics = Metrics::init()?;
    let app = content_catalog::app(&cfg, &metrics).context("building content service")?;

    Ok(app.into())
}
