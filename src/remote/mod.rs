// src/remote/mod.rs
//! Remote content service boundary.
//!
//! A [`RemoteSource`] returns typed errors; [`fetch_remote`] is the only
//! caller-facing entry and never fails. It logs and counts the outcome, then
//! hands back a [`RemoteFetch`] that degrades to an empty list.

pub mod http;

use async_trait::async_trait;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::record::ContentRecord;

pub use http::HttpRemoteSource;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("remote returned HTTP {0}")]
    Status(u16),
    #[error("remote body is not a JSON object: {0}")]
    Body(String),
    #[error("remote reported success=false")]
    Rejected,
    #[error("remote payload has unexpected shape: {0}")]
    Shape(&'static str),
}

impl RemoteError {
    /// Short label used for the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteError::Network(_) => "network",
            RemoteError::Status(_) => "status",
            RemoteError::Body(_) => "body",
            RemoteError::Rejected => "rejected",
            RemoteError::Shape(_) => "shape",
        }
    }
}

#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Exactly one request, no retry.
    async fn fetch(&self) -> Result<Vec<ContentRecord>, RemoteError>;

    fn name(&self) -> &'static str;

    /// A source with no configured endpoint reports `false` and is never called.
    fn enabled(&self) -> bool {
        true
    }
}

/// Stand-in used when no base address is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRemote;

#[async_trait]
impl RemoteSource for DisabledRemote {
    async fn fetch(&self) -> Result<Vec<ContentRecord>, RemoteError> {
        Ok(Vec::new())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }

    fn enabled(&self) -> bool {
        false
    }
}

/// Outcome of one best-effort remote call.
#[derive(Debug)]
pub enum RemoteFetch {
    Fetched(Vec<ContentRecord>),
    Unavailable(RemoteError),
    Disabled,
}

/// Copyable summary of a [`RemoteFetch`], carried alongside a resolved catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    Fetched { records: usize },
    Unavailable,
    Disabled,
}

impl RemoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteStatus::Fetched { .. } => "fetched",
            RemoteStatus::Unavailable => "unavailable",
            RemoteStatus::Disabled => "disabled",
        }
    }
}

impl RemoteFetch {
    pub fn status(&self) -> RemoteStatus {
        match self {
            RemoteFetch::Fetched(v) => RemoteStatus::Fetched { records: v.len() },
            RemoteFetch::Unavailable(_) => RemoteStatus::Unavailable,
            RemoteFetch::Disabled => RemoteStatus::Disabled,
        }
    }

    /// Degrade-to-empty view: anything but `Fetched` yields no records.
    pub fn into_records(self) -> Vec<ContentRecord> {
        match self {
            RemoteFetch::Fetched(v) => v,
            RemoteFetch::Unavailable(_) | RemoteFetch::Disabled => Vec::new(),
        }
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "catalog_remote_fetch_total",
            "Remote content fetches by outcome."
        );
        describe_counter!(
            "catalog_remote_records_total",
            "Records received from the remote content service."
        );
        describe_histogram!(
            "catalog_remote_fetch_ms",
            "Remote content fetch time in milliseconds."
        );
    });
}

/// Call the remote once. Never fails; see [`RemoteFetch::into_records`].
pub async fn fetch_remote(source: &dyn RemoteSource) -> RemoteFetch {
    ensure_metrics_described();

    if !source.enabled() {
        counter!("catalog_remote_fetch_total", "outcome" => "disabled").increment(1);
        tracing::debug!(target: "remote", "no remote endpoint configured; bundled only");
        return RemoteFetch::Disabled;
    }

    let t0 = std::time::Instant::now();
    let res = source.fetch().await;
    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("catalog_remote_fetch_ms").record(ms);

    match res {
        Ok(records) => {
            counter!("catalog_remote_fetch_total", "outcome" => "ok").increment(1);
            counter!("catalog_remote_records_total").increment(records.len() as u64);
            tracing::debug!(
                target: "remote",
                provider = source.name(),
                records = records.len(),
                ms,
                "remote content fetched"
            );
            RemoteFetch::Fetched(records)
        }
        Err(e) => {
            counter!("catalog_remote_fetch_total", "outcome" => e.kind()).increment(1);
            tracing::warn!(
                target: "remote",
                provider = source.name(),
                error = %e,
                "remote content unavailable; serving bundled only"
            );
            RemoteFetch::Unavailable(e)
        }
    }
}
