// src/remote/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{RemoteError, RemoteSource};
use crate::config::RemoteConfig;
use crate::record::ContentRecord;

/// Remote content service over HTTP: one GET to `{base}{posts_path}`.
#[derive(Debug, Clone)]
pub struct HttpRemoteSource {
    url: String,
    client: Client,
}

impl HttpRemoteSource {
    /// `timeout` is a transport-level deadline; `None` leaves reqwest's default (none).
    pub fn new(base_url: &str, posts_path: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().context("building remote content http client")?;
        Ok(Self {
            url: join_url(base_url, posts_path),
            client,
        })
    }

    /// `Ok(None)` when no base address is configured.
    pub fn from_config(cfg: &RemoteConfig) -> Result<Option<Self>> {
        let Some(base) = cfg.base_url.as_deref().map(str::trim).filter(|b| !b.is_empty()) else {
            return Ok(None);
        };
        let timeout = cfg.timeout_secs.map(Duration::from_secs);
        Self::new(base, &cfg.posts_path, timeout).map(Some)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch(&self) -> Result<Vec<ContentRecord>, RemoteError> {
        let resp = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(RemoteError::Network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let body = resp.text().await.map_err(RemoteError::Network)?;
        parse_posts_payload(&body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let path = path.trim().trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

/// Decode `{ "success": bool, "posts": [...] }`.
///
/// Payload-level problems are errors; a single record that fails
/// normalization is skipped and the rest of the list is kept.
pub fn parse_posts_payload(body: &str) -> Result<Vec<ContentRecord>, RemoteError> {
    let value: Value =
        serde_json::from_str(body.trim()).map_err(|e| RemoteError::Body(e.to_string()))?;
    let Value::Object(mut obj) = value else {
        return Err(RemoteError::Body("expected a JSON object".to_string()));
    };

    if obj.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(RemoteError::Rejected);
    }

    let items = match obj.remove("posts") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(RemoteError::Shape("`posts` is not a list")),
        None => return Err(RemoteError::Shape("`posts` is missing")),
    };

    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match ContentRecord::from_json(item) {
            Ok(rec) => out.push(rec),
            Err(e) => {
                tracing::warn!(target: "remote", index = idx, error = ?e, "skipping malformed remote record");
            }
        }
    }
    Ok(out)
}
