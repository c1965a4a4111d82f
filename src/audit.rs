// src/audit.rs
//! Duplicate hero-image detection over the bundled dataset.
//!
//! Diagnostic only: findings are logged and exposed for review, they never
//! change what gets resolved or published.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use serde::Serialize;

use crate::record::ContentRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateAsset {
    pub asset_key: String,
    pub titles: Vec<String>,
}

// `None` only if the pattern fails to compile; keys then fall back to host + path.
static RE_PHOTO_ID: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\bphoto-[a-z0-9]+(?:-[a-z0-9]+)*").ok());

/// Stable identifier of the asset behind an image URL, ignoring size/format
/// query parameters. CDN-style `photo-<id>` identifiers are preferred;
/// otherwise host + path.
pub fn asset_key(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    let parsed = Url::parse(url).ok()?;
    if let Some(m) = RE_PHOTO_ID.as_ref().and_then(|re| re.find(parsed.path())) {
        return Some(m.as_str().to_ascii_lowercase());
    }

    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
    let path = parsed.path().trim_end_matches('/');
    if host.is_empty() && path.is_empty() {
        return None;
    }
    Some(format!("{host}{path}"))
}

/// Groups of records sharing one asset, in order of first appearance.
pub fn find_duplicate_assets(records: &[ContentRecord]) -> Vec<DuplicateAsset> {
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for r in records {
        match asset_key(&r.hero_image) {
            Some(key) => groups.entry(key).or_default().push(r.title.clone()),
            None => {
                if !r.hero_image.is_empty() {
                    tracing::debug!(target: "audit", slug = %r.slug, "hero image url not parseable; skipped");
                }
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, titles)| titles.len() > 1)
        .map(|(asset_key, titles)| DuplicateAsset { asset_key, titles })
        .collect()
}

/// Run the audit and log each finding at `warn`. Returns the findings.
pub fn report_duplicate_assets(records: &[ContentRecord]) -> Vec<DuplicateAsset> {
    let findings = find_duplicate_assets(records);
    metrics::gauge!("catalog_duplicate_assets").set(findings.len() as f64);
    for f in &findings {
        tracing::warn!(
            target: "audit",
            asset = %f.asset_key,
            titles = ?f.titles,
            "hero image reused across records"
        );
    }
    findings
}
