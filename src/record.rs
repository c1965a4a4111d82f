// src/record.rs
//! # Content Records
//!
//! The validated article type shared by the bundled dataset, the remote
//! content service and the presentation feed.
//!
//! Records arrive in a lenient wire shape ([`RawRecord`]): optional fields may
//! be missing, `status` may use any case, timestamps may be full RFC 3339 or a
//! bare date. [`ContentRecord::from_raw`] normalizes once at construction so the
//! rest of the engine never checks for absence.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Publication state. Only [`Status::Published`] is eligible for the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Published,
    Archived,
}

impl Status {
    /// Case-insensitive parse. Unknown values fall back to `Draft`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "published" => Status::Published,
            "archived" => Status::Archived,
            _ => Status::Draft,
        }
    }

    pub fn is_published(self) -> bool {
        self == Status::Published
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub category: String,
    pub tags: BTreeSet<String>,
    pub author: Author,
    pub published_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: Status,
    pub featured: bool,
    pub hero_image: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record has no slug")]
    MissingSlug,
    #[error("record `{0}` has no publishedAt")]
    MissingPublishedAt(String),
    #[error("record `{slug}` has an unparseable {field}: {value:?}")]
    BadTimestamp {
        slug: String,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuthor {
    pub name: Option<String>,
    pub role: Option<String>,
}

/// Wire shape accepted from the bundled dataset and the remote service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub author: Option<RawAuthor>,
    pub published_at: Option<String>,
    pub scheduled_at: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    pub hero_image: Option<String>,
}

impl ContentRecord {
    pub fn from_raw(raw: RawRecord) -> Result<Self, RecordError> {
        let slug = raw.slug.as_deref().unwrap_or_default().trim().to_string();
        if slug.is_empty() {
            return Err(RecordError::MissingSlug);
        }

        let published_raw = match raw.published_at.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return Err(RecordError::MissingPublishedAt(slug)),
        };
        let published_at = parse_timestamp(&published_raw).ok_or_else(|| {
            RecordError::BadTimestamp {
                slug: slug.clone(),
                field: "publishedAt",
                value: published_raw.clone(),
            }
        })?;

        // Blank scheduledAt is treated as absent rather than malformed.
        let scheduled_at = match raw.scheduled_at.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => {
                Some(parse_timestamp(s).ok_or_else(|| RecordError::BadTimestamp {
                    slug: slug.clone(),
                    field: "scheduledAt",
                    value: s.to_string(),
                })?)
            }
            _ => None,
        };

        let tags = raw
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let author = raw.author.unwrap_or_default();

        Ok(Self {
            slug,
            title: raw.title.unwrap_or_default().trim().to_string(),
            excerpt: raw.excerpt.unwrap_or_default(),
            body: raw.body.unwrap_or_default(),
            category: raw.category.unwrap_or_default().trim().to_string(),
            tags,
            author: Author {
                name: author.name.unwrap_or_default().trim().to_string(),
                role: author.role.unwrap_or_default().trim().to_string(),
            },
            published_at,
            scheduled_at,
            status: raw.status.as_deref().map(Status::parse).unwrap_or_default(),
            featured: raw.featured.unwrap_or(false),
            hero_image: raw.hero_image.unwrap_or_default().trim().to_string(),
        })
    }

    /// Decode one JSON value through the lenient wire shape.
    pub fn from_json(value: serde_json::Value) -> anyhow::Result<Self> {
        let raw: RawRecord = serde_json::from_value(value)?;
        Ok(Self::from_raw(raw)?)
    }

    /// True when `scheduled_at` is present and strictly later than `now`.
    pub fn is_scheduled_after(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_at.is_some_and(|at| at > now)
    }

    /// Case-insensitive tag overlap.
    pub fn shares_tag_with(&self, other: &ContentRecord) -> bool {
        self.tags
            .iter()
            .any(|t| other.tags.iter().any(|o| o.eq_ignore_ascii_case(t)))
    }
}

/// RFC 3339 first, then a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
