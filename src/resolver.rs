// src/resolver.rs
//! # Catalog Resolver
//!
//! Merges the bundled dataset with remote content into one catalog.
//!
//! - Bundled records are visible when `published` and not scheduled in the future.
//! - Remote records only need to be `published`; they skip the schedule gate.
//! - On a slug collision the remote record replaces the bundled one in place.
//! - The result is stably sorted by `published_at`, newest first.
//!
//! Nothing is cached: every call re-reads the remote once and recomputes.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use metrics::{describe_gauge, gauge};
use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::bundled::BundledSource;
use crate::catalog::Catalog;
use crate::record::ContentRecord;
use crate::remote::{fetch_remote, RemoteSource};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_gauge!(
            "catalog_resolved_records",
            "Records in the most recently resolved catalog."
        );
    });
}

/// Bundled records eligible at `now`, newest first. No deduplication.
///
/// Sorted the same way as [`merge`] so a bundled-only catalog matches this
/// view exactly.
pub fn visible_at(records: &[ContentRecord], now: DateTime<Utc>) -> Vec<ContentRecord> {
    let mut out: Vec<ContentRecord> = records
        .iter()
        .filter(|r| r.status.is_published() && !r.is_scheduled_after(now))
        .cloned()
        .collect();
    sort_newest_first(&mut out);
    out
}

/// Stable: equal timestamps keep their relative order.
fn sort_newest_first(records: &mut [ContentRecord]) {
    records.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Seed with `visible`, overwrite with published `remote` records, sort.
pub fn merge(visible: Vec<ContentRecord>, remote: Vec<ContentRecord>) -> Vec<ContentRecord> {
    let mut by_slug: IndexMap<String, ContentRecord> = IndexMap::with_capacity(visible.len() + remote.len());
    for rec in visible {
        by_slug.insert(rec.slug.clone(), rec);
    }
    for rec in remote.into_iter().filter(|r| r.status.is_published()) {
        // IndexMap keeps the original position on overwrite.
        by_slug.insert(rec.slug.clone(), rec);
    }

    let mut out: Vec<ContentRecord> = by_slug.into_values().collect();
    sort_newest_first(&mut out);
    out
}

#[derive(Clone)]
pub struct CatalogResolver {
    bundled: BundledSource,
    remote: Arc<dyn RemoteSource>,
}

impl CatalogResolver {
    pub fn new(bundled: BundledSource, remote: Arc<dyn RemoteSource>) -> Self {
        Self { bundled, remote }
    }

    pub fn bundled(&self) -> &BundledSource {
        &self.bundled
    }

    pub fn remote(&self) -> &dyn RemoteSource {
        self.remote.as_ref()
    }

    pub fn resolve_visible(&self) -> Vec<ContentRecord> {
        self.resolve_visible_at(Utc::now())
    }

    pub fn resolve_visible_at(&self, now: DateTime<Utc>) -> Vec<ContentRecord> {
        visible_at(self.bundled.records(), now)
    }

    pub async fn resolve_catalog(&self) -> Catalog {
        self.resolve_catalog_at(Utc::now()).await
    }

    pub async fn resolve_catalog_at(&self, now: DateTime<Utc>) -> Catalog {
        ensure_metrics_described();

        let fetched = fetch_remote(self.remote.as_ref()).await;
        let status = fetched.status();
        let remote = fetched.into_records();
        let remote_len = remote.len();

        let visible = self.resolve_visible_at(now);
        let bundled_len = visible.len();
        let records = merge(visible, remote);

        gauge!("catalog_resolved_records").set(records.len() as f64);
        tracing::debug!(
            target: "catalog",
            bundled = bundled_len,
            remote = remote_len,
            resolved = records.len(),
            remote_status = status.as_str(),
            "catalog resolved"
        );

        Catalog::new(records, status)
    }
}

impl std::fmt::Debug for CatalogResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogResolver")
            .field("bundled", &self.bundled.len())
            .field("remote", &self.remote.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Author, Status};
    use chrono::{Duration, TimeZone};

    fn rec(slug: &str, published: DateTime<Utc>, status: Status) -> ContentRecord {
        ContentRecord {
            slug: slug.into(),
            title: slug.into(),
            excerpt: String::new(),
            body: String::new(),
            category: "general".into(),
            tags: Default::default(),
            author: Author::default(),
            published_at: published,
            scheduled_at: None,
            status,
            featured: false,
            hero_image: String::new(),
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn only_published_and_not_future_scheduled() {
        let now = day(10);
        let mut scheduled = rec("later", day(1), Status::Published);
        scheduled.scheduled_at = Some(now + Duration::days(1));
        let mut due = rec("due", day(1), Status::Published);
        due.scheduled_at = Some(now);
        let records = vec![
            rec("pub", day(2), Status::Published),
            rec("draft", day(3), Status::Draft),
            rec("old", day(4), Status::Archived),
            scheduled,
            due,
        ];
        let out: Vec<_> = visible_at(&records, now).into_iter().map(|r| r.slug).collect();
        assert_eq!(out, vec!["pub", "due"]);
    }

    #[test]
    fn visible_is_sorted_newest_first() {
        let records = vec![
            rec("old", day(1), Status::Published),
            rec("new", day(5), Status::Published),
            rec("mid", day(3), Status::Published),
        ];
        let out: Vec<_> = visible_at(&records, day(10)).into_iter().map(|r| r.slug).collect();
        assert_eq!(out, vec!["new", "mid", "old"]);
    }

    #[test]
    fn merge_without_remote_equals_visible() {
        let records = vec![
            rec("old", day(1), Status::Published),
            rec("tie-a", day(4), Status::Published),
            rec("new", day(6), Status::Published),
            rec("tie-b", day(4), Status::Published),
        ];
        let visible = visible_at(&records, day(10));
        assert_eq!(merge(visible.clone(), Vec::new()), visible);
    }

    #[test]
    fn future_published_at_alone_does_not_hide_bundled() {
        let records = vec![rec("future", day(20), Status::Published)];
        assert_eq!(visible_at(&records, day(1)).len(), 1);
    }

    #[test]
    fn remote_overwrites_and_drops_unpublished() {
        let visible = vec![rec("x", day(1), Status::Published), rec("y", day(2), Status::Published)];
        let mut remote_x = rec("x", day(3), Status::Published);
        remote_x.title = "remote".into();
        let remote = vec![remote_x, rec("z", day(5), Status::Draft)];
        let out = merge(visible, remote);
        let slugs: Vec<_> = out.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["x", "y"]);
        assert_eq!(out[0].title, "remote");
    }

    #[test]
    fn unpublished_remote_does_not_retract_bundled() {
        let visible = vec![rec("x", day(1), Status::Published)];
        let remote = vec![rec("x", day(2), Status::Archived)];
        let out = merge(visible, remote);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].published_at, day(1));
    }

    #[test]
    fn ties_keep_merge_order() {
        let visible = vec![
            rec("first", day(1), Status::Published),
            rec("second", day(1), Status::Published),
        ];
        let remote = vec![rec("third", day(1), Status::Published)];
        let slugs: Vec<_> = merge(visible, remote).into_iter().map(|r| r.slug).collect();
        assert_eq!(slugs, vec!["first", "second", "third"]);
    }

    #[test]
    fn duplicate_remote_slugs_collapse_last_wins() {
        let mut a = rec("dup", day(1), Status::Published);
        a.title = "one".into();
        let mut b = rec("dup", day(1), Status::Published);
        b.title = "two".into();
        let out = merge(Vec::new(), vec![a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "two");
    }
}
