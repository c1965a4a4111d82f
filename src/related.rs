// src/related.rs
//! # Related Content
//!
//! Per-article recommendations over a resolved catalog.
//!
//! Relevance is a boolean gate, not a score: a candidate is relevant when it
//! shares the source's category or at least one tag. Relevant candidates come
//! first in catalog order, then the list is backfilled from the remaining
//! candidates (also in catalog order) until `limit` is reached.
//!
//! Unknown slugs fall back to the head of the catalog so the page always has
//! something to show.

use crate::record::ContentRecord;

/// True when `candidate` shares a category or a tag with `source`.
pub fn is_relevant(source: &ContentRecord, candidate: &ContentRecord) -> bool {
    (!source.category.is_empty() && candidate.category == source.category)
        || source.shares_tag_with(candidate)
}

/// Up to `limit` records related to `slug`, borrowed from `catalog`.
pub fn related<'a>(catalog: &'a [ContentRecord], slug: &str, limit: usize) -> Vec<&'a ContentRecord> {
    if limit == 0 {
        return Vec::new();
    }

    let Some(source) = catalog.iter().find(|r| r.slug == slug) else {
        return catalog.iter().take(limit).collect();
    };

    let (relevant, rest): (Vec<&ContentRecord>, Vec<&ContentRecord>) = catalog
        .iter()
        .filter(|r| r.slug != source.slug)
        .partition(|r| is_relevant(source, r));

    // Backfill keeps catalog order (most recent first).
    relevant.into_iter().chain(rest).take(limit).collect()
}
