use crate::catalog::CatalogEntry;
use std::cmp::Reverse;

pub const DEFAULT_NEW_LIMIT: usize = 8;

/// Newest-first ranking for the "new" section, truncated to `limit`.
///
/// Entries without a parseable `added` date rank after every dated entry.
/// The sort is stable, so ties keep catalog order.
pub fn rank_recent(entries: &[CatalogEntry], limit: usize) -> Vec<&CatalogEntry> {
    let mut ranked: Vec<&CatalogEntry> = entries.iter().collect();
    // Option orders None below Some, so reversing puts undated entries last.
    ranked.sort_by_cached_key(|e| Reverse(e.added_at()));
    ranked.truncate(limit);
    ranked
}
