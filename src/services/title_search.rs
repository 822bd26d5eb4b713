use crate::{db::SimilarityTable, models::TitleListing};
use std::collections::HashSet;

pub const DEFAULT_LISTING_LIMIT: usize = 50;
pub const MAX_LISTING_LIMIT: usize = 500;

/// Lists the titles that can be used as recommendation queries
///
/// Titles come back in table order with duplicates removed. A non-blank `query`
/// keeps only titles containing it, ignoring case.
pub fn list_titles(table: &SimilarityTable, query: Option<&str>, limit: usize) -> TitleListing {
    let needle = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let mut seen = HashSet::new();
    let matches: Vec<&String> = table
        .titles()
        .iter()
        .filter(|title| match &needle {
            Some(needle) => title.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .filter(|title| seen.insert(title.as_str()))
        .collect();

    TitleListing {
        total: matches.len(),
        titles: matches
            .into_iter()
            .take(limit.min(MAX_LISTING_LIMIT))
            .cloned()
            .collect(),
    }
}
