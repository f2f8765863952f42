// src/search/recommend.rs
use crate::types::Posting;
use std::collections::HashSet;

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;

/// Fill up to `limit` recommendations from the preferred category first,
/// then related categories, then popular postings. A posting appearing in
/// more than one set is only kept at its first position.
pub fn blend_recommendations(
    preferred: Vec<Posting>,
    related: Vec<Posting>,
    popular: Vec<Posting>,
    limit: usize,
) -> Vec<Posting> {
    let mut seen = HashSet::new();

    preferred
        .into_iter()
        .chain(related)
        .chain(popular)
        .filter(|posting| seen.insert(posting.id))
        .take(limit)
        .collect()
}
