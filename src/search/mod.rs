// src/search/mod.rs
//! Keyword ranking and recommendation blending. Everything here is pure:
//! postings arrive already fetched by the data layer.

pub mod recommend;
pub mod scorer;

pub use recommend::{blend_recommendations, DEFAULT_RECOMMENDATION_LIMIT};
pub use scorer::{parse_terms, score, score_at, sort_by_relevance, sort_postings, ScoredPosting};
