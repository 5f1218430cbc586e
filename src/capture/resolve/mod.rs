//! Fuzzy resolution of search phrases to stored items.

pub mod fuzzy;

pub use fuzzy::{best_match, partial_similarity};
