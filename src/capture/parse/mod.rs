//! Natural-language extraction: temporal cascade, priority, kind
//! classification, and normalization.

pub mod classify;
pub mod normalize;
pub mod priority;
pub mod temporal;
pub mod temporal_llm;

pub use classify::{classify, keyword_classify};
pub use normalize::TextNormalizer;
pub use priority::PriorityExtractor;
pub use temporal::TemporalParser;
pub use temporal_llm::LlmTimeParser;
