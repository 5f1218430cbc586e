//! Task-capture subsystem.
//!
//! Organized into:
//! - `core`: configuration, errors, ids, kinds, items, temporal descriptors
//! - `parse`: the Vietnamese extraction layers (time, priority, kind,
//!   normalization)
//! - `resolve`: fuzzy matching of search phrases to stored items
//! - `store`: item persistence trait and `SQLite` backend
//! - `pipeline`: orchestration of one message through the layers

pub mod core;
pub mod parse;
pub mod pipeline;
pub mod resolve;
pub mod store;

// Re-export commonly used types for convenience
pub use self::core::{
    AgentConfig, CaptureError, CaptureResult, Item, ItemId, ItemKind, LlmConfig, MatcherConfig,
    Priority, RequestId, StorageConfig, TimeDescriptor, UserId,
};
pub use parse::{PriorityExtractor, TemporalParser, TextNormalizer};
pub use pipeline::{CaptureEngine, CaptureOutcome, SummaryStats};
pub use resolve::best_match;
pub use store::{ItemStore, SqliteItemStore};
