//! Core types for the capture engine: configuration, errors, ids, kinds,
//! items, and temporal descriptors.

pub mod config;
pub mod errors;
pub mod ids;
pub mod item;
pub mod kinds;
pub mod time;

pub use config::{AgentConfig, LlmConfig, MatcherConfig, StorageConfig};
pub use errors::{CaptureError, CaptureResult};
pub use ids::{ItemId, RequestId, UserId, UserIdError};
pub use item::Item;
pub use kinds::{ItemKind, Priority};
pub use time::{TimeDescriptor, DEFAULT_HOUR, WIRE_FORMAT};
