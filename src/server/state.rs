//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::capture::pipeline::CaptureEngine;
use crate::server::access::AllowList;

/// Shared application state.
pub struct AppState {
    /// Capture engine handling every chat message.
    pub engine: Arc<CaptureEngine>,
    /// Allow-list checked by the access middleware.
    pub access: AllowList,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(engine: Arc<CaptureEngine>, access: AllowList) -> Arc<Self> {
        Arc::new(Self { engine, access })
    }
}
