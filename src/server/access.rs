//! Allow-list gating, applied as a single middleware stage.
//!
//! The chat transport identifies the caller via the `x-user-id` header;
//! every `/api/*` request passes through here exactly once. An empty or
//! missing allow-list leaves the bot open.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::capture::core::ids::UserId;
use crate::server::format;
use crate::server::state::AppState;

/// Header carrying the transport-assigned user id.
pub const USER_HEADER: &str = "x-user-id";

/// Environment variable with a comma-separated allow-list.
pub const ALLOWED_USERS_ENV: &str = "VIETODO_ALLOWED_USERS";

/// Configured set of users allowed to talk to the bot.
#[derive(Clone, Debug, Default)]
pub struct AllowList {
    allowed: Option<HashSet<String>>,
}

impl AllowList {
    /// An open allow-list that admits everyone.
    #[must_use]
    pub fn open() -> Self {
        Self { allowed: None }
    }

    /// Build from explicit ids; an empty iterator yields an open list.
    #[must_use]
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = ids
            .into_iter()
            .map(Into::into)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if set.is_empty() {
            Self::open()
        } else {
            Self { allowed: Some(set) }
        }
    }

    /// Read the allow-list from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(ALLOWED_USERS_ENV) {
            Ok(raw) => Self::new(raw.split(',')),
            Err(_) => Self::open(),
        }
    }

    /// Whether this user may use the bot.
    #[must_use]
    pub fn is_allowed(&self, user_id: &str) -> bool {
        match &self.allowed {
            Some(set) => set.contains(user_id),
            None => true,
        }
    }
}

/// Extract and validate the caller's user id from request headers.
pub fn user_id_from_headers(headers: &axum::http::HeaderMap) -> Option<UserId> {
    let raw = headers.get(USER_HEADER)?.to_str().ok()?;
    UserId::new(raw).ok()
}

/// Middleware: reject requests from users outside the allow-list.
pub async fn require_access(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(user_id) = user_id_from_headers(request.headers()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "reply": format::missing_user() })),
        )
            .into_response();
    };

    if !state.access.is_allowed(user_id.as_str()) {
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "reply": format::denied() })),
        )
            .into_response();
    }

    next.run(request).await
}
