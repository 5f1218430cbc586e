//! HTTP route handlers for the chat API.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::capture::core::ids::UserId;
use crate::capture::core::kinds::ItemKind;
use crate::capture::pipeline::CaptureEngine;
use crate::server::access::{self, require_access};
use crate::server::commands::{parse_command, Command};
use crate::server::format;
use crate::server::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let gated = Router::new()
        .route("/api/chat", post(chat))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(gated)
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "vietodo-agent",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Incoming chat message.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Raw message text, commands included.
    pub text: String,
}

/// Bot reply.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Rendered reply for the chat surface.
    pub reply: String,
}

/// Handle one chat message.
async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let Some(user_id) = access::user_id_from_headers(&headers) else {
        return Err((StatusCode::BAD_REQUEST, format::missing_user()));
    };

    let reply = dispatch(&state.engine, user_id, &request.text).await;
    Ok(Json(ChatResponse { reply }))
}

/// Route a parsed command through the engine and render the reply.
///
/// Every user action yields exactly one confirmation or one failure line;
/// store errors are logged and rendered as failures, never dropped.
pub async fn dispatch(engine: &CaptureEngine, user_id: UserId, text: &str) -> String {
    let reference_now = Local::now().naive_local();

    match parse_command(text) {
        Command::Start => format::welcome(),
        Command::Help => format::help(),
        Command::ListTodos => match engine
            .list_items(user_id, ItemKind::Todo, false)
            .await
        {
            Ok(todos) => format::todo_list(&todos),
            Err(err) => {
                error!("todo list failed: {err}");
                format::store_failure()
            }
        },
        Command::ListAgenda => {
            let events = engine
                .list_items(user_id.clone(), ItemKind::Event, true)
                .await;
            let ideas = engine
                .list_items(user_id.clone(), ItemKind::Idea, true)
                .await;
            let stats = engine.summary_stats(user_id, reference_now).await;
            match (events, ideas, stats) {
                (Ok(events), Ok(ideas), Ok(stats)) => format::agenda(&events, &ideas, &stats),
                (events, ideas, stats) => {
                    for err in [events.err(), ideas.err(), stats.err()].into_iter().flatten() {
                        error!("agenda failed: {err}");
                    }
                    format::store_failure()
                }
            }
        }
        Command::CompleteTodo(description) => {
            if description.is_empty() {
                return format::missing_argument("/todone", "dọn nhà");
            }
            match engine.resolve_and_complete(user_id, &description).await {
                Ok(true) => format::completed(&description),
                Ok(false) => format::todo_not_found(&description),
                Err(err) => {
                    error!("complete failed: {err}");
                    format::store_failure()
                }
            }
        }
        Command::DeleteEvent(description) => {
            delete_by_description(engine, user_id, ItemKind::Event, &description, "thợ lắp đồ")
                .await
        }
        Command::DeleteIdea(description) => {
            delete_by_description(engine, user_id, ItemKind::Idea, &description, "mua sữa").await
        }
        Command::Capture(message) => {
            match engine.process_message(user_id, &message, reference_now).await {
                Ok(outcome) => format::capture_confirmation(&outcome),
                Err(err) => {
                    error!("capture failed: {err}");
                    format::capture_failure()
                }
            }
        }
        Command::Unknown(command) => format::unknown_command(&command),
    }
}

async fn delete_by_description(
    engine: &CaptureEngine,
    user_id: UserId,
    kind: ItemKind,
    description: &str,
    example: &str,
) -> String {
    if description.is_empty() {
        let command = match kind {
            ItemKind::Event => "/eventdone",
            _ => "/ideadone",
        };
        return format::missing_argument(command, example);
    }

    match engine.resolve_and_delete(user_id, kind, description).await {
        Ok(true) => format::deleted(kind, description),
        Ok(false) => format::delete_not_found(kind, description),
        Err(err) => {
            error!("delete failed: {err}");
            format::store_failure()
        }
    }
}
