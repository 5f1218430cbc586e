//! Startup helpers for the Vietodo agent server.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::capture::core::config::AgentConfig;
use crate::capture::pipeline::CaptureEngine;
use crate::capture::store::item_store::SqliteItemStore;
use crate::llm::{Completion, OllamaCompletion, OllamaStarter};
use crate::server::{self, AllowList, AppState};

/// Default Ollama endpoint.
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Run the server.
///
/// `bootstrap_ollama` makes the launcher ensure the local Ollama daemon is
/// reachable (spawning it if needed) and the model warmed before serving;
/// the plain server binary skips that and relies on whatever the endpoint
/// offers. In both modes the agent stays fully functional when the LLM is
/// unavailable — every enrichment call falls back deterministically.
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run(bootstrap_ollama: bool) -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Vietodo agent v{}", env!("CARGO_PKG_VERSION"));

    let config = build_config();
    if let Err(err) = config.validate() {
        tracing::error!("Invalid configuration: {err}");
        return ExitCode::from(1);
    }

    if bootstrap_ollama && config.llm.enabled {
        let base_url = config
            .llm
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        tracing::info!("Ollama endpoint: {base_url}");
        match OllamaStarter::new(&base_url, &config.llm.model) {
            Ok(starter) => {
                if let Err(err) = starter.ensure_ready() {
                    tracing::warn!("Ollama bootstrap failed, continuing without it: {err}");
                }
            }
            Err(err) => tracing::warn!("Ollama client unavailable: {err}"),
        }
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            tracing::error!("Failed to create runtime: {err}");
            return ExitCode::from(1);
        }
    };

    let state = match rt.block_on(build_state(config)) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!("Failed to create state: {err}");
            return ExitCode::from(1);
        }
    };

    if let Err(err) = rt.block_on(server::run_server(state, get_port())) {
        tracing::error!("Server error: {err}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Initialize application state without starting the server.
///
/// # Errors
/// Returns an error if the store or engine cannot be built.
pub async fn build_state(
    config: AgentConfig,
) -> Result<Arc<AppState>, Box<dyn std::error::Error + Send + Sync>> {
    let store = Arc::new(SqliteItemStore::new(&config.storage).await?);

    let llm: Option<Arc<dyn Completion>> = if config.llm.enabled {
        match OllamaCompletion::new(&config.llm) {
            Ok(client) => Some(Arc::new(client)),
            Err(err) => {
                tracing::warn!("Completion client unavailable, running deterministic-only: {err}");
                None
            }
        }
    } else {
        None
    };

    let engine = Arc::new(CaptureEngine::new(config, store, llm)?);
    Ok(AppState::new(engine, AllowList::from_env()))
}

/// Resolve configuration from defaults plus environment overrides.
#[must_use]
pub fn build_config() -> AgentConfig {
    let mut config = AgentConfig::default();

    if let Ok(path) = std::env::var("VIETODO_DB") {
        config.storage.sqlite_path = PathBuf::from(path);
    }
    if let Ok(model) = std::env::var("VIETODO_MODEL") {
        config.llm.model = model;
    }
    if let Ok(url) = std::env::var("VIETODO_OLLAMA_URL") {
        config.llm.base_url = Some(url);
    }

    config.llm.enabled = match std::env::var("VIETODO_LLM") {
        Ok(value) => !matches!(value.to_lowercase().as_str(), "0" | "off" | "false"),
        Err(_) => true,
    };

    config
}

/// Get configured server port.
#[must_use]
pub fn get_port() -> u16 {
    std::env::var("VIETODO_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(server::DEFAULT_PORT)
}
