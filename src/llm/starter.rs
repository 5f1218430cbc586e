//! Blocking Ollama bootstrap for the launcher binary.
//!
//! Behaviour:
//! - Check whether Ollama is reachable via `GET /api/version`.
//! - If not reachable, spawn `ollama serve` and wait for it to come up.
//! - Preload (warm-up) the configured model via `POST /api/generate`.

use std::fmt;
use std::process::{Command, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

/// Keep the model loaded in memory for a reasonable duration.
const KEEP_ALIVE: &str = "1h";

/// Warm-up prompt: minimal non-empty prompt.
const WARMUP_PROMPT: &str = " ";

/// Warm-up token budget.
const WARMUP_NUM_PREDICT: u32 = 1;

/// Startup wait settings.
const STARTUP_TIMEOUT: Duration = Duration::from_secs(15);
const STARTUP_RETRY: Duration = Duration::from_millis(250);

/// HTTP client timeout; warm-up may pull model weights into memory.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors produced by the Ollama bootstrap.
#[derive(Debug)]
pub enum OllamaStarterError {
    /// Failed to spawn Ollama due to an OS I/O error.
    Io(std::io::Error),
    /// Ollama did not become ready in time.
    StartupTimeout,
    /// HTTP response was not a success.
    HttpStatusNotOk(u16),
    /// HTTP client error when using the blocking client.
    HttpClient(reqwest::Error),
}

impl From<std::io::Error> for OllamaStarterError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<reqwest::Error> for OllamaStarterError {
    fn from(value: reqwest::Error) -> Self {
        Self::HttpClient(value)
    }
}

impl fmt::Display for OllamaStarterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::StartupTimeout => write!(f, "ollama startup timed out"),
            Self::HttpStatusNotOk(status) => write!(f, "ollama http status not ok: {status}"),
            Self::HttpClient(err) => write!(f, "http client error: {err}"),
        }
    }
}

impl std::error::Error for OllamaStarterError {}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    keep_alive: &'a str,
    options: GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[allow(dead_code)]
    response: Option<String>,
}

/// Blocking client that ensures an Ollama server is ready to serve the
/// configured model.
pub struct OllamaStarter {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaStarter {
    /// Create a starter for the given base URL and model.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, model: &str) -> Result<Self, OllamaStarterError> {
        let client = Client::builder().timeout(CLIENT_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Ensure the server is running and the model is warm.
    ///
    /// # Errors
    /// Returns an error if the server cannot be reached or spawned, or if
    /// the warm-up request fails.
    pub fn ensure_ready(&self) -> Result<(), OllamaStarterError> {
        if !self.is_reachable() {
            self.spawn_server()?;
            self.wait_until_reachable()?;
        }
        self.warm_up()
    }

    /// Probe `GET /api/version`.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        let url = format!("{}/api/version", self.base_url);
        self.client
            .get(url)
            .timeout(Duration::from_secs(2))
            .send()
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn spawn_server(&self) -> Result<(), OllamaStarterError> {
        Command::new("ollama")
            .arg("serve")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(())
    }

    fn wait_until_reachable(&self) -> Result<(), OllamaStarterError> {
        let deadline = Instant::now() + STARTUP_TIMEOUT;
        while Instant::now() < deadline {
            if self.is_reachable() {
                return Ok(());
            }
            sleep(STARTUP_RETRY);
        }
        Err(OllamaStarterError::StartupTimeout)
    }

    fn warm_up(&self) -> Result<(), OllamaStarterError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt: WARMUP_PROMPT,
            stream: false,
            keep_alive: KEEP_ALIVE,
            options: GenerateOptions {
                num_predict: WARMUP_NUM_PREDICT,
            },
        };

        let response = self.client.post(url).json(&request).send()?;
        if !response.status().is_success() {
            return Err(OllamaStarterError::HttpStatusNotOk(
                response.status().as_u16(),
            ));
        }
        let _: GenerateResponse = response.json()?;
        Ok(())
    }
}
