//! Server binary: serves the chat API against an already-running (or
//! absent) Ollama endpoint.

use std::process::ExitCode;

use vietodo_agent::start_agent;

fn main() -> ExitCode {
    start_agent::run(false)
}
