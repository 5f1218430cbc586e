//! Launcher binary: bootstraps Ollama, then serves the chat API.

use std::process::ExitCode;

use vietodo_agent::start_agent;

fn main() -> ExitCode {
    start_agent::run(true)
}
