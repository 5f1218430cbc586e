//! Vietnamese conversational task-capture agent.
//!
//! Free-form chat messages are classified as events, todos, or ideas; the
//! temporal cascade and priority extractor pull out structured fields; the
//! normalized records persist per user with fuzzy-search completion and
//! deletion. An optional Ollama-backed LLM enriches the deterministic
//! layers but is never required for correctness.

#![deny(warnings)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(unused_imports)]
#![deny(unused_must_use)]
#![deny(nonstandard_style)]
#![deny(clippy::all)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

/// Task-capture core: parsing, resolution, storage, pipeline.
pub mod capture;
/// LLM collaborator: completion trait, Ollama client, launcher bootstrap.
pub mod llm;
/// HTTP chat front-end.
pub mod server;
/// Entry helpers to start the agent.
pub mod start_agent;
