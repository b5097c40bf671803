//! Outbound adapters: concrete implementations of the ports the
//! application stages depend on.
//!
//! - [`llm`]: `Reasoner` implementations for the Anthropic and OpenAI
//!   APIs.
//! - [`memory`]: an in-process `HistoryStore`, used by the CLI's `--memory`
//!   flag and by tests.
//! - [`sqlite`]: the Diesel-backed `HistoryStore`.
//! - [`tables`]: the JSON-file-backed Market Intelligence table loader.

pub mod llm;
pub mod memory;
pub mod sqlite;
pub mod tables;
