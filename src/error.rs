//! Crate-wide error types.
//!
//! Errors never cross the `decide()` boundary: the orchestrator catches
//! everything at its edge and converts it into a `FinalDecision` with
//! `decision_source = system_error`. This module exists for the layers
//! beneath that boundary (config loading, adapters, the CLI) where a
//! `Result` is still the right shape.

use thiserror::Error;

/// Top-level crate error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Reasoner(#[from] ReasonerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Configuration loading/validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// History store errors. Per the spec these are logged but never change the
/// per-call decision (`ExternalStoreError` in §7 of the spec).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("migration error: {0}")]
    Migration(String),
}

/// Reasoner (LLM) adapter errors. The pipeline never sees these directly —
/// the Reasoner Adapter stage (`application::reasoner_adapter`) catches every
/// variant and turns it into "missing output" before the orchestrator ever
/// observes it.
#[derive(Error, Debug)]
pub enum ReasonerError {
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("response was not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response did not match the expected schema: {0}")]
    SchemaMismatch(String),

    #[error("response was semantically impossible: {0}")]
    Semantic(String),
}

pub type Result<T> = std::result::Result<T, Error>;
