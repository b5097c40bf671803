//! Reasoner port: the external probabilistic reasoner (LLM).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ReasonerError;

/// Contract for an external probabilistic reasoner.
///
/// Implementations translate every failure mode — network error, timeout,
/// missing credentials, non-JSON output — into a [`ReasonerError`] variant.
/// The Reasoner Adapter stage (`crate::application::reasoner_adapter`) is the
/// only caller, and it downgrades every `Err` to "missing output" per the
/// spec; this trait still returns a typed `Result` rather than `Option` so
/// that distinction is preserved for logging.
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Provider name, used in logs and prompts.
    fn name(&self) -> &'static str;

    /// Send a completion request and return the raw response text.
    ///
    /// `deadline` is the remaining time budget for this call; an
    /// implementation must return [`ReasonerError::Timeout`] rather than
    /// blocking past it.
    async fn reason(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        deadline: Duration,
    ) -> Result<String, ReasonerError>;
}
