//! A deterministic, scriptable `Reasoner` for tests.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ReasonerError;
use crate::port::outbound::reasoner::Reasoner;

/// What the stub does when asked to reason.
enum Script {
    /// Always return a fixed, valid `proxy_max` JSON response.
    AlwaysProxyMax,
    /// Always fail with the given error (simulates a down provider).
    AlwaysFail(fn() -> ReasonerError),
    /// Return raw text verbatim, for testing parse/coercion failures.
    Raw(String),
}

pub struct StubReasoner {
    script: Script,
}

impl StubReasoner {
    #[must_use]
    pub fn always_proxy_max() -> Self {
        Self {
            script: Script::AlwaysProxyMax,
        }
    }

    #[must_use]
    pub fn always_timeout() -> Self {
        Self {
            script: Script::AlwaysFail(|| ReasonerError::Timeout),
        }
    }

    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            script: Script::Raw(text.into()),
        }
    }
}

#[async_trait]
impl Reasoner for StubReasoner {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn reason(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _deadline: Duration,
    ) -> Result<String, ReasonerError> {
        match &self.script {
            Script::AlwaysProxyMax => Ok(r#"{
                "strategy": "proxy_max",
                "recommended_bid_amount": 50,
                "confidence": 0.85,
                "risk_level": "medium",
                "reasoning": "Competition is moderate and the profit margin supports this strategy; risk stays within our normal tolerance for this auction."
            }"#.to_string()),
            Script::AlwaysFail(make_err) => Err(make_err()),
            Script::Raw(text) => Ok(text.clone()),
        }
    }
}
