//! The final, always-present output of `decide()`.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::decision::{RiskLevel, Strategy};
use super::proxy::ProxyAction;

/// Which pipeline layer produced the final decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Llm,
    RulesFallback,
    SafetyBlock,
    SystemError,
}

/// The complete, auditable result of one `decide()` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalDecision {
    pub strategy: Strategy,
    pub amount: Decimal,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub reasoning: String,

    pub current_proxy: Decimal,
    pub new_proxy_max: Decimal,
    pub next_bid_amount: Decimal,
    pub should_increase_proxy: bool,
    pub proxy_action: ProxyAction,

    pub decision_source: DecisionSource,
    pub block_reason: Option<String>,

    pub trace_id: Uuid,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        (value.as_secs_f64() * 1000.0).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(millis / 1000.0))
    }
}
