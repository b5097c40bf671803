//! Strategy decisions: the output of the Reasoner and the Rule Selector.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The six allowed bidding strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    ProxyMax,
    LastMinuteSnipe,
    IncrementalTest,
    WaitForCloseout,
    AggressiveEarly,
    DoNotBid,
}

/// Qualitative risk bucket attached to a strategy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Value tier, used to select the Rule Selector's branch and to key
/// history aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTier {
    High,
    Medium,
    Low,
}

impl ValueTier {
    /// Classify an estimated value into a tier. Boundaries resolve to the
    /// higher tier: exactly $1000 is `High`, exactly $100 is `Medium`.
    #[must_use]
    pub fn classify(estimated_value: Decimal) -> Self {
        if estimated_value >= Decimal::from(1000) {
            ValueTier::High
        } else if estimated_value >= Decimal::from(100) {
            ValueTier::Medium
        } else {
            ValueTier::Low
        }
    }
}

/// A proposed bidding strategy, produced either by the Reasoner or by the
/// Rule Selector fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyDecision {
    pub strategy: Strategy,
    pub recommended_bid_amount: Decimal,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub reasoning: String,
}

impl StrategyDecision {
    /// The one structural invariant the spec demands of every
    /// `StrategyDecision` regardless of its origin: a `do_not_bid`
    /// strategy always carries a zero amount.
    #[must_use]
    pub fn is_structurally_valid(&self) -> bool {
        if self.strategy == Strategy::DoNotBid {
            self.recommended_bid_amount == Decimal::ZERO
        } else {
            true
        }
    }
}
