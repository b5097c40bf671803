//! Market Intelligence output: the enrichment fed into the Reasoner and the
//! Rule Selector.

use serde::{Deserialize, Serialize};

/// A coarse label for opponent behavior, derived from the bidder table via
/// exact match or cluster-similarity fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehavioralCluster {
    Casual,
    Aggressive,
    Sniper,
    Bot,
    Corporate,
    Unknown,
}

/// Bidder enrichment: always present, `found` distinguishes an exact
/// profile hit from a cluster-similarity fallback (or no usable match).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidderStats {
    pub found: bool,
    pub behavioral_cluster: BehavioralCluster,
    pub sample_size: u32,
    pub fold_probability: Option<f64>,
    pub avg_win_rate: Option<f64>,
}

impl BidderStats {
    /// The "no usable match" result: an empty, `unknown` stub.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            found: false,
            behavioral_cluster: BehavioralCluster::Unknown,
            sample_size: 0,
            fold_probability: None,
            avg_win_rate: None,
        }
    }
}

/// Which tier of the domain-lookup fallback chain produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainMatchType {
    Exact,
    TldPattern,
    ValueTierPattern,
    PlatformAvg,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PricePercentiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

/// Domain enrichment, produced by the four-tier fallback lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainStats {
    pub match_type: DomainMatchType,
    pub avg_final_price: f64,
    pub price_percentiles: PricePercentiles,
    pub volatility: f64,
    pub sample_size: u32,
    pub confidence: f64,
}

/// Whether a platform's bidding tends to escalate slowly or quickly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationSpeed {
    Slow,
    Moderate,
    Fast,
}

/// Platform-level archetype statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeStats {
    pub avg_late_bid_ratio: f64,
    pub avg_bid_jump: f64,
    pub avg_duration_s: f64,
    pub escalation_speed: EscalationSpeed,
    pub sniper_dominated: bool,
    pub proxy_driven: bool,
}

/// Financial expectation derived from the domain/bidder enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedValueAnalysis {
    pub expected_final_price: f64,
    pub expected_profit: f64,
    pub risk_adjusted_ev: f64,
    pub roi: f64,
    pub recommendation: String,
}

/// Priority bucket derived from the resource score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourcePriority {
    High,
    Medium,
    Low,
}

impl ResourcePriority {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 1.0 {
            ResourcePriority::High
        } else if score >= 0.5 {
            ResourcePriority::Medium
        } else {
            ResourcePriority::Low
        }
    }
}

/// The full enrichment produced by Market Intelligence for one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketIntelligence {
    pub bidder: BidderStats,
    pub domain: DomainStats,
    pub archetype: ArchetypeStats,
    pub win_probability: f64,
    pub expected_value_analysis: ExpectedValueAnalysis,
    pub resource_score: f64,
    pub resource_priority: ResourcePriority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_priority_cutoffs() {
        assert_eq!(ResourcePriority::from_score(1.01), ResourcePriority::High);
        assert_eq!(ResourcePriority::from_score(1.0), ResourcePriority::Medium);
        assert_eq!(ResourcePriority::from_score(0.5), ResourcePriority::Medium);
        assert_eq!(ResourcePriority::from_score(0.49), ResourcePriority::Low);
    }

    #[test]
    fn bidder_stats_unknown_has_no_prediction() {
        let stats = BidderStats::unknown();
        assert!(!stats.found);
        assert_eq!(stats.behavioral_cluster, BehavioralCluster::Unknown);
        assert!(stats.fold_probability.is_none());
    }
}
