//! The auction context: the immutable input to a single `decide()` call.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Supported auction platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    GoDaddy,
    NameJet,
    Dynadot,
}

impl Platform {
    /// The per-bid proxy increment for this platform, given the current bid.
    ///
    /// GoDaddy and NameJet use a flat $5 step; Dynadot scales with the
    /// current bid. Unknown platforms are not representable (the enum is
    /// closed), so the "unknown -> $5" fallback from the spec only matters
    /// for callers that deserialize an unrecognized string, which is
    /// rejected at parse time instead.
    #[must_use]
    pub fn bid_increment(self, current_bid: Decimal) -> Decimal {
        match self {
            Platform::GoDaddy | Platform::NameJet => Decimal::from(5),
            Platform::Dynadot => (current_bid * Decimal::new(5, 2)).max(Decimal::from(5)),
        }
    }
}

/// Opponent behavior signals observed for the current round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BidderAnalysis {
    pub bot_detected: bool,
    pub corporate_buyer: bool,
    /// Aggression score in `[0, 10]`.
    pub aggression_score: f64,
    /// Average reaction time in seconds, `>= 0`.
    pub reaction_time_avg_s: f64,
}

/// The live state of a single domain-name auction, as observed by the
/// outer polling loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionContext {
    pub domain: String,
    pub platform: Platform,
    pub estimated_value: Decimal,
    pub current_bid: Decimal,
    pub your_current_proxy: Decimal,
    pub budget_available: Decimal,
    pub num_bidders: u32,
    pub hours_remaining: f64,
    pub bidder_analysis: BidderAnalysis,
    pub thread_id: String,
    pub last_bidder_id: Option<String>,
}

impl AuctionContext {
    /// Validate the structural invariants that must hold for *any*
    /// `AuctionContext`, regardless of what the Safety Gate later decides
    /// about its values. This is the `InvalidInput` boundary from the
    /// spec's error design: malformed input never reaches the pipeline.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if a monetary field is negative, if
    /// `hours_remaining` is negative, or if `aggression_score` is out of
    /// `[0, 10]`.
    pub fn validate(&self) -> Result<()> {
        let monetary = [
            ("estimated_value", self.estimated_value),
            ("current_bid", self.current_bid),
            ("your_current_proxy", self.your_current_proxy),
            ("budget_available", self.budget_available),
        ];
        for (field, value) in monetary {
            if value < Decimal::ZERO {
                return Err(Error::InvalidInput(format!(
                    "{field} must be non-negative, got {value}"
                )));
            }
        }
        if self.hours_remaining < 0.0 {
            return Err(Error::InvalidInput(format!(
                "hours_remaining must be non-negative, got {}",
                self.hours_remaining
            )));
        }
        if !(0.0..=10.0).contains(&self.bidder_analysis.aggression_score) {
            return Err(Error::InvalidInput(format!(
                "aggression_score must be in [0, 10], got {}",
                self.bidder_analysis.aggression_score
            )));
        }
        if self.bidder_analysis.reaction_time_avg_s < 0.0 {
            return Err(Error::InvalidInput(
                "reaction_time_avg_s must be non-negative".to_string(),
            ));
        }
        if self.domain.trim().is_empty() {
            return Err(Error::InvalidInput("domain must not be empty".to_string()));
        }
        if self.thread_id.trim().is_empty() {
            return Err(Error::InvalidInput(
                "thread_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a JSON-encoded context and validate it in one step.
    ///
    /// # Errors
    /// Returns [`Error::Json`] on malformed JSON, or [`Error::InvalidInput`]
    /// if the decoded context fails [`AuctionContext::validate`].
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let ctx: Self = serde_json::from_slice(bytes)?;
        ctx.validate()?;
        Ok(ctx)
    }
}
