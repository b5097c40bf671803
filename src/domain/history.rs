//! History records: what the History Recorder appends and aggregates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::auction::Platform;
use super::decision::{Strategy, ValueTier};

/// The interim result of a single bidding round within a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundResult {
    Outbid,
    Won,
    Lost,
}

/// One round of a multi-round auction thread. Keyed by `(thread_id, round_number)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    pub thread_id: String,
    pub round_number: u32,
    pub strategy: Strategy,
    pub amount: Decimal,
    pub result: RoundResult,
    pub recorded_at: DateTime<Utc>,
}

/// A completed auction outcome. Keyed by `auction_id`; replaces on conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub auction_id: String,
    pub domain: String,
    pub platform: Platform,
    pub estimated_value: Decimal,
    pub final_price: Decimal,
    pub won: bool,
    pub profit_margin: Decimal,
    pub strategy_used: Strategy,
    pub recorded_at: DateTime<Utc>,
}

/// The key for a strategy-performance aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateKey {
    pub strategy: Strategy,
    pub platform: Platform,
    pub value_tier: ValueTier,
}

/// Aggregated performance for one `(strategy, platform, value_tier)`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_uses: u64,
    pub wins: u64,
    pub total_profit: Decimal,
}

impl AggregateStats {
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.total_uses == 0 {
            0.0
        } else {
            self.wins as f64 / self.total_uses as f64
        }
    }

    /// Fold one outcome into this aggregate.
    pub fn record(&mut self, won: bool, profit: Option<Decimal>) {
        self.total_uses += 1;
        if won {
            self.wins += 1;
        }
        if let Some(profit) = profit {
            self.total_profit += profit;
        }
    }

    /// Remove a previously-folded outcome's contribution, the inverse of
    /// [`Self::record`]. Used to re-record an `auction_id` under a
    /// different key without double-counting the earlier fold.
    pub fn unrecord(&mut self, won: bool, profit: Option<Decimal>) {
        self.total_uses = self.total_uses.saturating_sub(1);
        if won {
            self.wins = self.wins.saturating_sub(1);
        }
        if let Some(profit) = profit {
            self.total_profit -= profit;
        }
    }
}
