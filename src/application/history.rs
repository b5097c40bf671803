//! History Recorder (§4.8): the facade the caller invokes outside the
//! per-call pipeline when an auction resolves or a round completes, and
//! the read queries Market Intelligence and the CLI use.
//!
//! This is a thin pass-through over [`HistoryStore`]: the aggregate-fold
//! contract (increment `total_uses`, fold in `wins`/`total_profit`) is
//! owned by the store adapter, per the port's doc comment, since an
//! in-memory store and a SQLite-backed store fold differently (a lock vs.
//! a transaction). This layer only adds the default minimum-sample
//! threshold and the ±30% value band shared with Market Intelligence.

use rust_decimal::Decimal;

use crate::domain::{AggregateKey, AggregateStats, OutcomeRecord, Platform, RoundRecord, Strategy, ValueTier};
use crate::error::StoreError;
use crate::port::outbound::store::{value_band, HistoryStore};

/// Minimum sample count an aggregate must have before it counts as a
/// strategy-performance signal (§4.8's default).
pub const DEFAULT_MIN_SAMPLES: u64 = 5;

pub struct HistoryRecorder<S> {
    store: S,
}

impl<S: HistoryStore> HistoryRecorder<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn record_outcome(&self, outcome: &OutcomeRecord) -> Result<(), StoreError> {
        self.store.record_outcome(outcome).await
    }

    pub async fn record_round(&self, round: &RoundRecord) -> Result<(), StoreError> {
        self.store.record_round(round).await
    }

    /// Similar auctions on `platform` within ±30% of `estimated_value`,
    /// most recent first.
    pub async fn similar_auctions(
        &self,
        platform: Platform,
        estimated_value: Decimal,
        limit: usize,
    ) -> Result<Vec<OutcomeRecord>, StoreError> {
        let (min, max) = value_band(&probe_context(platform, estimated_value));
        self.store.get_similar(platform, min, max, limit).await
    }

    pub async fn strategy_stats(
        &self,
        strategy: Strategy,
        platform: Platform,
        tier: ValueTier,
    ) -> Result<Option<AggregateStats>, StoreError> {
        self.store.get_strategy_stats(strategy, platform, tier).await
    }

    /// The highest-win-rate strategy for `(platform, tier)` among
    /// strategies with at least [`DEFAULT_MIN_SAMPLES`] uses.
    pub async fn best_strategy(
        &self,
        platform: Platform,
        tier: ValueTier,
    ) -> Result<Option<(AggregateKey, AggregateStats)>, StoreError> {
        self.store
            .get_best_strategy(platform, tier, DEFAULT_MIN_SAMPLES)
            .await
    }
}

/// [`value_band`] only reads `estimated_value` off the context; build a
/// minimal stand-in rather than widening that function's signature.
fn probe_context(platform: Platform, estimated_value: Decimal) -> crate::domain::AuctionContext {
    crate::domain::AuctionContext {
        domain: String::new(),
        platform,
        estimated_value,
        current_bid: Decimal::ZERO,
        your_current_proxy: Decimal::ZERO,
        budget_available: Decimal::ZERO,
        num_bidders: 0,
        hours_remaining: 0.0,
        bidder_analysis: crate::domain::BidderAnalysis {
            bot_detected: false,
            corporate_buyer: false,
            aggression_score: 0.0,
            reaction_time_avg_s: 0.0,
        },
        thread_id: String::new(),
        last_bidder_id: None,
    }
}
