//! History store port: persistence the History Recorder writes to and
//! Market Intelligence reads from.

use std::future::Future;

use rust_decimal::Decimal;

use crate::domain::{
    AggregateKey, AggregateStats, AuctionContext, OutcomeRecord, Platform, RoundRecord, Strategy,
    ValueTier,
};
use crate::error::StoreError;

/// Contract for the persisted auction history.
///
/// All operations are idempotent on their natural keys (`auction_id` for
/// outcomes, `(thread_id, round_number)` for rounds, `(strategy, platform,
/// value_tier)` for aggregates), per §6/§8 of the spec. Per §9, this is a
/// write-only view for recording and a read-only view for Market
/// Intelligence — nothing here lets Intelligence mutate history.
pub trait HistoryStore: Send + Sync {
    /// Record a completed auction outcome, replacing any existing record
    /// with the same `auction_id`, and fold it into the relevant
    /// `(strategy, platform, value_tier)` aggregate.
    fn record_outcome(
        &self,
        outcome: &OutcomeRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Record one round of a multi-round thread, replacing any existing
    /// record with the same `(thread_id, round_number)`.
    fn record_round(
        &self,
        round: &RoundRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Auctions on `platform` whose `estimated_value` falls within the
    /// context's ±30% band, most recent first, bounded by `limit`.
    fn get_similar(
        &self,
        platform: Platform,
        value_min: Decimal,
        value_max: Decimal,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<OutcomeRecord>, StoreError>> + Send;

    /// The aggregate for one `(strategy, platform, value_tier)`.
    fn get_strategy_stats(
        &self,
        strategy: Strategy,
        platform: Platform,
        tier: ValueTier,
    ) -> impl Future<Output = Result<Option<AggregateStats>, StoreError>> + Send;

    /// The highest-win-rate strategy for `(platform, tier)` among strategies
    /// whose aggregate has at least `min_samples` uses.
    fn get_best_strategy(
        &self,
        platform: Platform,
        tier: ValueTier,
        min_samples: u64,
    ) -> impl Future<Output = Result<Option<(AggregateKey, AggregateStats)>, StoreError>> + Send;
}

/// The ±30% value band used by similar-auction lookups, shared by the
/// history store adapters and by Market Intelligence's domain lookup.
#[must_use]
pub fn value_band(ctx: &AuctionContext) -> (Decimal, Decimal) {
    let band = ctx.estimated_value * Decimal::new(30, 2);
    (ctx.estimated_value - band, ctx.estimated_value + band)
}
