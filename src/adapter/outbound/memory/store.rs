//! `dashmap`-backed `HistoryStore`: per-key sharded locking gives the
//! "no lost updates under concurrent writers" guarantee (§8) without a
//! database.

use dashmap::DashMap;

use crate::domain::{AggregateKey, AggregateStats, OutcomeRecord, Platform, RoundRecord, Strategy, ValueTier};
use crate::error::StoreError;
use crate::port::outbound::store::HistoryStore;

#[derive(Default)]
pub struct InMemoryHistoryStore {
    outcomes: DashMap<String, OutcomeRecord>,
    rounds: DashMap<(String, u32), RoundRecord>,
    aggregates: DashMap<AggregateKey, AggregateStats>,
}

impl InMemoryHistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    async fn record_outcome(&self, outcome: &OutcomeRecord) -> Result<(), StoreError> {
        let key = AggregateKey {
            strategy: outcome.strategy_used,
            platform: outcome.platform,
            value_tier: ValueTier::classify(outcome.estimated_value),
        };

        // Re-recording an auction_id (retry/replay) must not double-count;
        // unfold the previous outcome's contribution under its own key
        // before folding the new one in.
        if let Some(previous) = self.outcomes.get(&outcome.auction_id).map(|e| e.value().clone()) {
            let previous_key = AggregateKey {
                strategy: previous.strategy_used,
                platform: previous.platform,
                value_tier: ValueTier::classify(previous.estimated_value),
            };
            if let Some(mut previous_stats) = self.aggregates.get_mut(&previous_key) {
                previous_stats.unrecord(previous.won, Some(previous.profit_margin));
            }
        }

        self.aggregates
            .entry(key)
            .or_default()
            .record(outcome.won, Some(outcome.profit_margin));
        self.outcomes
            .insert(outcome.auction_id.clone(), outcome.clone());
        Ok(())
    }

    async fn record_round(&self, round: &RoundRecord) -> Result<(), StoreError> {
        self.rounds
            .insert((round.thread_id.clone(), round.round_number), round.clone());
        Ok(())
    }

    async fn get_similar(
        &self,
        platform: Platform,
        value_min: rust_decimal::Decimal,
        value_max: rust_decimal::Decimal,
        limit: usize,
    ) -> Result<Vec<OutcomeRecord>, StoreError> {
        let mut matches: Vec<OutcomeRecord> = self
            .outcomes
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|o| {
                o.platform == platform
                    && o.estimated_value >= value_min
                    && o.estimated_value <= value_max
            })
            .collect();
        matches.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn get_strategy_stats(
        &self,
        strategy: Strategy,
        platform: Platform,
        tier: ValueTier,
    ) -> Result<Option<AggregateStats>, StoreError> {
        let key = AggregateKey {
            strategy,
            platform,
            value_tier: tier,
        };
        Ok(self.aggregates.get(&key).map(|entry| *entry.value()))
    }

    async fn get_best_strategy(
        &self,
        platform: Platform,
        tier: ValueTier,
        min_samples: u64,
    ) -> Result<Option<(AggregateKey, AggregateStats)>, StoreError> {
        let best = self
            .aggregates
            .iter()
            .filter(|entry| {
                entry.key().platform == platform
                    && entry.key().value_tier == tier
                    && entry.value().total_uses >= min_samples
            })
            .max_by(|a, b| {
                a.value()
                    .win_rate()
                    .partial_cmp(&b.value().win_rate())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|entry| (entry.key().clone(), *entry.value()));
        Ok(best)
    }
}
