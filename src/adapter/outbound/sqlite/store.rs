//! SQLite-backed `HistoryStore`.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;

use crate::adapter::outbound::sqlite::database::connection::{
    configure_sqlite_connection, DbPool, PooledConn,
};
use crate::adapter::outbound::sqlite::database::model::{AggregateRow, OutcomeRow, RoundRow};
use crate::adapter::outbound::sqlite::database::schema::{
    auction_outcomes, auction_rounds, strategy_performance,
};
use crate::domain::{
    AggregateKey, AggregateStats, OutcomeRecord, Platform, RoundRecord, Strategy, ValueTier,
};
use crate::error::StoreError;
use crate::port::outbound::store::HistoryStore;

/// SQLite-backed history store.
pub struct SqliteHistoryStore {
    pool: DbPool,
    busy_timeout_ms: u64,
}

impl SqliteHistoryStore {
    #[must_use]
    pub fn new(pool: DbPool, busy_timeout_ms: u64) -> Self {
        Self { pool, busy_timeout_ms }
    }

    fn tag(value: impl serde::Serialize) -> Result<String, StoreError> {
        serde_json::to_value(&value)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| StoreError::Serialize("failed to encode tag".to_string()))
    }

    fn connection(&self) -> Result<PooledConn, StoreError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        configure_sqlite_connection(&mut conn, self.busy_timeout_ms)?;
        Ok(conn)
    }

    /// Fold `outcome`'s contribution into its `(strategy, platform,
    /// value_tier)` aggregate, or unfold it if `undo` is set. Used both to
    /// apply a fresh outcome and to retract a previous one that's about to
    /// be replaced under the same `auction_id`.
    fn apply_aggregate(
        conn: &mut SqliteConnection,
        key: &AggregateKey,
        won: bool,
        profit_margin: Decimal,
        undo: bool,
    ) -> Result<(), diesel::result::Error> {
        let strategy_tag = Self::tag(key.strategy).map_err(|_| diesel::result::Error::RollbackTransaction)?;
        let platform_tag = Self::tag(key.platform).map_err(|_| diesel::result::Error::RollbackTransaction)?;
        let tier_tag = Self::tag(key.value_tier).map_err(|_| diesel::result::Error::RollbackTransaction)?;

        let existing: Option<AggregateRow> = strategy_performance::table
            .find((&strategy_tag, &platform_tag, &tier_tag))
            .first(conn)
            .optional()?;

        let mut stats = existing
            .map(AggregateRow::into_domain)
            .transpose()
            .map_err(|_| diesel::result::Error::RollbackTransaction)?
            .map_or_else(AggregateStats::default, |(_, stats)| stats);

        if undo {
            stats.unrecord(won, Some(profit_margin));
        } else {
            stats.record(won, Some(profit_margin));
        }

        let updated = AggregateRow::from_domain(key, &stats)
            .map_err(|_| diesel::result::Error::RollbackTransaction)?;
        diesel::replace_into(strategy_performance::table)
            .values(&updated)
            .execute(conn)?;
        Ok(())
    }
}

impl HistoryStore for SqliteHistoryStore {
    async fn record_outcome(&self, outcome: &OutcomeRecord) -> Result<(), StoreError> {
        let row = OutcomeRow::from_domain(outcome)?;
        let key = AggregateKey {
            strategy: outcome.strategy_used,
            platform: outcome.platform,
            value_tier: ValueTier::classify(outcome.estimated_value),
        };
        let mut conn = self.connection()?;

        conn.transaction(|conn| {
            let previous: Option<OutcomeRow> = auction_outcomes::table
                .find(&outcome.auction_id)
                .first(conn)
                .optional()?;

            diesel::replace_into(auction_outcomes::table)
                .values(&row)
                .execute(conn)?;

            if let Some(previous) = previous {
                let previous = previous
                    .into_domain()
                    .map_err(|_| diesel::result::Error::RollbackTransaction)?;
                let previous_key = AggregateKey {
                    strategy: previous.strategy_used,
                    platform: previous.platform,
                    value_tier: ValueTier::classify(previous.estimated_value),
                };
                Self::apply_aggregate(conn, &previous_key, previous.won, previous.profit_margin, true)?;
            }

            Self::apply_aggregate(conn, &key, outcome.won, outcome.profit_margin, false)?;

            Ok::<_, diesel::result::Error>(())
        })
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn record_round(&self, round: &RoundRecord) -> Result<(), StoreError> {
        let row = RoundRow::from_domain(round)?;
        let mut conn = self.connection()?;

        diesel::replace_into(auction_rounds::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_similar(
        &self,
        platform: Platform,
        value_min: Decimal,
        value_max: Decimal,
        limit: usize,
    ) -> Result<Vec<OutcomeRecord>, StoreError> {
        let mut conn = self.connection()?;
        let platform_tag = Self::tag(platform)?;

        let rows: Vec<OutcomeRow> = auction_outcomes::table
            .filter(auction_outcomes::platform.eq(platform_tag))
            .order(auction_outcomes::recorded_at.desc())
            .load(&mut conn)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut matches = Vec::new();
        for row in rows {
            let outcome = row.into_domain()?;
            if outcome.estimated_value >= value_min && outcome.estimated_value <= value_max {
                matches.push(outcome);
            }
            if matches.len() >= limit {
                break;
            }
        }
        Ok(matches)
    }

    async fn get_strategy_stats(
        &self,
        strategy: Strategy,
        platform: Platform,
        tier: ValueTier,
    ) -> Result<Option<AggregateStats>, StoreError> {
        let mut conn = self.connection()?;

        let row: Option<AggregateRow> = strategy_performance::table
            .find((Self::tag(strategy)?, Self::tag(platform)?, Self::tag(tier)?))
            .first(&mut conn)
            .optional()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(AggregateRow::into_domain)
            .transpose()
            .map(|opt| opt.map(|(_, stats)| stats))
    }

    async fn get_best_strategy(
        &self,
        platform: Platform,
        tier: ValueTier,
        min_samples: u64,
    ) -> Result<Option<(AggregateKey, AggregateStats)>, StoreError> {
        let mut conn = self.connection()?;
        let platform_tag = Self::tag(platform)?;
        let tier_tag = Self::tag(tier)?;

        let rows: Vec<AggregateRow> = strategy_performance::table
            .filter(strategy_performance::platform.eq(platform_tag))
            .filter(strategy_performance::value_tier.eq(tier_tag))
            .load(&mut conn)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut best: Option<(AggregateKey, AggregateStats)> = None;
        for row in rows {
            let (key, stats) = row.into_domain()?;
            if stats.total_uses < min_samples {
                continue;
            }
            let beats_current = best.as_ref().map_or(true, |(_, b)| stats.win_rate() > b.win_rate());
            if beats_current {
                best = Some((key, stats));
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn setup() -> SqliteHistoryStore {
        let pool = create_pool(":memory:", 5).unwrap();
        run_migrations(&pool).unwrap();
        SqliteHistoryStore::new(pool, 5_000)
    }

    fn outcome(id: &str, value: Decimal, won: bool, profit: Decimal) -> OutcomeRecord {
        OutcomeRecord {
            auction_id: id.to_string(),
            domain: "example.com".to_string(),
            platform: Platform::GoDaddy,
            estimated_value: value,
            final_price: value - dec!(50),
            won,
            profit_margin: profit,
            strategy_used: Strategy::ProxyMax,
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn record_outcome_is_idempotent_on_auction_id() {
        let store = setup();
        store.record_outcome(&outcome("a1", dec!(500), true, dec!(10))).await.unwrap();
        store.record_outcome(&outcome("a1", dec!(500), false, dec!(-5))).await.unwrap();

        let similar = store
            .get_similar(Platform::GoDaddy, dec!(0), dec!(1000), 10)
            .await
            .unwrap();
        assert_eq!(similar.len(), 1);
        assert!(!similar[0].won);

        let stats = store
            .get_strategy_stats(Strategy::ProxyMax, Platform::GoDaddy, ValueTier::Medium)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.total_uses, 1);
        assert_eq!(stats.wins, 0);
        assert_eq!(stats.total_profit, dec!(-5));
    }

    #[tokio::test]
    async fn record_outcome_unfolds_old_key_when_tier_changes() {
        let store = setup();
        store.record_outcome(&outcome("a1", dec!(500), true, dec!(10))).await.unwrap();
        // Re-record the same auction_id under a different value tier.
        store.record_outcome(&outcome("a1", dec!(50_000), false, dec!(-20))).await.unwrap();

        let old_tier_stats = store
            .get_strategy_stats(Strategy::ProxyMax, Platform::GoDaddy, ValueTier::Medium)
            .await
            .unwrap();
        assert!(old_tier_stats.is_none());

        let new_tier_stats = store
            .get_strategy_stats(Strategy::ProxyMax, Platform::GoDaddy, ValueTier::High)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(new_tier_stats.total_uses, 1);
        assert_eq!(new_tier_stats.wins, 0);
    }

    #[tokio::test]
    async fn aggregate_accumulates_across_outcomes() {
        let store = setup();
        store.record_outcome(&outcome("a1", dec!(500), true, dec!(10))).await.unwrap();
        store.record_outcome(&outcome("a2", dec!(550), false, dec!(-5))).await.unwrap();

        let stats = store
            .get_strategy_stats(Strategy::ProxyMax, Platform::GoDaddy, ValueTier::Medium)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.total_uses, 2);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.total_profit, dec!(5));
    }

    #[tokio::test]
    async fn best_strategy_requires_minimum_samples() {
        let store = setup();
        store.record_outcome(&outcome("a1", dec!(500), true, dec!(10))).await.unwrap();

        let best = store
            .get_best_strategy(Platform::GoDaddy, ValueTier::Medium, 5)
            .await
            .unwrap();
        assert!(best.is_none());
    }

    #[tokio::test]
    async fn round_record_round_trips_through_get_similar_independent_table() {
        let store = setup();
        let round = RoundRecord {
            thread_id: "t1".to_string(),
            round_number: 1,
            strategy: Strategy::IncrementalTest,
            amount: dec!(75),
            result: crate::domain::RoundResult::Outbid,
            recorded_at: Utc::now(),
        };
        store.record_round(&round).await.unwrap();
        // rounds and outcomes are independent tables; recording a round must
        // not show up as an outcome.
        let similar = store
            .get_similar(Platform::GoDaddy, dec!(0), dec!(100_000), 10)
            .await
            .unwrap();
        assert!(similar.is_empty());
    }
}
