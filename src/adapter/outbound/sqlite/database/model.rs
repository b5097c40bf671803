//! Database row types for Diesel ORM.
//!
//! Decimal and enum fields round-trip through `TEXT` via the
//! `TryFrom`/`From` impls below rather than Diesel's own (de)serialization,
//! per the note on [`super::schema`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::{auction_outcomes, auction_rounds, strategy_performance};
use crate::domain::{
    AggregateKey, AggregateStats, OutcomeRecord, Platform, RoundRecord, RoundResult, Strategy,
    ValueTier,
};
use crate::error::StoreError;

fn enum_to_text<T: serde::Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| StoreError::Serialize("failed to encode tag".to_string()))
}

fn enum_from_text<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, StoreError> {
    serde_json::from_value(serde_json::Value::String(text.to_string()))
        .map_err(|e| StoreError::Serialize(format!("bad tag {text:?}: {e}")))
}

fn decimal_from_text(text: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(text).map_err(|e| StoreError::Serialize(format!("bad decimal {text:?}: {e}")))
}

fn timestamp_from_text(text: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Serialize(format!("bad timestamp {text:?}: {e}")))
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = auction_outcomes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OutcomeRow {
    pub auction_id: String,
    pub domain: String,
    pub platform: String,
    pub estimated_value: String,
    pub final_price: String,
    pub won: bool,
    pub profit_margin: String,
    pub strategy_used: String,
    pub recorded_at: String,
}

impl OutcomeRow {
    pub fn from_domain(outcome: &OutcomeRecord) -> Result<Self, StoreError> {
        Ok(Self {
            auction_id: outcome.auction_id.clone(),
            domain: outcome.domain.clone(),
            platform: enum_to_text(&outcome.platform)?,
            estimated_value: outcome.estimated_value.to_string(),
            final_price: outcome.final_price.to_string(),
            won: outcome.won,
            profit_margin: outcome.profit_margin.to_string(),
            strategy_used: enum_to_text(&outcome.strategy_used)?,
            recorded_at: outcome.recorded_at.to_rfc3339(),
        })
    }

    pub fn into_domain(self) -> Result<OutcomeRecord, StoreError> {
        Ok(OutcomeRecord {
            auction_id: self.auction_id,
            domain: self.domain,
            platform: enum_from_text::<Platform>(&self.platform)?,
            estimated_value: decimal_from_text(&self.estimated_value)?,
            final_price: decimal_from_text(&self.final_price)?,
            won: self.won,
            profit_margin: decimal_from_text(&self.profit_margin)?,
            strategy_used: enum_from_text::<Strategy>(&self.strategy_used)?,
            recorded_at: timestamp_from_text(&self.recorded_at)?,
        })
    }
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = auction_rounds)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RoundRow {
    pub thread_id: String,
    pub round_number: i32,
    pub strategy: String,
    pub amount: String,
    pub result: String,
    pub recorded_at: String,
}

impl RoundRow {
    pub fn from_domain(round: &RoundRecord) -> Result<Self, StoreError> {
        Ok(Self {
            thread_id: round.thread_id.clone(),
            round_number: i32::try_from(round.round_number)
                .map_err(|_| StoreError::Serialize("round_number overflowed i32".to_string()))?,
            strategy: enum_to_text(&round.strategy)?,
            amount: round.amount.to_string(),
            result: enum_to_text(&round.result)?,
            recorded_at: round.recorded_at.to_rfc3339(),
        })
    }

    pub fn into_domain(self) -> Result<RoundRecord, StoreError> {
        Ok(RoundRecord {
            thread_id: self.thread_id,
            round_number: u32::try_from(self.round_number)
                .map_err(|_| StoreError::Serialize("negative round_number in row".to_string()))?,
            strategy: enum_from_text::<Strategy>(&self.strategy)?,
            amount: decimal_from_text(&self.amount)?,
            result: enum_from_text::<RoundResult>(&self.result)?,
            recorded_at: timestamp_from_text(&self.recorded_at)?,
        })
    }
}

#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = strategy_performance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AggregateRow {
    pub strategy: String,
    pub platform: String,
    pub value_tier: String,
    pub total_uses: i64,
    pub wins: i64,
    pub total_profit: String,
}

impl AggregateRow {
    pub fn from_domain(key: &AggregateKey, stats: &AggregateStats) -> Result<Self, StoreError> {
        Ok(Self {
            strategy: enum_to_text(&key.strategy)?,
            platform: enum_to_text(&key.platform)?,
            value_tier: enum_to_text(&key.value_tier)?,
            total_uses: i64::try_from(stats.total_uses)
                .map_err(|_| StoreError::Serialize("total_uses overflowed i64".to_string()))?,
            wins: i64::try_from(stats.wins)
                .map_err(|_| StoreError::Serialize("wins overflowed i64".to_string()))?,
            total_profit: stats.total_profit.to_string(),
        })
    }

    pub fn into_domain(self) -> Result<(AggregateKey, AggregateStats), StoreError> {
        let key = AggregateKey {
            strategy: enum_from_text::<Strategy>(&self.strategy)?,
            platform: enum_from_text::<Platform>(&self.platform)?,
            value_tier: enum_from_text::<ValueTier>(&self.value_tier)?,
        };
        let stats = AggregateStats {
            total_uses: u64::try_from(self.total_uses)
                .map_err(|_| StoreError::Serialize("negative total_uses in row".to_string()))?,
            wins: u64::try_from(self.wins)
                .map_err(|_| StoreError::Serialize("negative wins in row".to_string()))?,
            total_profit: decimal_from_text(&self.total_profit)?,
        };
        Ok((key, stats))
    }
}
