//! Diesel table definitions for the history database.
//!
//! Money and enum columns are stored as `TEXT` (decimal-string and
//! snake_case tag, respectively) rather than native numeric/enum types —
//! SQLite has no fixed-point type and Diesel's enum mapping would need a
//! custom `ToSql`/`FromSql` impl for one-off use, so the row types in
//! [`super::model`] parse on the way out instead.

diesel::table! {
    auction_outcomes (auction_id) {
        auction_id -> Text,
        domain -> Text,
        platform -> Text,
        estimated_value -> Text,
        final_price -> Text,
        won -> Bool,
        profit_margin -> Text,
        strategy_used -> Text,
        recorded_at -> Text,
    }
}

diesel::table! {
    auction_rounds (thread_id, round_number) {
        thread_id -> Text,
        round_number -> Integer,
        strategy -> Text,
        amount -> Text,
        result -> Text,
        recorded_at -> Text,
    }
}

diesel::table! {
    strategy_performance (strategy, platform, value_tier) {
        strategy -> Text,
        platform -> Text,
        value_tier -> Text,
        total_uses -> BigInt,
        wins -> BigInt,
        total_profit -> Text,
    }
}
