//! Rule Selector (§4.5): the deterministic tier-and-context fallback used
//! whenever the Reasoner is unavailable or its output is rejected.
//!
//! Dispatch is a straight tier match, grounded on the same
//! "classify, then dispatch on the classification" shape the strategy
//! registry uses elsewhere in this codebase, simplified here to a plain
//! match since the branch set is closed and small.

use rust_decimal::Decimal;

use crate::domain::{AuctionContext, Platform, RiskLevel, Strategy, StrategyDecision, ValueTier};

use super::proxy_calculator::{hard_ceiling, safe_max};

/// Select a strategy deterministically from `ctx`'s value tier and
/// conditions. Always succeeds; confidence is always in `[0.70, 0.90]`.
#[must_use]
pub fn select(ctx: &AuctionContext) -> StrategyDecision {
    let tier = ValueTier::classify(ctx.estimated_value);
    let cap = safe_max(ctx.estimated_value)
        .min(ctx.budget_available)
        .min(hard_ceiling(ctx.estimated_value));

    let (strategy, confidence, risk_level) = match tier {
        ValueTier::High => select_high(ctx),
        ValueTier::Medium => select_medium(ctx),
        ValueTier::Low => select_low(ctx),
    };

    StrategyDecision {
        strategy,
        recommended_bid_amount: cap,
        confidence,
        risk_level,
        reasoning: reasoning_for(strategy, tier, ctx, cap),
    }
}

fn select_high(ctx: &AuctionContext) -> (Strategy, f64, RiskLevel) {
    if ctx.bidder_analysis.bot_detected {
        (Strategy::LastMinuteSnipe, 0.85, RiskLevel::High)
    } else if ctx.num_bidders >= 3 {
        (Strategy::LastMinuteSnipe, 0.80, RiskLevel::High)
    } else if ctx.num_bidders >= 1 {
        (Strategy::ProxyMax, 0.78, RiskLevel::Medium)
    } else if ctx.hours_remaining < 1.0 {
        (Strategy::WaitForCloseout, 0.70, RiskLevel::Low)
    } else {
        (Strategy::ProxyMax, 0.75, RiskLevel::Medium)
    }
}

fn select_medium(ctx: &AuctionContext) -> (Strategy, f64, RiskLevel) {
    if ctx.platform == Platform::GoDaddy && ctx.hours_remaining < 1.0 {
        (Strategy::LastMinuteSnipe, 0.80, RiskLevel::High)
    } else if ctx.num_bidders >= 3 {
        (Strategy::IncrementalTest, 0.75, RiskLevel::Medium)
    } else {
        (Strategy::ProxyMax, 0.75, RiskLevel::Medium)
    }
}

fn select_low(ctx: &AuctionContext) -> (Strategy, f64, RiskLevel) {
    if ctx.num_bidders == 0 {
        (Strategy::WaitForCloseout, 0.70, RiskLevel::Low)
    } else {
        (Strategy::IncrementalTest, 0.72, RiskLevel::Medium)
    }
}

/// Build reasoning text that clears the validator's keyword/length bar
/// (§4.4.4) even though the Rule Selector's output is never itself routed
/// back through the validator.
fn reasoning_for(strategy: Strategy, tier: ValueTier, ctx: &AuctionContext, cap: Decimal) -> String {
    format!(
        "Rule selector chose {strategy:?} for a {tier:?}-tier domain at {cap} given {n} active \
         bidders and {h:.1}h remaining; this balances expected profit against the competition \
         level and keeps risk within the platform's strategy guidelines.",
        n = ctx.num_bidders,
        h = ctx.hours_remaining,
    )
}
