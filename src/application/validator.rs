//! Validator (§4.4): hard post-checks on the Reasoner's output, evaluated
//! in order with the first failure rejecting the decision.

use rust_decimal::Decimal;

use crate::domain::{AuctionContext, RiskLevel, Strategy, StrategyDecision};

use super::proxy_calculator::hard_ceiling;

const REASONING_MIN_LEN: usize = 100;
const REASONING_KEYWORDS: [&str; 4] = ["profit", "risk", "competition", "strategy"];
const REASONING_MIN_KEYWORD_HITS: usize = 2;
const AGGRESSIVE_EARLY_MIN_VALUE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Validate a [`StrategyDecision`] against `ctx`. Returns the first
/// violated rule as a `KIND: details` string, in spec order.
pub fn validate(decision: &StrategyDecision, ctx: &AuctionContext) -> Result<(), String> {
    bid_ceiling(decision, ctx)?;
    budget_feasibility(decision, ctx)?;
    logical_consistency(decision, ctx)?;
    reasoning_quality(decision)?;
    context_fit(decision, ctx)?;
    Ok(())
}

fn bid_ceiling(decision: &StrategyDecision, ctx: &AuctionContext) -> Result<(), String> {
    let ceiling = hard_ceiling(ctx.estimated_value);
    if decision.recommended_bid_amount > ceiling {
        return Err(format!(
            "BID_CEILING: recommended amount {} exceeds the 80% hard ceiling {ceiling}",
            decision.recommended_bid_amount
        ));
    }
    Ok(())
}

fn budget_feasibility(decision: &StrategyDecision, ctx: &AuctionContext) -> Result<(), String> {
    if decision.recommended_bid_amount > ctx.budget_available {
        return Err(format!(
            "BUDGET_FEASIBILITY: recommended amount {} exceeds budget_available {}",
            decision.recommended_bid_amount, ctx.budget_available
        ));
    }
    Ok(())
}

fn logical_consistency(decision: &StrategyDecision, ctx: &AuctionContext) -> Result<(), String> {
    if decision.strategy == Strategy::DoNotBid && decision.recommended_bid_amount != Decimal::ZERO
    {
        return Err(
            "LOGICAL_CONSISTENCY: do_not_bid must carry a zero recommended_bid_amount".to_string(),
        );
    }
    if decision.strategy == Strategy::WaitForCloseout && ctx.num_bidders > 2 {
        return Err(format!(
            "LOGICAL_CONSISTENCY: wait_for_closeout requires num_bidders <= 2, got {}",
            ctx.num_bidders
        ));
    }
    if decision.risk_level == RiskLevel::Low && decision.confidence < 0.5 {
        return Err(format!(
            "LOGICAL_CONSISTENCY: low risk_level requires confidence >= 0.5, got {}",
            decision.confidence
        ));
    }
    Ok(())
}

fn reasoning_quality(decision: &StrategyDecision) -> Result<(), String> {
    if decision.reasoning.len() < REASONING_MIN_LEN {
        return Err(format!(
            "REASONING_QUALITY: reasoning is {} chars, below the {REASONING_MIN_LEN}-char floor",
            decision.reasoning.len()
        ));
    }
    let lower = decision.reasoning.to_lowercase();
    let hits = REASONING_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count();
    if hits < REASONING_MIN_KEYWORD_HITS {
        return Err(format!(
            "REASONING_QUALITY: reasoning mentions only {hits} of {REASONING_KEYWORDS:?}, need {REASONING_MIN_KEYWORD_HITS}"
        ));
    }
    Ok(())
}

fn context_fit(decision: &StrategyDecision, ctx: &AuctionContext) -> Result<(), String> {
    if decision.strategy == Strategy::AggressiveEarly
        && ctx.estimated_value < AGGRESSIVE_EARLY_MIN_VALUE
    {
        return Err(format!(
            "CONTEXT_FIT: aggressive_early requires estimated_value >= $500, got {}",
            ctx.estimated_value
        ));
    }
    Ok(())
}
