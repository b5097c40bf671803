//! Safety Gate (§4.2): deterministic pre-filter checks, evaluated in a
//! fixed order where the first failure blocks the whole pipeline.
//!
//! Grounded on the ordered-checks-first-failure-blocks shape used
//! elsewhere in this codebase for pre-trade risk checks: a small enum of
//! outcomes, one function per rule, and a driver that short-circuits on
//! the first rejection.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::AuctionContext;

/// Outcome of running the Safety Gate over an [`AuctionContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Clear,
    /// Carries the reason string attached to the blocked `FinalDecision`.
    Blocked(String),
}

/// Run the four safety checks in spec order. These thresholds are hard
/// constants; no caller can override them.
#[must_use]
pub fn check(ctx: &AuctionContext) -> Verdict {
    if let Some(reason) = valuation(ctx) {
        return Verdict::Blocked(reason);
    }
    if let Some(reason) = minimum_budget(ctx) {
        return Verdict::Blocked(reason);
    }
    if let Some(reason) = overpayment(ctx) {
        return Verdict::Blocked(reason);
    }
    if let Some(reason) = portfolio_concentration(ctx) {
        return Verdict::Blocked(reason);
    }
    Verdict::Clear
}

fn valuation(ctx: &AuctionContext) -> Option<String> {
    (ctx.estimated_value <= Decimal::ZERO).then(|| {
        format!(
            "valuation: estimated_value {} must be greater than zero",
            ctx.estimated_value
        )
    })
}

fn minimum_budget(ctx: &AuctionContext) -> Option<String> {
    (ctx.budget_available < Decimal::from(100)).then(|| {
        format!(
            "minimum_budget: budget_available {} is below the $100 floor",
            ctx.budget_available
        )
    })
}

fn overpayment(ctx: &AuctionContext) -> Option<String> {
    let ceiling = ctx.estimated_value * dec!(1.30);
    (ctx.current_bid > ceiling).then(|| {
        format!(
            "overpayment: current_bid {} exceeds 130% of estimated_value ({ceiling})",
            ctx.current_bid
        )
    })
}

fn portfolio_concentration(ctx: &AuctionContext) -> Option<String> {
    let cap = ctx.budget_available * dec!(0.50);
    (ctx.estimated_value > cap).then(|| {
        format!(
            "portfolio_concentration: estimated_value {} exceeds 50% of budget_available ({cap})",
            ctx.estimated_value
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BidderAnalysis, Platform};
    use rust_decimal_macros::dec;

    fn ctx() -> AuctionContext {
        AuctionContext {
            domain: "example.com".to_string(),
            platform: Platform::GoDaddy,
            estimated_value: dec!(1000),
            current_bid: dec!(100),
            your_current_proxy: dec!(0),
            budget_available: dec!(5000),
            num_bidders: 1,
            hours_remaining: 5.0,
            bidder_analysis: BidderAnalysis {
                bot_detected: false,
                corporate_buyer: false,
                aggression_score: 3.0,
                reaction_time_avg_s: 5.0,
            },
            thread_id: "t1".to_string(),
            last_bidder_id: None,
        }
    }

    #[test]
    fn clear_context_passes() {
        assert_eq!(check(&ctx()), Verdict::Clear);
    }

    #[test]
    fn zero_value_blocks() {
        let mut c = ctx();
        c.estimated_value = Decimal::ZERO;
        assert!(matches!(check(&c), Verdict::Blocked(r) if r.starts_with("valuation")));
    }

    #[test]
    fn budget_exactly_100_passes() {
        let mut c = ctx();
        c.budget_available = dec!(100);
        c.estimated_value = dec!(50);
        assert_eq!(check(&c), Verdict::Clear);
    }

    #[test]
    fn budget_below_100_blocks() {
        let mut c = ctx();
        c.budget_available = dec!(99.99);
        c.estimated_value = dec!(50);
        assert!(matches!(check(&c), Verdict::Blocked(r) if r.starts_with("minimum_budget")));
    }

    #[test]
    fn overpayment_exactly_130_percent_does_not_block() {
        let mut c = ctx();
        c.current_bid = dec!(1300);
        assert_eq!(check(&c), Verdict::Clear);
    }

    #[test]
    fn overpayment_above_130_percent_blocks() {
        let mut c = ctx();
        c.current_bid = dec!(1300.01);
        assert!(matches!(check(&c), Verdict::Blocked(r) if r.starts_with("overpayment")));
    }

    #[test]
    fn portfolio_concentration_blocks() {
        let mut c = ctx();
        c.estimated_value = dec!(3000);
        c.current_bid = dec!(100);
        assert!(matches!(check(&c), Verdict::Blocked(r) if r.starts_with("portfolio_concentration")));
    }

    #[test]
    fn first_failure_wins_ordering() {
        let mut c = ctx();
        c.estimated_value = Decimal::ZERO;
        c.budget_available = dec!(0);
        // Both valuation and minimum_budget would fail; valuation is first.
        assert!(matches!(check(&c), Verdict::Blocked(r) if r.starts_with("valuation")));
    }
}
