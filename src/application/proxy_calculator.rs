//! Proxy Calculator (§4.6): the mathematical outbid/proxy-adjustment engine.
//!
//! This is the one stage that can overrule an earlier one: the loss-zone
//! scenario forces `do_not_bid` unconditionally, per §9's "proxy override
//! tension" note. That override is surfaced as an explicit field on
//! [`ProxyOutcome`] rather than mutated into the strategy record directly,
//! so the orchestrator makes the branch visible instead of the proxy layer
//! reaching into the decision silently.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{AuctionContext, ProxyAction, ProxyDecision};

/// 70% of `estimated_value` — the target cap used by rules and this stage.
#[must_use]
pub fn safe_max(estimated_value: Decimal) -> Decimal {
    estimated_value * dec!(0.70)
}

/// 80% of `estimated_value` — the absolute cap enforced by the validator.
#[must_use]
pub fn hard_ceiling(estimated_value: Decimal) -> Decimal {
    estimated_value * dec!(0.80)
}

/// The result of the Proxy Calculator stage.
pub struct ProxyOutcome {
    pub proxy: ProxyDecision,
    /// Set when the loss-zone scenario fired. The orchestrator must replace
    /// the selected strategy with `do_not_bid` at amount zero when this is
    /// true; this stage does not touch the strategy record itself.
    pub force_do_not_bid: bool,
}

/// Compute the proxy adjustment for `ctx`, independent of which upstream
/// stage chose the current strategy.
#[must_use]
pub fn calculate(ctx: &AuctionContext) -> ProxyOutcome {
    let safe_max = safe_max(ctx.estimated_value);
    let hard_ceiling = hard_ceiling(ctx.estimated_value);
    let increment = ctx.platform.bid_increment(ctx.current_bid);
    let potential = safe_max.min(ctx.budget_available).min(hard_ceiling);

    if ctx.your_current_proxy.is_zero() {
        let proxy = ProxyDecision {
            current_proxy: ctx.your_current_proxy,
            current_bid: ctx.current_bid,
            safe_max,
            new_proxy_max: potential,
            next_bid_amount: ctx.current_bid + increment,
            max_budget_for_domain: potential,
            should_increase_proxy: true,
            proxy_action: ProxyAction::InitialSetup,
            explanation: format!(
                "no standing proxy; setting initial proxy to {potential} (70% safe max {safe_max}, \
                 budget {budget}, 80% ceiling {hard_ceiling})",
                budget = ctx.budget_available
            ),
        };
        return ProxyOutcome {
            proxy,
            force_do_not_bid: false,
        };
    }

    if safe_max <= ctx.current_bid {
        let proxy = ProxyDecision {
            current_proxy: ctx.your_current_proxy,
            current_bid: ctx.current_bid,
            safe_max,
            new_proxy_max: ctx.your_current_proxy,
            next_bid_amount: ctx.current_bid,
            max_budget_for_domain: potential,
            should_increase_proxy: false,
            proxy_action: ProxyAction::AcceptLoss,
            explanation: format!(
                "current bid {} has reached or passed the safe max {safe_max}; accepting the loss",
                ctx.current_bid
            ),
        };
        return ProxyOutcome {
            proxy,
            force_do_not_bid: true,
        };
    }

    // safe_max > current_bid: increase zone.
    if potential - ctx.your_current_proxy > increment * Decimal::from(3) {
        let proxy = ProxyDecision {
            current_proxy: ctx.your_current_proxy,
            current_bid: ctx.current_bid,
            safe_max,
            new_proxy_max: potential,
            next_bid_amount: ctx.current_bid + increment,
            max_budget_for_domain: potential,
            should_increase_proxy: true,
            proxy_action: ProxyAction::IncreaseProxy,
            explanation: format!(
                "room to raise proxy from {} to {potential} (more than 3 increments of headroom)",
                ctx.your_current_proxy
            ),
        };
        ProxyOutcome {
            proxy,
            force_do_not_bid: false,
        }
    } else {
        let proxy = ProxyDecision {
            current_proxy: ctx.your_current_proxy,
            current_bid: ctx.current_bid,
            safe_max,
            new_proxy_max: ctx.your_current_proxy,
            next_bid_amount: ctx.current_bid,
            max_budget_for_domain: potential,
            should_increase_proxy: false,
            proxy_action: ProxyAction::MaintainProxy,
            explanation: format!(
                "headroom to {potential} is within 3 increments of the current proxy {}; holding",
                ctx.your_current_proxy
            ),
        };
        ProxyOutcome {
            proxy,
            force_do_not_bid: false,
        }
    }
}
