//! Proxy-adjustment output of the Proxy Calculator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What the Proxy Calculator recommends doing with the standing proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyAction {
    AcceptLoss,
    IncreaseProxy,
    MaintainProxy,
    InitialSetup,
}

/// The mathematical outbid/proxy-adjustment recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyDecision {
    pub current_proxy: Decimal,
    pub current_bid: Decimal,
    pub safe_max: Decimal,
    pub new_proxy_max: Decimal,
    pub next_bid_amount: Decimal,
    pub max_budget_for_domain: Decimal,
    pub should_increase_proxy: bool,
    pub proxy_action: ProxyAction,
    pub explanation: String,
}
