//! Reasoner Adapter (§4.3): builds the structured prompt, calls the
//! injected [`Reasoner`], and parses/coerces its response into a
//! [`StrategyDecision`].
//!
//! Every failure mode — transport error, timeout, missing credentials,
//! unparseable output, schema mismatch, or semantic impossibility — is
//! swallowed here and surfaces to the orchestrator as `None`. This stage
//! never returns an `Err` to its caller; it only logs one.

use std::time::Duration;

use rust_decimal::Decimal;

use crate::domain::{AuctionContext, MarketIntelligence, Strategy, StrategyDecision, ValueTier};
use crate::port::outbound::reasoner::Reasoner;

use super::proxy_calculator::{hard_ceiling, safe_max};

/// Propose a strategy via the external reasoner. Returns `None` on any
/// failure; never propagates an error to the caller.
pub async fn propose(
    reasoner: &dyn Reasoner,
    ctx: &AuctionContext,
    intel: &MarketIntelligence,
    previous_attempts: Option<&str>,
    deadline: Duration,
    trace_id: uuid::Uuid,
) -> Option<StrategyDecision> {
    let system_prompt = system_prompt();
    let user_prompt = build_user_prompt(ctx, intel, previous_attempts);

    let raw = match reasoner.reason(&system_prompt, &user_prompt, deadline).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(%trace_id, provider = reasoner.name(), error = %err, "reasoner call failed; falling back");
            return None;
        }
    };

    let json = match extract_json(&raw) {
        Some(json) => json,
        None => {
            tracing::warn!(%trace_id, provider = reasoner.name(), "reasoner response had no JSON payload");
            return None;
        }
    };

    let decision: StrategyDecision = match serde_json::from_str(json) {
        Ok(decision) => decision,
        Err(err) => {
            tracing::warn!(%trace_id, provider = reasoner.name(), error = %err, "reasoner response failed schema parse");
            return None;
        }
    };

    if let Some(reason) = semantic_problem(&decision) {
        tracing::warn!(%trace_id, provider = reasoner.name(), reason, "reasoner response was semantically impossible");
        return None;
    }

    Some(decision)
}

/// System prompt: the fixed framing given on every call.
fn system_prompt() -> String {
    "You are a bidding strategist for domain-name auctions. Respond with a single JSON object \
     matching the given schema and nothing else. Never recommend a negative bid amount, and \
     never exceed the stated ceilings."
        .to_string()
}

/// Build the structured user prompt: compact context, derived tier and
/// ceilings, platform notes, the allowed strategy labels, the Market
/// Intelligence enrichment, and an optional prior-attempts summary.
fn build_user_prompt(
    ctx: &AuctionContext,
    intel: &MarketIntelligence,
    previous_attempts: Option<&str>,
) -> String {
    let tier = ValueTier::classify(ctx.estimated_value);
    let safe_max = safe_max(ctx.estimated_value);
    let hard_ceiling = hard_ceiling(ctx.estimated_value);
    let intel_json =
        serde_json::to_string_pretty(intel).unwrap_or_else(|_| "{}".to_string());

    let mut prompt = format!(
        "Auction context:\n\
         - domain: {domain}\n\
         - platform: {platform:?}\n\
         - value_tier: {tier:?}\n\
         - estimated_value: {value}\n\
         - current_bid: {bid}\n\
         - your_current_proxy: {proxy}\n\
         - budget_available: {budget}\n\
         - num_bidders: {bidders}\n\
         - hours_remaining: {hours}\n\
         - bot_detected: {bot}\n\
         - aggression_score: {aggression}\n\
         \n\
         Caps: safe_max (70%) = {safe_max}, hard_ceiling (80%) = {hard_ceiling}.\n\
         \n\
         {platform_notes}\n\
         \n\
         Market intelligence:\n{intel_json}\n\
         \n\
         Allowed strategy labels: proxy_max, last_minute_snipe, incremental_test, \
         wait_for_closeout, aggressive_early, do_not_bid.\n\
         \n\
         Respond with JSON: {{\"strategy\": ..., \"recommended_bid_amount\": ..., \
         \"confidence\": ..., \"risk_level\": ..., \"reasoning\": \"...\"}}",
        domain = ctx.domain,
        platform = ctx.platform,
        bid = ctx.current_bid,
        value = ctx.estimated_value,
        proxy = ctx.your_current_proxy,
        budget = ctx.budget_available,
        bidders = ctx.num_bidders,
        hours = ctx.hours_remaining,
        bot = ctx.bidder_analysis.bot_detected,
        aggression = ctx.bidder_analysis.aggression_score,
        platform_notes = platform_notes(ctx.platform),
    );

    if let Some(attempts) = previous_attempts {
        prompt.push_str(&format!("\n\nPrevious attempts in this thread:\n{attempts}"));
    }

    prompt
}

fn platform_notes(platform: crate::domain::Platform) -> &'static str {
    match platform {
        crate::domain::Platform::GoDaddy => {
            "Platform notes: GoDaddy extends the auction on late bids; late snipes often fail."
        }
        crate::domain::Platform::NameJet => {
            "Platform notes: NameJet does not extend; last-minute snipes are effective."
        }
        crate::domain::Platform::Dynadot => {
            "Platform notes: Dynadot's bid increment scales with the current bid."
        }
    }
}

/// Pull a JSON object out of the reasoner's raw text, tolerating a
/// markdown fenced block around it.
fn extract_json(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let start = start + "```json".len();
        let end = text[start..].find("```").map_or(text.len(), |i| start + i);
        let candidate = text[start..end].trim();
        if !candidate.is_empty() {
            return Some(candidate);
        }
    }
    let start = text.find('{')?;
    let end = text.rfind('}')? + 1;
    if end <= start {
        return None;
    }
    Some(&text[start..end])
}

/// Checks the reasoner's own structural invariant plus the range checks
/// that would otherwise only surface as silently-wrong numbers: a negative
/// bid, or a confidence outside `[0, 1]`.
fn semantic_problem(decision: &StrategyDecision) -> Option<&'static str> {
    if decision.recommended_bid_amount < Decimal::ZERO {
        return Some("negative recommended_bid_amount");
    }
    if !(0.0..=1.0).contains(&decision.confidence) {
        return Some("confidence outside [0, 1]");
    }
    if !decision.is_structurally_valid() {
        return Some("do_not_bid with nonzero amount");
    }
    if decision.strategy == Strategy::DoNotBid && decision.reasoning.trim().is_empty() {
        return Some("do_not_bid with empty reasoning");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_from_fenced_block() {
        let text = "here you go:\n```json\n{\"a\": 1}\n```\nthanks";
        assert_eq!(extract_json(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn extracts_raw_json_object() {
        let text = "prefix {\"a\": 1} suffix";
        assert_eq!(extract_json(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn returns_none_when_no_json_present() {
        assert_eq!(extract_json("no json here"), None);
    }

    #[test]
    fn negative_bid_is_semantically_impossible() {
        let decision = StrategyDecision {
            strategy: Strategy::ProxyMax,
            recommended_bid_amount: Decimal::from(-5),
            confidence: 0.8,
            risk_level: crate::domain::RiskLevel::Medium,
            reasoning: "x".repeat(100),
        };
        assert!(semantic_problem(&decision).is_some());
    }

    #[test]
    fn confidence_out_of_range_is_semantically_impossible() {
        let decision = StrategyDecision {
            strategy: Strategy::ProxyMax,
            recommended_bid_amount: Decimal::from(100),
            confidence: 1.5,
            risk_level: crate::domain::RiskLevel::Medium,
            reasoning: "x".repeat(100),
        };
        assert!(semantic_problem(&decision).is_some());
    }

    #[test]
    fn well_formed_decision_has_no_semantic_problem() {
        let decision = StrategyDecision {
            strategy: Strategy::ProxyMax,
            recommended_bid_amount: Decimal::from(100),
            confidence: 0.8,
            risk_level: crate::domain::RiskLevel::Medium,
            reasoning: "x".repeat(100),
        };
        assert!(semantic_problem(&decision).is_none());
    }
}
