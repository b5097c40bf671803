//! Orchestrator (§4.7): the state machine that drives the pipeline from
//! `ENRICH` through `FINALIZE` and produces the audited [`FinalDecision`].
//!
//! ```text
//! START → ENRICH → SAFETY
//! SAFETY --blocked--> FINALIZE(safety_block)
//! SAFETY --ok--> REASON → VALIDATE
//! VALIDATE --valid--> PROXY
//! VALIDATE --invalid/missing--> RULES → PROXY
//! PROXY --ok--> FINALIZE(source=llm|rules_fallback)
//! ANY --unhandled exception--> FINALIZE(system_error, do_not_bid)
//! ```
//!
//! Per §9, the Reasoner and the Market Intelligence tables are injected
//! collaborators rather than process-wide singletons; there is no
//! History Store here because the History Recorder sits outside the
//! per-call pipeline (§4.8) and is invoked by the caller separately.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{DecisionSource, FinalDecision, PipelineState, RoundRecord, Strategy};
use crate::port::outbound::reasoner::Reasoner;

use super::{intelligence::MarketIntelligenceEngine, proxy_calculator, reasoner_adapter, rule_selector, safety, validator};

/// Default deadline for the whole `decide()` call when none is given.
const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);
/// Slice of the overall deadline reserved for the Reasoner call; the rest
/// covers enrichment, validation, rule selection, and proxy math, none of
/// which should need more than a few milliseconds.
const REASONER_DEADLINE_FRACTION: f64 = 0.85;

pub struct Orchestrator {
    reasoner: Option<Arc<dyn Reasoner>>,
    intelligence: Arc<MarketIntelligenceEngine>,
}

impl Orchestrator {
    /// Build an orchestrator. `reasoner: None` runs the engine in
    /// rules-only mode (missing credentials per §6 must not fail
    /// startup); every successful decision then reports
    /// `decision_source = rules_fallback`.
    #[must_use]
    pub fn new(reasoner: Option<Arc<dyn Reasoner>>, intelligence: Arc<MarketIntelligenceEngine>) -> Self {
        Self {
            reasoner,
            intelligence,
        }
    }

    /// Run one `decide()` call. Never panics past this boundary and
    /// always returns a `FinalDecision`.
    pub async fn decide(self: &Arc<Self>, ctx: crate::domain::AuctionContext, deadline: Option<Duration>) -> FinalDecision {
        self.decide_with_previous_rounds(ctx, deadline, &[]).await
    }

    /// As [`Orchestrator::decide`], but with prior rounds of the same
    /// thread folded into the Reasoner's prompt as a "previous attempts"
    /// summary.
    pub async fn decide_with_previous_rounds(
        self: &Arc<Self>,
        ctx: crate::domain::AuctionContext,
        deadline: Option<Duration>,
        previous_rounds: &[RoundRecord],
    ) -> FinalDecision {
        let trace_id = Uuid::new_v4();
        let started = Instant::now();
        let deadline = deadline.unwrap_or(DEFAULT_DEADLINE);
        let previous_attempts = summarize_previous_rounds(previous_rounds);

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            this.run_pipeline(ctx, trace_id, deadline, previous_attempts)
                .await
        });

        match handle.await {
            Ok(state) => finalize(state, trace_id, started.elapsed()),
            Err(join_err) if join_err.is_panic() => {
                tracing::error!(%trace_id, "pipeline task panicked");
                system_error(trace_id, started.elapsed(), "internal error")
            }
            Err(join_err) => {
                tracing::error!(%trace_id, error = %join_err, "pipeline task failed to complete");
                system_error(trace_id, started.elapsed(), "pipeline task failed to complete")
            }
        }
    }

    async fn run_pipeline(
        &self,
        ctx: crate::domain::AuctionContext,
        trace_id: Uuid,
        deadline: Duration,
        previous_attempts: Option<String>,
    ) -> PipelineState {
        let mut state = PipelineState::new(ctx, trace_id);

        // ENRICH
        state.intelligence = Some(self.intelligence.enrich(&state.ctx));

        // SAFETY
        match safety::check(&state.ctx) {
            safety::Verdict::Blocked(reason) => {
                tracing::info!(%trace_id, reason, "safety gate blocked");
                state.safety_block = Some(reason);
                return state;
            }
            safety::Verdict::Clear => {}
        }

        // REASON
        let reasoner_deadline = deadline.mul_f64(REASONER_DEADLINE_FRACTION);
        let reasoner_output = match &self.reasoner {
            Some(reasoner) => {
                let intel = state.intelligence.as_ref().expect("intelligence set above");
                let call = reasoner_adapter::propose(
                    reasoner.as_ref(),
                    &state.ctx,
                    intel,
                    previous_attempts.as_deref(),
                    reasoner_deadline,
                    trace_id,
                );
                match tokio::time::timeout(reasoner_deadline, call).await {
                    Ok(output) => output,
                    Err(_) => {
                        tracing::warn!(%trace_id, "reasoner call hit the orchestrator deadline");
                        None
                    }
                }
            }
            None => None,
        };
        state.reasoner_output = reasoner_output.clone();

        // VALIDATE
        let chosen = match reasoner_output {
            Some(decision) => match validator::validate(&decision, &state.ctx) {
                Ok(()) => {
                    state.selected_source = Some(DecisionSource::Llm);
                    decision
                }
                Err(reason) => {
                    tracing::info!(%trace_id, reason, "validator rejected reasoner output");
                    state.validator_reason = Some(reason);
                    state.selected_source = Some(DecisionSource::RulesFallback);
                    rule_selector::select(&state.ctx)
                }
            },
            None => {
                state.selected_source = Some(DecisionSource::RulesFallback);
                rule_selector::select(&state.ctx)
            }
        };

        // PROXY
        let proxy_outcome = proxy_calculator::calculate(&state.ctx);
        let chosen = if proxy_outcome.force_do_not_bid {
            crate::domain::StrategyDecision {
                strategy: Strategy::DoNotBid,
                recommended_bid_amount: Decimal::ZERO,
                confidence: chosen.confidence,
                risk_level: chosen.risk_level,
                reasoning: format!(
                    "{} (overridden to do_not_bid by the proxy calculator's loss-zone rule)",
                    chosen.reasoning
                ),
            }
        } else {
            chosen
        };

        state.proxy = Some(proxy_outcome.proxy);
        state.selected = Some(chosen);
        state
    }
}

fn summarize_previous_rounds(rounds: &[RoundRecord]) -> Option<String> {
    if rounds.is_empty() {
        return None;
    }
    let mut summary = String::new();
    for round in rounds {
        summary.push_str(&format!(
            "round {}: strategy={:?} amount={} result={:?}\n",
            round.round_number, round.strategy, round.amount, round.result
        ));
    }
    Some(summary)
}

fn finalize(state: PipelineState, trace_id: Uuid, elapsed: Duration) -> FinalDecision {
    if let Some(block_reason) = state.safety_block {
        return FinalDecision {
            strategy: Strategy::DoNotBid,
            amount: Decimal::ZERO,
            confidence: 0.95,
            risk_level: crate::domain::RiskLevel::Low,
            reasoning: block_reason.clone(),
            current_proxy: state.ctx.your_current_proxy,
            new_proxy_max: state.ctx.your_current_proxy,
            next_bid_amount: Decimal::ZERO,
            should_increase_proxy: false,
            proxy_action: crate::domain::ProxyAction::MaintainProxy,
            decision_source: DecisionSource::SafetyBlock,
            block_reason: Some(block_reason),
            trace_id,
            elapsed,
        };
    }

    let selected = state
        .selected
        .expect("non-blocked pipeline always selects a strategy");
    let proxy = state
        .proxy
        .expect("non-blocked pipeline always runs the proxy calculator");

    FinalDecision {
        strategy: selected.strategy,
        amount: selected.recommended_bid_amount,
        confidence: selected.confidence,
        risk_level: selected.risk_level,
        reasoning: selected.reasoning,
        current_proxy: proxy.current_proxy,
        new_proxy_max: proxy.new_proxy_max,
        next_bid_amount: proxy.next_bid_amount,
        should_increase_proxy: proxy.should_increase_proxy,
        proxy_action: proxy.proxy_action,
        decision_source: state.selected_source.unwrap_or(DecisionSource::RulesFallback),
        block_reason: state.validator_reason,
        trace_id,
        elapsed,
    }
}

fn system_error(trace_id: Uuid, elapsed: Duration, reason: &str) -> FinalDecision {
    FinalDecision {
        strategy: Strategy::DoNotBid,
        amount: Decimal::ZERO,
        confidence: 0.0,
        risk_level: crate::domain::RiskLevel::High,
        reasoning: reason.to_string(),
        current_proxy: Decimal::ZERO,
        new_proxy_max: Decimal::ZERO,
        next_bid_amount: Decimal::ZERO,
        should_increase_proxy: false,
        proxy_action: crate::domain::ProxyAction::MaintainProxy,
        decision_source: DecisionSource::SystemError,
        block_reason: Some(reason.to_string()),
        trace_id,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuctionContext, BidderAnalysis, Platform};
    use crate::testkit::StubReasoner;
    use rust_decimal_macros::dec;

    fn ctx() -> AuctionContext {
        AuctionContext {
            domain: "example.com".to_string(),
            platform: Platform::GoDaddy,
            estimated_value: dec!(1000),
            current_bid: dec!(1350),
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

    fn engine_with_no_reasoner() -> Arc<Orchestrator> {
        Arc::new(Orchestrator::new(
            None,
            Arc::new(MarketIntelligenceEngine::new(Default::default())),
        ))
    }

    #[tokio::test]
    async fn safety_overpayment_blocks() {
        let orchestrator = engine_with_no_reasoner();
        let final_decision = orchestrator.decide(ctx(), None).await;
        assert_eq!(final_decision.strategy, Strategy::DoNotBid);
        assert_eq!(final_decision.amount, Decimal::ZERO);
        assert_eq!(final_decision.decision_source, DecisionSource::SafetyBlock);
        assert!(final_decision.block_reason.unwrap().starts_with("overpayment"));
    }

    #[tokio::test]
    async fn rules_fallback_with_no_reasoner() {
        let orchestrator = engine_with_no_reasoner();
        let mut c = ctx();
        c.current_bid = dec!(50);
        c.your_current_proxy = dec!(0);
        c.num_bidders = 0;
        c.hours_remaining = 3.0;
        c.estimated_value = dec!(500);
        let final_decision = orchestrator.decide(c, None).await;
        assert_eq!(final_decision.decision_source, DecisionSource::RulesFallback);
        assert_eq!(final_decision.new_proxy_max, dec!(350.00));
        assert_eq!(final_decision.next_bid_amount, dec!(55));
    }

    #[tokio::test]
    async fn accept_loss_override_forces_do_not_bid_regardless_of_reasoner() {
        let reasoner = Arc::new(StubReasoner::always_proxy_max());
        let orchestrator = Arc::new(Orchestrator::new(
            Some(reasoner),
            Arc::new(MarketIntelligenceEngine::new(Default::default())),
        ));
        let mut c = ctx();
        c.current_bid = dec!(160);
        c.estimated_value = dec!(200);
        c.your_current_proxy = dec!(100);
        c.budget_available = dec!(5000);
        let final_decision = orchestrator.decide(c, None).await;
        assert_eq!(final_decision.strategy, Strategy::DoNotBid);
        assert_eq!(final_decision.proxy_action, crate::domain::ProxyAction::AcceptLoss);
    }

    #[tokio::test]
    async fn reasoner_success_path_reports_llm_source() {
        let reasoner = Arc::new(StubReasoner::always_proxy_max());
        let orchestrator = Arc::new(Orchestrator::new(
            Some(reasoner),
            Arc::new(MarketIntelligenceEngine::new(Default::default())),
        ));
        let mut c = ctx();
        c.estimated_value = dec!(2500);
        c.current_bid = dec!(100);
        c.your_current_proxy = dec!(0);
        c.num_bidders = 4;
        c.bidder_analysis.bot_detected = true;
        c.budget_available = dec!(5000);
        let final_decision = orchestrator.decide(c, None).await;
        assert_eq!(final_decision.decision_source, DecisionSource::Llm);
    }

    #[tokio::test]
    async fn termination_always_returns_one_of_four_sources() {
        let orchestrator = engine_with_no_reasoner();
        let final_decision = orchestrator.decide(ctx(), None).await;
        assert!(matches!(
            final_decision.decision_source,
            DecisionSource::Llm
                | DecisionSource::RulesFallback
                | DecisionSource::SafetyBlock
                | DecisionSource::SystemError
        ));
    }
}
