//! The mutable record threaded through one `decide()` invocation.
//!
//! Per §9 of the spec, this replaces a dynamic/duck-typed mapping with a
//! closed record: each stage writes exactly the fields its contract names,
//! and may read anything an earlier stage has already written. The type
//! system enforces the "write exactly your fields" half of that contract by
//! having stages return small, stage-specific structs that `Orchestrator`
//! folds into `PipelineState`, rather than letting every stage see a
//! mutable handle to the whole thing.

use uuid::Uuid;

use super::auction::AuctionContext;
use super::decision::StrategyDecision;
use super::final_decision::DecisionSource;
use super::intelligence::MarketIntelligence;
use super::proxy::ProxyDecision;

/// Pipeline state for a single `decide()` call.
///
/// Fields are `Option` in write order: a field is `Some` exactly when the
/// stage that produces it has run. `Orchestrator::decide` is the only code
/// that constructs and advances this type.
pub struct PipelineState {
    pub trace_id: Uuid,
    pub ctx: AuctionContext,

    pub intelligence: Option<MarketIntelligence>,
    pub safety_block: Option<String>,

    pub reasoner_output: Option<StrategyDecision>,
    pub validator_reason: Option<String>,

    pub selected: Option<StrategyDecision>,
    pub selected_source: Option<DecisionSource>,

    pub proxy: Option<ProxyDecision>,
}

impl PipelineState {
    #[must_use]
    pub fn new(ctx: AuctionContext, trace_id: Uuid) -> Self {
        Self {
            trace_id,
            ctx,
            intelligence: None,
            safety_block: None,
            reasoner_output: None,
            validator_reason: None,
            selected: None,
            selected_source: None,
            proxy: None,
        }
    }
}
