//! Pure domain types shared by every pipeline stage.
//!
//! Nothing in this module performs I/O. Stages read and write these types;
//! the ports (`crate::port`) describe how the outside world is reached.

pub mod auction;
pub mod decision;
pub mod final_decision;
pub mod history;
pub mod intelligence;
pub mod proxy;
pub mod state;

pub use auction::{AuctionContext, BidderAnalysis, Platform};
pub use decision::{RiskLevel, Strategy, StrategyDecision, ValueTier};
pub use final_decision::{DecisionSource, FinalDecision};
pub use history::{AggregateKey, AggregateStats, OutcomeRecord, RoundRecord, RoundResult};
pub use intelligence::{
    ArchetypeStats, BehavioralCluster, BidderStats, DomainMatchType, DomainStats,
    EscalationSpeed, ExpectedValueAnalysis, MarketIntelligence, PricePercentiles,
    ResourcePriority,
};
pub use proxy::{ProxyAction, ProxyDecision};
pub use state::PipelineState;
