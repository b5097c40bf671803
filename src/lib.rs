//! closeout — a safety-gated, LLM-assisted bidding decision engine for
//! domain-name auctions.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── domain/        # Pure types: AuctionContext, StrategyDecision, ...
//! ├── port/           # Outbound traits: Reasoner, HistoryStore
//! ├── application/    # The pipeline stages + Orchestrator
//! ├── adapter/        # Port implementations: Anthropic/OpenAI, SQLite, tables
//! ├── app/            # Config loading and wiring (bootstrap)
//! └── cli/             # clap-derived command surface
//! ```
//!
//! The only entry point that matters to a caller is
//! [`application::orchestrator::Orchestrator::decide`]: given an
//! [`domain::AuctionContext`] it always returns a [`domain::FinalDecision`],
//! never an error and never a panic that escapes the call.

pub mod adapter;
pub mod app;
pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
