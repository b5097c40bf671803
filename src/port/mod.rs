//! Hexagonal ports for the decision engine.
//!
//! The application core (`crate::application`) depends only on the traits
//! in [`outbound`]; concrete implementations live under `crate::adapter`.
//! There is no inbound port module because the core's only entry point,
//! `Orchestrator::decide`, is called directly by `crate::app` and
//! `crate::cli` rather than through a driving adapter.

pub mod outbound;
