//! Adapter layer: implementations of the ports in `crate::port`.
//!
//! There is no inbound side — the CLI and `crate::app` call
//! `Orchestrator::decide` directly rather than through a driving adapter.

pub mod outbound;
