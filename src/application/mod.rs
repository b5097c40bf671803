//! The decision pipeline: one module per stage of §4, plus the
//! [`orchestrator`] that drives them and the [`history`] facade the caller
//! invokes outside the per-call pipeline.
//!
//! Every stage here is a free function or a small struct over pure data;
//! the only I/O boundaries are the ports a stage is handed explicitly.

pub mod history;
pub mod intelligence;
pub mod orchestrator;
pub mod proxy_calculator;
pub mod reasoner_adapter;
pub mod rule_selector;
pub mod safety;
pub mod validator;
