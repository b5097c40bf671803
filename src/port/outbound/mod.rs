//! Outbound (driven) ports implemented by infrastructure adapters.
//!
//! - [`reasoner`]: the external probabilistic reasoner (LLM) the Reasoner
//!   Adapter stage calls out to.
//! - [`store`]: the history store the History Recorder appends to and
//!   Market Intelligence reads from.

pub mod reasoner;
pub mod store;
