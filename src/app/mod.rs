//! Application layer: configuration and wiring.

pub mod bootstrap;
pub mod config;

pub use bootstrap::{build_app, App};
pub use config::Config;
