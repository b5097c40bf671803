//! SQLite persistence adapters.
//!
//! [`store::SqliteHistoryStore`] implements the [`crate::port::outbound::store::HistoryStore`]
//! port over a Diesel-managed SQLite database.

pub mod database;
pub mod store;

pub use store::SqliteHistoryStore;
