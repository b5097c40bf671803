//! In-process `HistoryStore`, backed by `dashmap`. Used for local/dev
//! runs via the CLI's `--memory` flag and shared with `crate::testkit`.

mod store;

pub use store::InMemoryHistoryStore;
