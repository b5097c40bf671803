//! Re-exported for tests: the same `dashmap`-backed store used by the
//! CLI's `--memory` mode, under the name tests reach for.

pub use crate::adapter::outbound::memory::InMemoryHistoryStore;
