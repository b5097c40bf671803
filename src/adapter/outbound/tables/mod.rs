//! JSON-file-backed Market Intelligence table loader.
//!
//! The three pattern-statistics tables (§4.1) are small, hand-curated,
//! and updated out-of-band from the binary's own lifecycle, so they are
//! loaded as plain JSON arrays rather than through the history database.

mod loader;

pub use loader::{load_tables, TableFiles};
