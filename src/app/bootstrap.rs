//! Wiring: turn a loaded [`Config`] into a running [`Orchestrator`] and
//! [`HistoryRecorder`], selecting adapters the way `app::config` describes.

use std::sync::Arc;

use crate::adapter::outbound::llm::{anthropic::Anthropic, openai::OpenAi};
use crate::adapter::outbound::sqlite::database::connection::{create_pool, run_migrations};
use crate::adapter::outbound::sqlite::SqliteHistoryStore;
use crate::adapter::outbound::tables::{load_tables, TableFiles};
use crate::application::history::HistoryRecorder;
use crate::application::intelligence::MarketIntelligenceEngine;
use crate::application::orchestrator::Orchestrator;
use crate::error::Error;
use crate::port::outbound::reasoner::Reasoner;

use super::config::Config;

/// Everything a running instance needs: the per-call decision engine and
/// the separate history-recording facade (§9: kept structurally apart).
pub struct App {
    pub orchestrator: Arc<Orchestrator>,
    pub history: HistoryRecorder<SqliteHistoryStore>,
}

/// Build a [`Reasoner`] from `[reasoner]`, or `None` for rules-only mode.
///
/// Per §6/§10, an unconfigured or credential-less vendor is not a startup
/// error — it just disables the Reasoner stage.
#[must_use]
pub fn build_reasoner(config: &Config) -> Option<Arc<dyn Reasoner>> {
    match config.reasoner.vendor.as_deref() {
        Some("anthropic") => Anthropic::from_env(config.reasoner.model.clone())
            .ok()
            .map(|r| Arc::new(r) as Arc<dyn Reasoner>),
        Some("openai") => OpenAi::from_env(config.reasoner.model.clone())
            .ok()
            .map(|r| Arc::new(r) as Arc<dyn Reasoner>),
        _ => None,
    }
}

/// Load the three Market Intelligence tables per `[intelligence]`.
///
/// A missing or malformed tables directory degrades to an all-unknown
/// engine (every lookup misses) rather than failing the whole process;
/// the load error is logged, not propagated.
#[must_use]
pub fn build_intelligence(config: &Config) -> Arc<MarketIntelligenceEngine> {
    let files = TableFiles::under(&config.intelligence.tables_dir);
    let tables = load_tables(&files).unwrap_or_else(|e| {
        tracing::warn!(
            tables_dir = %config.intelligence.tables_dir,
            error = %e,
            "failed to load market intelligence tables; running in all-unknown mode"
        );
        Default::default()
    });
    Arc::new(MarketIntelligenceEngine::new(tables))
}

/// Open (and migrate) the SQLite history database per `[store]`.
///
/// # Errors
/// Returns [`Error::Store`] if the pool can't be created or migrations fail.
pub fn build_store(config: &Config) -> Result<SqliteHistoryStore, Error> {
    let pool = create_pool(&config.store.database_path, config.store.pool_size)?;
    run_migrations(&pool)?;
    Ok(SqliteHistoryStore::new(pool, config.store.busy_timeout_ms))
}

/// Build the full [`App`] from a loaded [`Config`].
///
/// # Errors
/// Propagates whatever [`build_store`] returns.
pub fn build_app(config: &Config) -> Result<App, Error> {
    let reasoner = build_reasoner(config);
    let intelligence = build_intelligence(config);
    let store = build_store(config)?;

    Ok(App {
        orchestrator: Arc::new(Orchestrator::new(reasoner, intelligence)),
        history: HistoryRecorder::new(store),
    })
}
