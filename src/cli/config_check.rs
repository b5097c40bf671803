//! `config check` subcommand: load and validate configuration without
//! running anything.

use std::path::Path;

use crate::app::Config;
use crate::cli::output;
use crate::error::Result;

/// Run `config check --config <path>`.
pub fn run(path: &Path) -> Result<()> {
    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Configuration");

    let config = Config::load(path)?;
    output::success(&format!("{} loaded and validated", path.display()));
    println!();

    output::field("reasoner.vendor", config.reasoner.vendor.as_deref().unwrap_or("none"));
    output::field("reasoner.model", &config.reasoner.model);
    output::field("store.database_path", &config.store.database_path);
    output::field("intelligence.tables_dir", &config.intelligence.tables_dir);
    output::field("logging.level", &config.logging.level);
    println!();

    if config.reasoner_configured() {
        output::success("reasoner is configured; the pipeline will call the LLM");
    } else {
        output::warning("reasoner is not configured; the pipeline will run rules-only");
    }

    Ok(())
}
