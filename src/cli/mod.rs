//! Command-line interface definitions.

pub mod banner;
pub mod config_check;
pub mod decide;
pub mod io;
pub mod output;
pub mod record;
pub mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "closeout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the decision pipeline on one auction context and print the result.
    Decide(DecideArgs),

    /// Feed a completed auction or round into the History Recorder.
    #[command(subcommand)]
    Record(RecordCommands),

    /// Query History Store aggregates.
    #[command(subcommand)]
    Stats(StatsCommands),

    /// Load and validate configuration without running anything.
    Config(ConfigCheckArgs),
}

/// Output format for `decide`.
#[derive(Debug, Clone, Copy, clap::ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

/// Arguments for the `decide` subcommand.
#[derive(Parser, Debug)]
pub struct DecideArgs {
    /// Path to a JSON `AuctionContext`, or `-` for stdin.
    #[arg(long)]
    pub input: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// Record a completed auction outcome.
    Outcome(RecordInputArgs),
    /// Record one round of a multi-round thread.
    Round(RecordInputArgs),
}

/// Arguments shared by `record outcome`/`record round`.
#[derive(Parser, Debug)]
pub struct RecordInputArgs {
    /// Path to a JSON record, or `-` for stdin.
    #[arg(long)]
    pub input: String,
}

#[derive(Subcommand, Debug)]
pub enum StatsCommands {
    /// The highest-win-rate strategy for a platform/tier.
    Best(StatsBestArgs),
    /// Aggregate performance for one strategy/platform/tier.
    Strategy(StatsStrategyArgs),
}

/// `platform`/`strategy`/`tier` are taken as raw strings (`go_daddy`,
/// `proxy_max`, ...) and parsed through the domain enums' own `serde`
/// impls in the handler, rather than duplicating the variant list in a
/// second `clap::ValueEnum` derive on the domain types.
#[derive(Parser, Debug)]
pub struct StatsBestArgs {
    #[arg(long)]
    pub platform: String,
    #[arg(long)]
    pub tier: String,
}

#[derive(Parser, Debug)]
pub struct StatsStrategyArgs {
    #[arg(long)]
    pub strategy: String,
    #[arg(long)]
    pub platform: String,
    #[arg(long)]
    pub tier: String,
}

/// Arguments for `config check`.
#[derive(Parser, Debug)]
pub struct ConfigCheckArgs {
    #[command(subcommand)]
    pub action: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Load and validate the configuration file.
    Check,
}
