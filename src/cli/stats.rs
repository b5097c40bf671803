//! `stats best` / `stats strategy` subcommands.

use crate::app::App;
use crate::cli::{io, output, StatsBestArgs, StatsStrategyArgs};
use crate::domain::{Platform, Strategy, ValueTier};
use crate::error::Result;

/// Run `stats best --platform ... --tier ...`.
pub async fn best(app: &App, args: &StatsBestArgs) -> Result<()> {
    let platform: Platform = io::parse_enum("platform", &args.platform)?;
    let tier: ValueTier = io::parse_enum("tier", &args.tier)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Best strategy");

    match app.history.best_strategy(platform, tier).await? {
        Some((key, stats)) => {
            output::field("strategy", format!("{:?}", key.strategy));
            output::field("platform", format!("{:?}", key.platform));
            output::field("value_tier", format!("{:?}", key.value_tier));
            output::field("total_uses", stats.total_uses);
            output::field("wins", stats.wins);
            output::field("win_rate", format!("{:.1}%", stats.win_rate() * 100.0));
            output::field("total_profit", stats.total_profit);
        }
        None => output::warning("no strategy has reached the minimum sample count yet"),
    }
    Ok(())
}

/// Run `stats strategy --strategy ... --platform ... --tier ...`.
pub async fn strategy(app: &App, args: &StatsStrategyArgs) -> Result<()> {
    let strategy: Strategy = io::parse_enum("strategy", &args.strategy)?;
    let platform: Platform = io::parse_enum("platform", &args.platform)?;
    let tier: ValueTier = io::parse_enum("tier", &args.tier)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Strategy performance");

    match app.history.strategy_stats(strategy, platform, tier).await? {
        Some(stats) => {
            output::field("total_uses", stats.total_uses);
            output::field("wins", stats.wins);
            output::field("win_rate", format!("{:.1}%", stats.win_rate() * 100.0));
            output::field("total_profit", stats.total_profit);
        }
        None => output::warning("no recorded outcomes for this strategy/platform/tier"),
    }
    Ok(())
}
