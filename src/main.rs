use clap::Parser;
use closeout::app::{build_app, Config};
use closeout::cli::{Cli, Commands, ConfigCommands, RecordCommands, StatsCommands};
use closeout::cli::{config_check, decide, output, record, stats};
use tracing::error;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Commands::Config(args) = &cli.command {
        match &args.action {
            ConfigCommands::Check => {
                if let Err(e) = config_check::run(&cli.config) {
                    output::error(&e.to_string());
                    std::process::exit(1);
                }
            }
        }
        return;
    }

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config {}: {e}", cli.config.display());
            std::process::exit(1);
        }
    };
    config.init_logging();

    let app = match build_app(&config) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "failed to build application");
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Commands::Decide(args) => decide::run(&app, args).await,
        Commands::Record(RecordCommands::Outcome(args)) => record::outcome(&app, args).await,
        Commands::Record(RecordCommands::Round(args)) => record::round(&app, args).await,
        Commands::Stats(StatsCommands::Best(args)) => stats::best(&app, args).await,
        Commands::Stats(StatsCommands::Strategy(args)) => stats::strategy(&app, args).await,
        Commands::Config(_) => unreachable!("handled above"),
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
