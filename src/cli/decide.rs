//! `decide` subcommand: run the pipeline on one `AuctionContext`.

use tabled::{Table, Tabled};

use crate::app::App;
use crate::cli::{banner, io, output, DecideArgs, OutputFormat};
use crate::domain::AuctionContext;
use crate::error::Result;

#[derive(Tabled)]
struct DecisionRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Run `decide --input ... [--format ...]`.
///
/// Exits non-zero only when the input itself is structurally invalid
/// (`Error::InvalidInput`); a `system_error` decision is still a
/// successful CLI invocation whose output reports that source.
pub async fn run(app: &App, args: &DecideArgs) -> Result<()> {
    let ctx: AuctionContext = io::read_json(&args.input)?;
    ctx.validate()?;

    let decision = app.orchestrator.decide(ctx, None).await;

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        OutputFormat::Table => {
            banner::print_banner();
            output::header(env!("CARGO_PKG_VERSION"));
            output::section("Decision");

            let rows = vec![
                DecisionRow {
                    field: "strategy",
                    value: format!("{:?}", decision.strategy),
                },
                DecisionRow {
                    field: "amount",
                    value: decision.amount.to_string(),
                },
                DecisionRow {
                    field: "confidence",
                    value: format!("{:.2}", decision.confidence),
                },
                DecisionRow {
                    field: "risk_level",
                    value: format!("{:?}", decision.risk_level),
                },
                DecisionRow {
                    field: "new_proxy_max",
                    value: decision.new_proxy_max.to_string(),
                },
                DecisionRow {
                    field: "next_bid_amount",
                    value: decision.next_bid_amount.to_string(),
                },
                DecisionRow {
                    field: "proxy_action",
                    value: format!("{:?}", decision.proxy_action),
                },
                DecisionRow {
                    field: "decision_source",
                    value: format!("{:?}", decision.decision_source),
                },
                DecisionRow {
                    field: "trace_id",
                    value: decision.trace_id.to_string(),
                },
            ];
            let table = Table::new(rows).to_string();
            for line in table.lines() {
                println!("  {line}");
            }
            println!();
            println!("  {}", decision.reasoning);
            if let Some(reason) = &decision.block_reason {
                output::warning(reason);
            }
        }
    }

    Ok(())
}
