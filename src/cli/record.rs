//! `record outcome` / `record round` subcommands.

use crate::app::App;
use crate::cli::{io, output, RecordInputArgs};
use crate::domain::{OutcomeRecord, RoundRecord};
use crate::error::Result;

/// Run `record outcome --input ...`.
pub async fn outcome(app: &App, args: &RecordInputArgs) -> Result<()> {
    let record: OutcomeRecord = io::read_json(&args.input)?;
    app.history.record_outcome(&record).await?;
    output::success(&format!("recorded outcome for auction {}", record.auction_id));
    Ok(())
}

/// Run `record round --input ...`.
pub async fn round(app: &App, args: &RecordInputArgs) -> Result<()> {
    let record: RoundRecord = io::read_json(&args.input)?;
    app.history.record_round(&record).await?;
    output::success(&format!(
        "recorded round {} for thread {}",
        record.round_number, record.thread_id
    ));
    Ok(())
}
