use anchor_ledger::{Address, CallContext};
use anyhow::{Context, Result};

use super::helpers::{open_handle, print_json, report_rejection};
use crate::cli::args::{GlobalArgs, OutputFormat, SubmitArgs};
use crate::exit_codes::SUCCESS;

pub async fn run(global: &GlobalArgs, args: SubmitArgs) -> Result<i32> {
    let submitter: Address = args
        .submitter
        .parse()
        .context("invalid --submitter")?;
    let handle = open_handle(global)?;

    let receipt = match handle
        .anchor_evidence(&args.cid, &CallContext::new(submitter))
        .await
    {
        Ok(receipt) => receipt,
        Err(e) => return Ok(report_rejection(&e)),
    };

    match global.format {
        OutputFormat::Json => print_json(&receipt)?,
        OutputFormat::Text => {
            println!("Anchored:    {}", args.cid);
            println!("ID:          {}", receipt.evidence_id);
            println!("Submitter:   {}", receipt.submitter);
            println!("Timestamp:   {}", receipt.timestamp.to_rfc3339());
            for log in &receipt.logs {
                for (i, topic) in log.topics.iter().enumerate() {
                    println!("Topic {}:     {}", i, topic);
                }
            }
        }
    }
    Ok(SUCCESS)
}
