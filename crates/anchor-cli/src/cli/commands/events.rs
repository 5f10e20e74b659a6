use anchor_ledger::{EventLog, EvidenceAnchored};
use anyhow::Result;

use super::helpers::{load_ledger, print_json};
use crate::cli::args::{GlobalArgs, OutputFormat};
use crate::exit_codes::SUCCESS;

/// Re-derive the anchor log of every record, in id order.
pub fn run(global: &GlobalArgs) -> Result<i32> {
    let logs: Vec<EventLog> = load_ledger(global)?
        .records()
        .map(|record| EvidenceAnchored::from_record(record).to_log())
        .collect();

    match global.format {
        OutputFormat::Json => print_json(&logs)?,
        OutputFormat::Text => {
            for log in &logs {
                println!(
                    "EvidenceAnchored id={} cid={} submitter={}",
                    log.event.id, log.event.ipfs_cid, log.event.submitter
                );
                for topic in &log.topics {
                    println!("  {}", topic);
                }
            }
        }
    }
    Ok(SUCCESS)
}
