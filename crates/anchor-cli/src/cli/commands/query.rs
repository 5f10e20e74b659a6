use anyhow::Result;
use serde_json::json;

use super::helpers::{load_ledger, print_json, print_record};
use crate::cli::args::{GetArgs, GlobalArgs, LookupArgs, OutputFormat};
use crate::exit_codes::{NOT_FOUND, SUCCESS};

pub fn cmd_get(global: &GlobalArgs, args: GetArgs) -> Result<i32> {
    let ledger = load_ledger(global)?;
    match ledger.get_evidence(args.id) {
        Ok(record) => {
            print_record(record, global.format)?;
            Ok(SUCCESS)
        }
        Err(e) => {
            eprintln!("rejected [{}]: {}", e.code(), e);
            Ok(NOT_FOUND)
        }
    }
}

pub fn cmd_lookup(global: &GlobalArgs, args: LookupArgs) -> Result<i32> {
    let ledger = load_ledger(global)?;

    if args.strict {
        let Some(id) = ledger.find_evidence_id(&args.cid) else {
            eprintln!("not anchored: {}", args.cid);
            return Ok(NOT_FOUND);
        };
        match global.format {
            OutputFormat::Json => print_json(&json!({ "cid": args.cid, "id": id }))?,
            OutputFormat::Text => println!("{}", id),
        }
        return Ok(SUCCESS);
    }

    // Sentinel form: 0 means either "record 0" or "never anchored".
    let id = ledger.get_evidence_id_by_cid(&args.cid);
    let count = ledger.get_evidence_count();
    match global.format {
        OutputFormat::Json => print_json(&json!({ "cid": args.cid, "id": id, "count": count }))?,
        OutputFormat::Text => println!("{}", id),
    }
    Ok(SUCCESS)
}

pub fn cmd_count(global: &GlobalArgs) -> Result<i32> {
    let count = load_ledger(global)?.get_evidence_count();
    match global.format {
        OutputFormat::Json => print_json(&json!({ "count": count }))?,
        OutputFormat::Text => println!("{}", count),
    }
    Ok(SUCCESS)
}

pub fn cmd_list(global: &GlobalArgs) -> Result<i32> {
    let ledger = load_ledger(global)?;
    let records: Vec<_> = ledger.records().collect();

    match global.format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Text => {
            println!("{:<6} {:<25} {:<42} CID", "ID", "TIMESTAMP", "SUBMITTER");
            for r in &records {
                println!(
                    "{:<6} {:<25} {:<42} {}",
                    r.id,
                    r.timestamp.to_rfc3339(),
                    r.submitter,
                    r.ipfs_cid
                );
            }
            eprintln!("{} record(s)", records.len());
        }
    }
    Ok(SUCCESS)
}
