use anchor_ledger::load_ledger;
use anyhow::{bail, Result};
use serde_json::json;

use super::helpers::{load_config, print_json};
use crate::cli::args::{GlobalArgs, OutputFormat};
use crate::exit_codes::{INTERNAL_ERROR, SUCCESS};

pub fn run(global: &GlobalArgs) -> Result<i32> {
    let config = load_config(global)?;
    let Some(path) = config.journal_path else {
        bail!("verify requires a journal path");
    };

    let outcome = load_ledger(&path);
    let (ok, detail, count) = match &outcome {
        Ok(ledger) => (true, "OK".to_string(), ledger.get_evidence_count()),
        Err(e) => (false, e.to_string(), 0),
    };

    match global.format {
        OutputFormat::Json => print_json(&json!({
            "journal": path.display().to_string(),
            "verified": ok,
            "records": count,
            "detail": detail,
        }))?,
        OutputFormat::Text if ok => {
            eprintln!("Journal verified ({}, {} records): OK", path.display(), count)
        }
        OutputFormat::Text => eprintln!("Journal verification failed: {}", detail),
    }

    Ok(if ok { SUCCESS } else { INTERNAL_ERROR })
}
