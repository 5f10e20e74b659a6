use anchor_ledger::{AnchorError, EvidenceRecord, Ledger, LedgerConfig, LedgerHandle};
use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::args::{GlobalArgs, OutputFormat};
use crate::exit_codes::{INTERNAL_ERROR, NOT_FOUND, REJECTED};

/// Resolve config: defaults < YAML file < environment < flags.
pub fn load_config(global: &GlobalArgs) -> Result<LedgerConfig> {
    let base = match &global.config {
        Some(path) => LedgerConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LedgerConfig::default(),
    };
    let mut config = base.merge_env().context("invalid ANCHOR_* environment")?;

    if let Some(journal) = &global.journal {
        config.journal_path = Some(journal.clone());
    }
    if global.no_fsync {
        config.fsync = false;
    }
    Ok(config)
}

pub fn open_handle(global: &GlobalArgs) -> Result<LedgerHandle> {
    let config = load_config(global)?;
    LedgerHandle::open(&config).with_context(|| match &config.journal_path {
        Some(path) => format!("failed to open journal {}", path.display()),
        None => "failed to open in-memory ledger".to_string(),
    })
}

/// Replay the journal for a read-only command. Never creates the file.
pub fn load_ledger(global: &GlobalArgs) -> Result<Ledger> {
    let config = load_config(global)?;
    match &config.journal_path {
        Some(path) => anchor_ledger::load_ledger(path)
            .with_context(|| format!("failed to read journal {}", path.display())),
        None => Ok(Ledger::new()),
    }
}

/// Report a rejected operation on stderr and map it to an exit code.
pub fn report_rejection(err: &AnchorError) -> i32 {
    match err.as_ledger() {
        Some(e) => {
            eprintln!("rejected [{}]: {}", e.code(), e);
            if e.is_not_found() {
                NOT_FOUND
            } else {
                REJECTED
            }
        }
        None => {
            eprintln!("error: {}", err);
            INTERNAL_ERROR
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_record(record: &EvidenceRecord, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(record)?,
        OutputFormat::Text => {
            println!("ID:          {}", record.id);
            println!("CID:         {}", record.ipfs_cid);
            println!("Submitter:   {}", record.submitter);
            println!(
                "Timestamp:   {} ({})",
                record.timestamp.to_rfc3339(),
                record.unix_timestamp()
            );
        }
    }
    Ok(())
}
