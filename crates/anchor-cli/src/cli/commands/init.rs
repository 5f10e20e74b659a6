use anchor_ledger::LedgerHandle;
use anyhow::{bail, Result};

use super::helpers::load_config;
use crate::cli::args::GlobalArgs;
use crate::exit_codes::SUCCESS;

pub fn run(global: &GlobalArgs) -> Result<i32> {
    let config = load_config(global)?;
    let Some(path) = config.journal_path.clone() else {
        bail!("init requires a journal path (set --journal, ANCHOR_JOURNAL or journal_path)");
    };

    if let Err(e) = LedgerHandle::deploy(&config) {
        return Ok(super::helpers::report_rejection(&e));
    }

    eprintln!("Initialized empty evidence ledger at {}", path.display());
    Ok(SUCCESS)
}
