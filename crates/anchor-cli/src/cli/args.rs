use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "anchor",
    version,
    about = "Append-only evidence ledger: anchor IPFS CIDs to sequential, immutable records"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Ledger config file (YAML)
    #[arg(long, global = true, env = "ANCHOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Journal path (overrides config and ANCHOR_JOURNAL)
    #[arg(long, global = true)]
    pub journal: Option<PathBuf>,

    /// Skip fsync after each append
    #[arg(long, global = true)]
    pub no_fsync: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new, empty ledger journal
    Init,
    /// Anchor a CID as a new evidence record
    Submit(SubmitArgs),
    /// Show the record with the given id
    Get(GetArgs),
    /// Resolve a CID to its record id
    Lookup(LookupArgs),
    /// Print the number of anchored records
    Count,
    /// List every record in id order
    List,
    /// Print the EvidenceAnchored log for every record
    Events,
    /// Re-read the journal and check ledger invariants
    Verify,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SubmitArgs {
    /// Content identifier to anchor
    #[arg(value_name = "CID")]
    pub cid: String,

    /// Submitter address (0x + 40 hex digits)
    #[arg(long, env = "ANCHOR_SUBMITTER")]
    pub submitter: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GetArgs {
    #[arg(value_name = "ID")]
    pub id: u64,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LookupArgs {
    #[arg(value_name = "CID")]
    pub cid: String,

    /// Fail with exit code 3 for unknown CIDs instead of printing the 0 sentinel
    #[arg(long)]
    pub strict: bool,
}
