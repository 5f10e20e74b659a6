//! Append-only evidence ledger.
//!
//! Anchors content identifiers (IPFS CIDs) to immutable, sequentially
//! numbered records, rejects duplicates, and answers lookups by id or CID.
//!
//! # Quick Start
//!
//! ```no_run
//! use anchor_ledger::{CallContext, LedgerConfig, LedgerHandle};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let handle = LedgerHandle::open(&LedgerConfig::from_env()?)?;
//! let ctx = CallContext::new("0x70997970c51812dc3a010c7d01b50e0d17dc79c8".parse()?);
//!
//! let receipt = handle.anchor_evidence("QmTest1", &ctx).await?;
//! let record = handle.get_evidence(receipt.evidence_id).await?;
//! assert_eq!(record.ipfs_cid, "QmTest1");
//! # Ok(())
//! # }
//! ```
//!
//! # CID lookup sentinel
//!
//! [`Ledger::get_evidence_id_by_cid`] returns `0` for unknown CIDs, which is
//! also the id of the first anchored record. Use
//! [`Ledger::find_evidence_id`] when the difference matters.

pub mod config;
pub mod env;
pub mod error;
pub mod event;
pub mod handle;
pub mod journal;
pub mod ledger;
pub mod receipt;
pub mod types;

pub use config::LedgerConfig;
pub use env::{CallContext, Clock, ManualClock, SystemClock};
pub use error::{
    AnchorError, AnchorResult, ConfigError, JournalError, JournalResult, LedgerError,
    LedgerResult,
};
pub use event::{EventLog, EvidenceAnchored, EVENT_SIGNATURE};
pub use handle::LedgerHandle;
pub use journal::{load_ledger, read_records, Journal};
pub use ledger::{Ledger, NOT_FOUND_SENTINEL};
pub use receipt::AnchorReceipt;
pub use types::{Address, AddressParseError, EvidenceId, EvidenceRecord};
