//! Error types for the evidence ledger.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::EvidenceId;

/// Result type for core ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Result type for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;

/// Result type for operations on a [`crate::LedgerHandle`].
pub type AnchorResult<T> = Result<T, AnchorError>;

/// Rejections raised by the ledger state machine.
///
/// Every variant is deterministic: evaluating the same call against the same
/// state always yields the same error, and no state is changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// `anchor` was called with an empty CID.
    #[error("IPFS CID cannot be empty")]
    EmptyIdentifier,

    /// `anchor` was called with a CID that is already anchored.
    #[error("Evidence with this CID already exists: {cid} (id {existing_id})")]
    DuplicateIdentifier { cid: String, existing_id: EvidenceId },

    /// `get_evidence` was called with an id outside `[0, count)`.
    #[error("Evidence does not exist: id {id} (count {count})")]
    NotFound { id: EvidenceId, count: u64 },
}

impl LedgerError {
    /// The bare revert reason, without the contextual suffix.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::EmptyIdentifier => "IPFS CID cannot be empty",
            Self::DuplicateIdentifier { .. } => "Evidence with this CID already exists",
            Self::NotFound { .. } => "Evidence does not exist",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyIdentifier => "E_EMPTY_IDENTIFIER",
            Self::DuplicateIdentifier { .. } => "E_DUPLICATE_IDENTIFIER",
            Self::NotFound { .. } => "E_NOT_FOUND",
        }
    }

    /// Suggested exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 3,
            Self::EmptyIdentifier | Self::DuplicateIdentifier { .. } => 4,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateIdentifier { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors raised while reading or appending the on-disk journal.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Underlying file I/O failed.
    #[error("journal I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A journal line could not be parsed.
    #[error("invalid journal line {line} in {path}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The journal parses but its records violate a ledger invariant.
    #[error("corrupt journal history: {message}")]
    Corrupt { message: String },

    /// Record could not be serialized for append.
    #[error("failed to encode journal record: {0}")]
    Encode(#[from] serde_json::Error),

    /// Refused to initialize over an existing, non-empty journal.
    #[error("journal already contains {count} record(s): {path}")]
    AlreadyDeployed { path: PathBuf, count: u64 },
}

impl JournalError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced at the serialized write boundary.
#[derive(Debug, Error)]
pub enum AnchorError {
    /// The ledger rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The durable journal failed; no state was changed.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// The handle configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AnchorError {
    /// The ledger rejection, if this error is one.
    pub fn as_ledger(&self) -> Option<&LedgerError> {
        match self {
            Self::Ledger(e) => Some(e),
            Self::Journal(_) | Self::Config(_) => None,
        }
    }

    /// Suggested exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Ledger(e) => e.exit_code(),
            Self::Journal(_) | Self::Config(_) => 2,
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
