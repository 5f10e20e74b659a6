//! The evidence ledger state machine.
//!
//! Owns an append-only sequence of [`EvidenceRecord`]s and a unique index from
//! CID to id. Holds no locks: writes are expected to arrive already
//! serialized (see [`crate::LedgerHandle`]).
//!
//! # Invariants
//!
//! - `records.len() == cid_index.len()`
//! - `records[i].id == i` for every `i`
//! - no two records share a CID, and no CID is empty

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{JournalError, JournalResult, LedgerError, LedgerResult};
use crate::event::EvidenceAnchored;
use crate::types::{Address, EvidenceId, EvidenceRecord};

/// Returned by [`Ledger::get_evidence_id_by_cid`] for unknown CIDs.
///
/// Collides with the id of the first record ever anchored. Callers that need
/// to tell the two apart should use [`Ledger::find_evidence_id`] or
/// cross-check with [`Ledger::get_evidence`].
pub const NOT_FOUND_SENTINEL: EvidenceId = 0;

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: Vec<EvidenceRecord>,
    cid_index: HashMap<String, EvidenceId>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from previously persisted records.
    ///
    /// Every record is re-validated; the first one that breaks an invariant
    /// aborts the restore.
    pub fn restore<I>(records: I) -> JournalResult<Self>
    where
        I: IntoIterator<Item = EvidenceRecord>,
    {
        let mut ledger = Self::new();
        for record in records {
            let expected = ledger.next_id();
            if record.id != expected {
                return Err(JournalError::Corrupt {
                    message: format!("expected id {}, found id {}", expected, record.id),
                });
            }
            ledger
                .check_anchor(&record.ipfs_cid)
                .map_err(|e| JournalError::Corrupt {
                    message: format!("record {}: {}", record.id, e),
                })?;
            ledger.push(record);
        }
        Ok(ledger)
    }

    /// Validate the write preconditions for `cid` without changing state.
    pub fn check_anchor(&self, cid: &str) -> LedgerResult<()> {
        if cid.is_empty() {
            return Err(LedgerError::EmptyIdentifier);
        }
        if let Some(&existing_id) = self.cid_index.get(cid) {
            return Err(LedgerError::DuplicateIdentifier {
                cid: cid.to_string(),
                existing_id,
            });
        }
        Ok(())
    }

    /// Build the record the next successful anchor of `cid` would append.
    pub fn prepare(
        &self,
        cid: &str,
        submitter: Address,
        now: DateTime<Utc>,
    ) -> LedgerResult<EvidenceRecord> {
        self.check_anchor(cid)?;
        Ok(EvidenceRecord {
            id: self.next_id(),
            ipfs_cid: cid.to_string(),
            submitter,
            timestamp: now,
        })
    }

    /// Anchor `cid` as a new record.
    ///
    /// On rejection nothing changes and no event is produced.
    pub fn anchor(
        &mut self,
        cid: &str,
        submitter: Address,
        now: DateTime<Utc>,
    ) -> LedgerResult<EvidenceAnchored> {
        let record = self.prepare(cid, submitter, now)?;
        Ok(self.commit(record))
    }

    /// Append a record obtained from [`Ledger::prepare`] on this same state.
    pub(crate) fn commit(&mut self, record: EvidenceRecord) -> EvidenceAnchored {
        debug_assert_eq!(record.id, self.next_id());
        debug_assert!(self.check_anchor(&record.ipfs_cid).is_ok());
        let event = EvidenceAnchored::from_record(&record);
        self.push(record);
        event
    }

    fn push(&mut self, record: EvidenceRecord) {
        self.cid_index.insert(record.ipfs_cid.clone(), record.id);
        self.records.push(record);
    }

    /// Record at `id`, or [`LedgerError::NotFound`] when out of range.
    pub fn get_evidence(&self, id: EvidenceId) -> LedgerResult<&EvidenceRecord> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.records.get(idx))
            .ok_or_else(|| LedgerError::NotFound {
                id,
                count: self.get_evidence_count(),
            })
    }

    /// Id mapped to `cid`, or [`NOT_FOUND_SENTINEL`] (0) when absent.
    ///
    /// The sentinel is ambiguous once a record exists at id 0.
    pub fn get_evidence_id_by_cid(&self, cid: &str) -> EvidenceId {
        self.find_evidence_id(cid).unwrap_or(NOT_FOUND_SENTINEL)
    }

    /// Id mapped to `cid`, `None` when absent.
    pub fn find_evidence_id(&self, cid: &str) -> Option<EvidenceId> {
        self.cid_index.get(cid).copied()
    }

    pub fn contains_cid(&self, cid: &str) -> bool {
        self.cid_index.contains_key(cid)
    }

    /// Number of anchored records.
    pub fn get_evidence_count(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in id order.
    pub fn records(&self) -> impl Iterator<Item = &EvidenceRecord> + '_ {
        self.records.iter()
    }

    fn next_id(&self) -> EvidenceId {
        self.records.len() as EvidenceId
    }
}
