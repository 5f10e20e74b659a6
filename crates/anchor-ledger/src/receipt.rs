//! Receipt returned for an accepted anchor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{EventLog, EvidenceAnchored};
use crate::types::{Address, EvidenceId, EvidenceRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorReceipt {
    pub evidence_id: EvidenceId,
    pub submitter: Address,
    pub timestamp: DateTime<Utc>,
    /// Exactly one entry: the `EvidenceAnchored` log.
    pub logs: Vec<EventLog>,
}

impl AnchorReceipt {
    pub(crate) fn new(record: &EvidenceRecord, event: &EvidenceAnchored) -> Self {
        Self {
            evidence_id: record.id,
            submitter: record.submitter,
            timestamp: record.timestamp,
            logs: vec![event.to_log()],
        }
    }

    /// The anchor event carried by this receipt.
    pub fn event(&self) -> Option<&EvidenceAnchored> {
        self.logs.first().map(|log| &log.event)
    }
}
