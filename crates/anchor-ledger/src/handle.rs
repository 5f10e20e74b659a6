//! Serialized access to a ledger.
//!
//! [`LedgerHandle`] is the single-writer boundary around [`Ledger`]: anchors
//! take the write lock, so no two ever interleave, and reads take the read
//! lock, so they observe the state either before or after a write, never in
//! between. With a journal configured, a record is appended durably before it
//! becomes visible in memory.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use crate::config::LedgerConfig;
use crate::env::{CallContext, Clock, SystemClock};
use crate::error::{AnchorError, AnchorResult, LedgerResult};
use crate::event::EvidenceAnchored;
use crate::journal::Journal;
use crate::ledger::Ledger;
use crate::receipt::AnchorReceipt;
use crate::types::{EvidenceId, EvidenceRecord};

/// Shared, clonable handle to one ledger.
#[derive(Clone)]
pub struct LedgerHandle {
    inner: Arc<RwLock<HandleInner>>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<EvidenceAnchored>,
}

struct HandleInner {
    ledger: Ledger,
    journal: Option<Journal>,
}

impl fmt::Debug for LedgerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerHandle")
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

impl LedgerHandle {
    fn build(ledger: Ledger, journal: Option<Journal>, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity);
        Self {
            inner: Arc::new(RwLock::new(HandleInner { ledger, journal })),
            clock: Arc::new(SystemClock),
            events,
        }
    }

    /// Empty, non-persistent ledger.
    pub fn in_memory() -> Self {
        Self::from_ledger(Ledger::new())
    }

    /// Wrap an existing ledger without persistence.
    pub fn from_ledger(ledger: Ledger) -> Self {
        let capacity = LedgerConfig::default().event_capacity;
        Self::build(ledger, None, capacity)
    }

    /// Open the configured journal and replay it.
    pub fn open(config: &LedgerConfig) -> AnchorResult<Self> {
        config.validate()?;
        match &config.journal_path {
            Some(path) => {
                let (journal, ledger) = Journal::open(path, config.fsync)?;
                Ok(Self::build(ledger, Some(journal), config.event_capacity))
            }
            None => Ok(Self::build(Ledger::new(), None, config.event_capacity)),
        }
    }

    /// Create a fresh, empty ledger. Refuses a journal that already holds
    /// records.
    pub fn deploy(config: &LedgerConfig) -> AnchorResult<Self> {
        config.validate()?;
        let journal = match &config.journal_path {
            Some(path) => Some(Journal::deploy(path, config.fsync)?),
            None => None,
        };
        info!(
            journal = ?config.journal_path,
            "deployed empty evidence ledger"
        );
        Ok(Self::build(Ledger::new(), journal, config.event_capacity))
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Anchor `cid` on behalf of `ctx.submitter` at the clock's current time.
    pub async fn anchor_evidence(
        &self,
        cid: &str,
        ctx: &CallContext,
    ) -> AnchorResult<AnchorReceipt> {
        let mut inner = self.inner.write().await;
        let now = self.clock.now();

        let record = match inner.ledger.prepare(cid, ctx.submitter, now) {
            Ok(record) => record,
            Err(e) => {
                warn!(cid, submitter = %ctx.submitter, reason = e.reason(), "anchor rejected");
                return Err(AnchorError::Ledger(e));
            }
        };

        if let Some(journal) = inner.journal.as_mut() {
            journal.append(&record)?;
        }
        let event = inner.ledger.commit(record.clone());
        drop(inner);

        info!(
            id = event.id,
            cid = %event.ipfs_cid,
            submitter = %event.submitter,
            "evidence anchored"
        );
        // No subscribers is not an error.
        let _ = self.events.send(event.clone());

        Ok(AnchorReceipt::new(&record, &event))
    }

    pub async fn get_evidence(&self, id: EvidenceId) -> LedgerResult<EvidenceRecord> {
        self.inner.read().await.ledger.get_evidence(id).cloned()
    }

    /// Sentinel form: 0 when `cid` is unknown.
    pub async fn get_evidence_id_by_cid(&self, cid: &str) -> EvidenceId {
        self.inner.read().await.ledger.get_evidence_id_by_cid(cid)
    }

    pub async fn find_evidence_id(&self, cid: &str) -> Option<EvidenceId> {
        self.inner.read().await.ledger.find_evidence_id(cid)
    }

    pub async fn get_evidence_count(&self) -> u64 {
        self.inner.read().await.ledger.get_evidence_count()
    }

    /// Consistent copy of all records in id order.
    pub async fn snapshot(&self) -> Vec<EvidenceRecord> {
        self.inner.read().await.ledger.records().cloned().collect()
    }

    /// Receive an [`EvidenceAnchored`] for every anchor accepted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<EvidenceAnchored> {
        self.events.subscribe()
    }
}
