//! Append-only NDJSON journal of evidence records.
//!
//! # Format
//!
//! One JSON record per line, in id order:
//! ```text
//! {"id":0,"ipfsCid":"QmTest1","submitter":"0x7099…79c8","timestamp":"2026-01-26T23:00:00Z"}
//! {"id":1,"ipfsCid":"QmTest2","submitter":"0x7099…79c8","timestamp":"2026-01-26T23:00:12Z"}
//! ```
//!
//! The CID index is not stored; it is rebuilt by [`Ledger::restore`] on open,
//! which also re-checks every ledger invariant.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{JournalError, JournalResult};
use crate::ledger::Ledger;
use crate::types::EvidenceRecord;

/// Iterator over journal records.
///
/// Yields one `JournalResult<EvidenceRecord>` per non-empty line.
pub struct JournalRecords<R: BufRead> {
    reader: R,
    path: PathBuf,
    line_buffer: String,
    line_number: usize,
}

impl<R: BufRead> JournalRecords<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            path: path.into(),
            line_buffer: String::new(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for JournalRecords<R> {
    type Item = JournalResult<EvidenceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_buffer.clear();
            match self.reader.read_line(&mut self.line_buffer) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let line = self.line_buffer.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let result = serde_json::from_str::<EvidenceRecord>(line).map_err(|e| {
                        JournalError::Malformed {
                            path: self.path.clone(),
                            line: self.line_number,
                            message: e.to_string(),
                        }
                    });
                    return Some(result);
                }
                Err(e) => return Some(Err(JournalError::io(self.path.clone(), e))),
            }
        }
    }
}

/// Read every record of the journal at `path` without opening it for append.
pub fn read_records(path: &Path) -> JournalResult<Vec<EvidenceRecord>> {
    let file = File::open(path).map_err(|e| JournalError::io(path, e))?;
    JournalRecords::new(BufReader::new(file), path).collect()
}

/// Replay the journal at `path` into a ledger without creating or opening
/// it for writing. A missing file is an error.
pub fn load_ledger(path: &Path) -> JournalResult<Ledger> {
    Ledger::restore(read_records(path)?)
}

/// Writable handle to the journal file.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    file: File,
    fsync: bool,
    len: u64,
    /// Last line on disk has no terminating newline.
    unterminated: bool,
}

impl Journal {
    /// Open (or create) the journal and replay it into a ledger.
    pub fn open(path: impl AsRef<Path>, fsync: bool) -> JournalResult<(Self, Ledger)> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| JournalError::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)
            .map_err(|e| JournalError::io(path, e))?;
        let len = file
            .metadata()
            .map_err(|e| JournalError::io(path, e))?
            .len();

        let ledger = load_ledger(path)?;
        let unterminated =
            ends_unterminated(&file, len).map_err(|e| JournalError::io(path, e))?;
        if unterminated {
            warn!(
                path = %path.display(),
                "journal tail has no newline, next append will terminate it"
            );
        }
        debug!(
            path = %path.display(),
            records = ledger.get_evidence_count(),
            "replayed evidence journal"
        );

        Ok((
            Self {
                path: path.to_path_buf(),
                file,
                fsync,
                len,
                unterminated,
            },
            ledger,
        ))
    }

    /// Create a journal for a freshly deployed, empty ledger.
    ///
    /// An existing journal is accepted only if it holds no records.
    pub fn deploy(path: impl AsRef<Path>, fsync: bool) -> JournalResult<Self> {
        let path = path.as_ref();
        let (journal, ledger) = Self::open(path, fsync)?;
        if !ledger.is_empty() {
            return Err(JournalError::AlreadyDeployed {
                path: path.to_path_buf(),
                count: ledger.get_evidence_count(),
            });
        }
        Ok(journal)
    }

    /// Durably append one record.
    ///
    /// On failure the file is truncated back to its previous length so a
    /// rejected append leaves no partial line behind.
    pub fn append(&mut self, record: &EvidenceRecord) -> JournalResult<()> {
        let mut line = Vec::new();
        if self.unterminated {
            line.push(b'\n');
        }
        serde_json::to_writer(&mut line, record)?;
        line.push(b'\n');

        if let Err(e) = self.write_line(&line) {
            warn!(path = %self.path.display(), error = %e, "journal append failed, rolling back");
            if let Err(trunc) = self.file.set_len(self.len) {
                warn!(error = %trunc, "journal rollback failed");
            }
            return Err(e);
        }
        self.len += line.len() as u64;
        self.unterminated = false;
        Ok(())
    }

    fn write_line(&mut self, line: &[u8]) -> JournalResult<()> {
        self.file
            .write_all(line)
            .and_then(|_| self.file.flush())
            .map_err(|e| JournalError::io(&self.path, e))?;
        if self.fsync {
            self.file
                .sync_data()
                .map_err(|e| JournalError::io(&self.path, e))?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn ends_unterminated(mut file: &File, len: u64) -> std::io::Result<bool> {
    if len == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
