//! Facts emitted by successful anchors.
//!
//! An [`EvidenceAnchored`] is produced exactly once per successful anchor and
//! never on rejection. Indexers consume it without re-reading ledger state.
//!
//! # Log form
//!
//! The three fields are all indexed, so the log carries four topics:
//!
//! ```text
//! topic0  sha256("EvidenceAnchored(uint256,string,address)")
//! topic1  id as a big-endian 32-byte word
//! topic2  sha256(ipfsCid)            (indexed strings are stored hashed)
//! topic3  submitter left-padded to 32 bytes
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{Address, EvidenceId, EvidenceRecord};

/// Canonical event signature.
pub const EVENT_SIGNATURE: &str = "EvidenceAnchored(uint256,string,address)";

/// A record was anchored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceAnchored {
    pub id: EvidenceId,
    #[serde(rename = "ipfsCid")]
    pub ipfs_cid: String,
    pub submitter: Address,
}

impl EvidenceAnchored {
    pub fn from_record(record: &EvidenceRecord) -> Self {
        Self {
            id: record.id,
            ipfs_cid: record.ipfs_cid.clone(),
            submitter: record.submitter,
        }
    }

    /// Topic list for the log form, `0x`-prefixed hex.
    pub fn topics(&self) -> Vec<String> {
        let mut id_word = [0u8; 32];
        id_word[24..].copy_from_slice(&self.id.to_be_bytes());

        vec![
            signature_topic(),
            hex_word(&id_word),
            sha256_topic(self.ipfs_cid.as_bytes()),
            hex_word(&self.submitter.to_word()),
        ]
    }

    /// Wrap into the log form carried by a receipt.
    pub fn to_log(&self) -> EventLog {
        EventLog {
            topics: self.topics(),
            event: self.clone(),
        }
    }
}

/// Topic identifying the event kind.
pub fn signature_topic() -> String {
    sha256_topic(EVENT_SIGNATURE.as_bytes())
}

fn sha256_topic(data: &[u8]) -> String {
    format!("0x{}", hex::encode(Sha256::digest(data)))
}

fn hex_word(word: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(word))
}

/// An emitted event together with its indexed topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    pub topics: Vec<String>,
    pub event: EvidenceAnchored,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: EvidenceId, cid: &str) -> EvidenceAnchored {
        EvidenceAnchored {
            id,
            ipfs_cid: cid.into(),
            submitter: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
                .parse()
                .unwrap(),
        }
    }

    #[test]
    fn test_four_topics() {
        let topics = event(0, "QmEventTest123456").topics();
        assert_eq!(topics.len(), 4);
        for t in &topics {
            assert_eq!(t.len(), 66, "topic must be a 32-byte word: {}", t);
            assert!(t.starts_with("0x"));
        }
        assert_eq!(topics[0], signature_topic());
    }

    #[test]
    fn test_id_topic_encoding() {
        let topics = event(258, "QmA").topics();
        assert!(topics[1].ends_with("0102"));
        assert_eq!(&topics[1][2..62], "0".repeat(60));
    }

    #[test]
    fn test_cid_topic_distinguishes_cids() {
        assert_ne!(event(0, "QmA").topics()[2], event(0, "QmB").topics()[2]);
        assert_eq!(event(0, "QmA").topics()[2], event(7, "QmA").topics()[2]);
    }

    #[test]
    fn test_submitter_topic() {
        let topics = event(0, "QmA").topics();
        assert_eq!(
            topics[3],
            "0x00000000000000000000000070997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
    }
}
