//! Evidence ledger data model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sequential record identifier. Dense, starting at 0.
pub type EvidenceId = u64;

/// Width of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Account identity of a submitter.
///
/// Parsed from `0x` followed by 40 hex digits in any case. Always rendered
/// lowercase, so two addresses compare equal regardless of input casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Left-pad to a 32-byte word.
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[32 - ADDRESS_LEN..].copy_from_slice(&self.0);
        word
    }
}

/// Address parse failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address '{input}': {reason}")]
pub struct AddressParseError {
    pub input: String,
    pub reason: &'static str,
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| AddressParseError {
            input: s.to_string(),
            reason,
        };
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| err("missing 0x prefix"))?;
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(err("expected 40 hex digits"));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| err("non-hex digit"))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("0x{}", hex::encode(self.0)))
    }
}

/// One anchored piece of evidence. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvidenceRecord {
    /// Position in the ledger.
    pub id: EvidenceId,

    /// The anchored content identifier.
    #[serde(rename = "ipfsCid")]
    pub ipfs_cid: String,

    /// Caller that performed the anchor.
    pub submitter: Address,

    /// Time reported by the execution environment at anchoring.
    pub timestamp: DateTime<Utc>,
}

impl EvidenceRecord {
    /// Timestamp as unix seconds.
    pub fn unix_timestamp(&self) -> i64 {
        self.timestamp.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    #[test]
    fn test_address_parse_is_case_insensitive() {
        let mixed: Address = USER.parse().unwrap();
        let lower: Address = USER.to_lowercase().parse().unwrap();
        assert_eq!(mixed, lower);
        assert_eq!(mixed.to_string(), USER.to_lowercase());
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!("70997970c51812dc3a010c7d01b50e0d17dc79c8"
            .parse::<Address>()
            .is_err());
        assert!("0x1234".parse::<Address>().is_err());
        let err = "0xzz997970c51812dc3a010c7d01b50e0d17dc79c8"
            .parse::<Address>()
            .unwrap_err();
        assert_eq!(err.reason, "non-hex digit");
    }

    #[test]
    fn test_address_word_is_left_padded() {
        let addr: Address = USER.parse().unwrap();
        let word = addr.to_word();
        assert!(word[..12].iter().all(|b| *b == 0));
        assert_eq!(&word[12..], addr.as_bytes());
    }

    #[test]
    fn test_record_serde_field_names() {
        let record = EvidenceRecord {
            id: 0,
            ipfs_cid: "QmTest1".into(),
            submitter: USER.parse().unwrap(),
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ipfsCid"], "QmTest1");
        assert_eq!(json["submitter"], USER.to_lowercase());
        let back: EvidenceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.unix_timestamp(), 1_700_000_000);
    }
}
