//! # Core Domain Entities
//!
//! Defines the ledger record and the payload submitted by clients.
//!
//! ## Wire Format
//!
//! Field names follow the historical JSON layout
//! (`Index`, `Timestamp`, `BPM`, `Hash`, `PrevHash`, and for proof-of-work
//! records `Difficulty` and `Nonce`). Field order is not significant.

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `prevHash` of the genesis record.
pub const GENESIS_PREV_HASH: &str = "Genesis!";

/// Application payload carried by every record (a heart-rate reading).
pub type Bpm = i64;

/// Hex-encoded SHA-256 digest of a record.
pub type BlockHash = String;

/// One immutable unit of the ledger, linked to its predecessor by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Position in the chain, genesis is 0.
    pub index: u64,
    /// Creation time. Not validated for monotonicity.
    pub timestamp: String,
    /// Opaque business value.
    #[serde(rename = "BPM")]
    pub bpm: Bpm,
    /// Digest over this record's own fields.
    pub hash: BlockHash,
    /// Digest of the preceding record, or [`GENESIS_PREV_HASH`].
    pub prev_hash: BlockHash,
    /// Required leading zero hex characters (proof-of-work records only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u32>,
    /// Search variable that satisfies `difficulty` (proof-of-work records only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl Block {
    /// Whether this record sits at position 0 behind the sentinel.
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.prev_hash == GENESIS_PREV_HASH
    }

    /// Whether this record carries proof-of-work fields.
    pub fn is_proof_of_work(&self) -> bool {
        self.difficulty.is_some()
    }
}

/// Body of a submission: `{"BPM": <int>}`.
///
/// Decoding mirrors a lenient JSON decoder: the key matches in any letter
/// case, other keys are ignored and a missing or null value decodes as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionMessage {
    /// Reading in beats per minute
    #[serde(rename = "BPM")]
    pub bpm: Bpm,
}

impl<'de> Deserialize<'de> for SubmissionMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SubmissionVisitor;

        impl<'de> Visitor<'de> for SubmissionVisitor {
            type Value = SubmissionMessage;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object with an integer BPM field")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut message = SubmissionMessage::default();
                while let Some(key) = map.next_key::<String>()? {
                    if key.eq_ignore_ascii_case("bpm") {
                        if let Some(bpm) = map.next_value::<Option<Bpm>>()? {
                            message.bpm = bpm;
                        }
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(message)
            }
        }

        deserializer.deserialize_map(SubmissionVisitor)
    }
}
