//! Configuration types for the ledger

use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// How new records are sealed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusMode {
    /// Records carry `Difficulty` and `Nonce`; hashes need leading zeros.
    #[default]
    #[serde(alias = "proof-of-work")]
    Pow,
    /// Records are hashed once with no work requirement.
    Plain,
}

/// How concurrent submissions are coordinated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardMode {
    /// Read the tail, build outside the lock, then re-check and commit under
    /// the write lock. Losers of a race are rejected with a stale tail.
    #[default]
    Optimistic,
    /// Hold one submission slot across read-tail, build and append.
    Serialized,
}

/// What a replacement chain must satisfy besides being strictly longer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacePolicy {
    /// Length is the only criterion.
    #[default]
    LengthOnly,
    /// Every record must also pass validation against its predecessor.
    Validated,
}

impl FromStr for ConsensusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pow" | "proof-of-work" => Ok(Self::Pow),
            "plain" => Ok(Self::Plain),
            other => Err(format!("unknown consensus mode '{other}'")),
        }
    }
}

impl FromStr for GuardMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(Self::Optimistic),
            "serialized" => Ok(Self::Serialized),
            other => Err(format!("unknown guard mode '{other}'")),
        }
    }
}

/// Runtime configuration for the ledger
#[derive(Clone, Debug, Deserialize)]
pub struct LedgerConfig {
    /// Consensus mode
    pub mode: ConsensusMode,

    /// Leading zero hex characters every proof-of-work hash must carry
    pub difficulty: u32,

    /// Submission coordination
    pub guard: GuardMode,

    /// Replacement acceptance rule
    pub replace_policy: ReplacePolicy,

    /// Give up mining after this long (None = mine until found)
    pub mining_deadline: Option<Duration>,

    /// Pause after every failed nonce (None = no pause)
    pub mining_throttle: Option<Duration>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            mode: ConsensusMode::Pow,
            difficulty: crate::DEFAULT_DIFFICULTY,
            guard: GuardMode::Optimistic,
            replace_policy: ReplacePolicy::LengthOnly,
            mining_deadline: None,
            mining_throttle: None,
        }
    }
}

impl LedgerConfig {
    /// Plain ledger with no work requirement.
    pub fn plain() -> Self {
        Self {
            mode: ConsensusMode::Plain,
            ..Self::default()
        }
    }

    /// Proof-of-work ledger at the given difficulty.
    pub fn proof_of_work(difficulty: u32) -> Self {
        Self {
            mode: ConsensusMode::Pow,
            difficulty,
            ..Self::default()
        }
    }

    /// Reject settings no record could ever satisfy.
    pub fn validate(&self) -> crate::Result<()> {
        if self.mode == ConsensusMode::Pow && self.difficulty > crate::MAX_DIFFICULTY {
            return Err(crate::LedgerError::InvalidConfig(format!(
                "difficulty {} exceeds the {} hex characters of a hash",
                self.difficulty,
                crate::MAX_DIFFICULTY
            )));
        }
        Ok(())
    }

    /// Difficulty every appended record must declare, if any.
    pub fn required_difficulty(&self) -> Option<u32> {
        match self.mode {
            ConsensusMode::Pow => Some(self.difficulty),
            ConsensusMode::Plain => None,
        }
    }
}
