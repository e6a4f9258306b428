//! Shared primitive IDs and match outcome enum.

use serde::{Deserialize, Serialize};

/// Store-assigned player identifier, monotonic from 1.
pub type PlayerId = u64;
/// Identifier shared by the two records of one reported match.
pub type MatchId = u64;

/// Result of one match from one participant's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The player lost. Stored as `0`.
    Loss,
    /// The player won. Stored as `1`.
    Win,
}

impl Outcome {
    /// Returns the stored flag value (`1` for a win, `0` for a loss).
    pub fn as_flag(self) -> i64 {
        match self {
            Self::Loss => 0,
            Self::Win => 1,
        }
    }

    /// Decodes a stored flag; anything other than `0` or `1` is rejected.
    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            0 => Some(Self::Loss),
            1 => Some(Self::Win),
            _ => None,
        }
    }
}
