//! Player, match record, standing, and pairing types.

use serde::{Deserialize, Serialize};

use crate::types::{MatchId, Outcome, PlayerId};

/// Registered tournament participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Store-assigned identifier.
    pub id: PlayerId,
    /// Display name as registered; not required to be unique.
    pub name: String,
}

/// One participant's side of a reported match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Match shared with the opponent's record.
    pub match_id: MatchId,
    /// Player this record belongs to.
    pub player_id: PlayerId,
    /// Win or loss for `player_id`.
    pub outcome: Outcome,
}

/// Aggregated per-player tuple returned across the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    /// Player identifier.
    pub player_id: PlayerId,
    /// Player display name.
    pub name: String,
    /// Number of match records for the player.
    pub matches: u32,
    /// Number of winning match records for the player.
    pub wins: u32,
}

/// Ranked standing for one player. Always recomputed, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    /// Player identifier.
    pub id: PlayerId,
    /// Player display name.
    pub name: String,
    /// Matches won; never exceeds `matches`.
    pub wins: u32,
    /// Matches played.
    pub matches: u32,
}

impl From<StandingRow> for StandingEntry {
    fn from(row: StandingRow) -> Self {
        Self {
            id: row.player_id,
            name: row.name,
            wins: row.wins,
            matches: row.matches,
        }
    }
}

/// Identity half of a pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    /// Player identifier.
    pub id: PlayerId,
    /// Player display name.
    pub name: String,
}

impl From<&StandingEntry> for PlayerRef {
    fn from(entry: &StandingEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.clone(),
        }
    }
}

/// Two players adjacent in the standings, matched for the next round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    /// Higher-ranked player of the pair.
    pub first: PlayerRef,
    /// Player immediately after `first` in the standings.
    pub second: PlayerRef,
}

impl Pairing {
    /// Returns both player ids, higher-ranked first.
    pub fn ids(&self) -> (PlayerId, PlayerId) {
        (self.first.id, self.second.id)
    }
}
