use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::{
    persist::{StoreError, StoreResult, TournamentStore, to_sql_id},
    player::{MatchRecord, Player},
    types::{MatchId, Outcome, PlayerId},
};

/// Version number for serialized [`TournamentSnapshotV1`] payloads.
pub const SNAPSHOT_FORMAT_VERSION: u16 = 1;

/// Full dump of a tournament's players and match records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSnapshotV1 {
    /// Payload format version.
    pub format_version: u16,
    /// Id the next registered player will receive.
    pub next_player_id: PlayerId,
    /// Id the next reported match will receive.
    pub next_match_id: MatchId,
    /// Players in id order.
    pub players: Vec<Player>,
    /// Match records, winner before loser within a match.
    pub records: Vec<MatchRecord>,
}

impl TournamentSnapshotV1 {
    /// Rejects unknown format versions, repeated player ids, and ids or
    /// counters that SQLite cannot store.
    pub fn validate(&self) -> StoreResult<()> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(StoreError::UnsupportedFormat(self.format_version));
        }
        to_sql_id(self.next_player_id)?;
        to_sql_id(self.next_match_id)?;

        let mut seen = HashSet::with_capacity(self.players.len());
        for player in &self.players {
            to_sql_id(player.id)?;
            if !seen.insert(player.id) {
                return Err(StoreError::DuplicatePlayer(player.id));
            }
        }
        for rec in &self.records {
            to_sql_id(rec.match_id)?;
            to_sql_id(rec.player_id)?;
        }
        Ok(())
    }
}

/// Store backend that keeps everything in process memory.
///
/// Player ids and match ids are never reused, including after a reset.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: HashMap<PlayerId, Player>,
    order: Vec<PlayerId>,
    records: Vec<MatchRecord>,
    next_player_id: PlayerId,
    next_match_id: MatchId,
}

impl MemoryStore {
    /// Empty store; the first player and match both get id 1.
    pub fn new() -> Self {
        Self {
            next_player_id: 1,
            next_match_id: 1,
            ..Self::default()
        }
    }

    /// Rebuilds a store from a validated snapshot.
    pub fn from_snapshot(snapshot: TournamentSnapshotV1) -> StoreResult<Self> {
        snapshot.validate()?;

        let mut store = Self::new();
        let mut players = snapshot.players;
        players.sort_by_key(|p| p.id);
        for player in players {
            store.next_player_id = store.next_player_id.max(player.id + 1);
            store.order.push(player.id);
            store.players.insert(player.id, player);
        }

        for rec in snapshot.records {
            store.next_match_id = store.next_match_id.max(rec.match_id + 1);
            store.records.push(rec);
        }

        store.next_player_id = store.next_player_id.max(snapshot.next_player_id);
        store.next_match_id = store.next_match_id.max(snapshot.next_match_id);
        Ok(store)
    }

    fn take_next_player_id(&mut self) -> StoreResult<PlayerId> {
        let id = self.next_player_id;
        to_sql_id(id)?;
        self.next_player_id = id + 1;
        Ok(id)
    }

    fn take_next_match_id(&mut self) -> StoreResult<MatchId> {
        let id = self.next_match_id;
        to_sql_id(id)?;
        self.next_match_id = id + 1;
        Ok(id)
    }
}

impl TournamentStore for MemoryStore {
    fn players(&self) -> StoreResult<Vec<Player>> {
        Ok(self
            .order
            .iter()
            .filter_map(|id| self.players.get(id).cloned())
            .collect())
    }

    fn match_records(&self) -> StoreResult<Vec<MatchRecord>> {
        Ok(self.records.clone())
    }

    fn contains_player(&self, id: PlayerId) -> StoreResult<bool> {
        Ok(self.players.contains_key(&id))
    }

    fn insert_player(&mut self, name: &str) -> StoreResult<PlayerId> {
        let id = self.take_next_player_id()?;
        self.order.push(id);
        self.players.insert(
            id,
            Player {
                id,
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    fn insert_match(&mut self, winner: PlayerId, loser: PlayerId) -> StoreResult<MatchId> {
        let match_id = self.take_next_match_id()?;
        self.records.push(MatchRecord {
            match_id,
            player_id: winner,
            outcome: Outcome::Win,
        });
        self.records.push(MatchRecord {
            match_id,
            player_id: loser,
            outcome: Outcome::Loss,
        });
        Ok(match_id)
    }

    fn delete_all_matches(&mut self) -> StoreResult<usize> {
        let removed = self.records.len();
        self.records.clear();
        Ok(removed)
    }

    fn delete_all_players(&mut self) -> StoreResult<usize> {
        let removed = self.order.len();
        self.delete_all_matches()?;
        self.players.clear();
        self.order.clear();
        Ok(removed)
    }

    fn count_players(&self) -> StoreResult<usize> {
        Ok(self.order.len())
    }

    fn export_snapshot(&self) -> StoreResult<TournamentSnapshotV1> {
        Ok(TournamentSnapshotV1 {
            format_version: SNAPSHOT_FORMAT_VERSION,
            next_player_id: self.next_player_id,
            next_match_id: self.next_match_id,
            players: self.players()?,
            records: self.records.clone(),
        })
    }
}
