/// SQLite-backed store implementation.
pub mod sqlite;

use thiserror::Error;

use crate::{
    core::store::{SNAPSHOT_FORMAT_VERSION, TournamentSnapshotV1},
    engine::standings::aggregate,
    player::{MatchRecord, Player, StandingRow},
    types::{MatchId, PlayerId},
};

/// Failures raised by a [`TournamentStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be opened or initialized.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] rusqlite::Error),
    /// A query against an open SQLite store failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Snapshot JSON could not be encoded or decoded.
    #[error("snapshot encoding error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Snapshot written by an incompatible format version.
    #[error("unsupported snapshot format version {0}")]
    UnsupportedFormat(u16),
    /// Snapshot lists the same player id twice.
    #[error("player {0} appears more than once in snapshot")]
    DuplicatePlayer(PlayerId),
    /// Id or id counter outside the range SQLite can store (`0..=i64::MAX`).
    #[error("id {0} exceeds the storable range")]
    IdOutOfRange(u64),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Data-access contract the standings and pairing code runs against.
///
/// Implementations own all players and match records. Nothing above this
/// trait caches derived values; every query goes back to the store.
pub trait TournamentStore {
    /// All registered players in ascending id order.
    fn players(&self) -> StoreResult<Vec<Player>>;
    /// All match records, grouped by match.
    fn match_records(&self) -> StoreResult<Vec<MatchRecord>>;
    /// True when `id` belongs to a registered player.
    fn contains_player(&self, id: PlayerId) -> StoreResult<bool>;
    /// Registers a player and returns the assigned id.
    fn insert_player(&mut self, name: &str) -> StoreResult<PlayerId>;
    /// Writes a win record for `winner` and a loss record for `loser`.
    ///
    /// Both records are committed or neither is.
    fn insert_match(&mut self, winner: PlayerId, loser: PlayerId) -> StoreResult<MatchId>;
    /// Removes every match record, returning how many were deleted.
    fn delete_all_matches(&mut self) -> StoreResult<usize>;
    /// Removes every player together with their match records, returning
    /// the number of players deleted.
    fn delete_all_players(&mut self) -> StoreResult<usize>;
    /// Dumps players, records and id counters.
    fn export_snapshot(&self) -> StoreResult<TournamentSnapshotV1>;

    /// Per-player `(id, name, matches, wins)` rows in player id order.
    fn fetch_aggregated_standings(&self) -> StoreResult<Vec<StandingRow>> {
        let players = self.players()?;
        let records = self.match_records()?;
        Ok(aggregate(&players, &records))
    }

    /// Number of registered players.
    fn count_players(&self) -> StoreResult<usize> {
        Ok(self.players()?.len())
    }

    /// Pushes buffered writes to durable storage.
    fn flush(&mut self) -> StoreResult<()> {
        Ok(())
    }

    /// Flushes and releases the store.
    fn close(mut self) -> StoreResult<()>
    where
        Self: Sized,
    {
        self.flush()
    }
}

/// Converts an id to its SQLite column value, rejecting ids above `i64::MAX`.
pub fn to_sql_id(id: u64) -> StoreResult<i64> {
    i64::try_from(id).map_err(|_| StoreError::IdOutOfRange(id))
}

/// Serializes a snapshot as pretty-printed JSON.
pub fn encode_snapshot(snapshot: &TournamentSnapshotV1) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(snapshot)?)
}

/// Parses a JSON snapshot, rejecting versions this build cannot read.
pub fn decode_snapshot(payload: &[u8]) -> StoreResult<TournamentSnapshotV1> {
    let snapshot: TournamentSnapshotV1 = serde_json::from_slice(payload)?;
    if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(StoreError::UnsupportedFormat(snapshot.format_version));
    }
    Ok(snapshot)
}
