//! Store-owning tournament facade.

use std::path::Path;

use thiserror::Error;

use crate::{
    core::store::{MemoryStore, TournamentSnapshotV1},
    engine::{pairing::generate_pairings, standings::compute_standings},
    persist::{
        StoreError, TournamentStore,
        sqlite::{SqliteConfig, SqliteStore},
    },
    player::{Pairing, StandingEntry},
    types::{MatchId, PlayerId},
};

/// Failures surfaced by [`Tournament`] operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// The backing store failed; passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A match report referenced an id with no registered player.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
}

/// Result alias for tournament operations.
pub type TournamentResult<T> = Result<T, TournamentError>;

/// Behavior switches for a [`Tournament`].
#[derive(Debug, Clone)]
pub struct TournamentConfig {
    /// Reject match reports that reference unregistered players.
    pub validate_players: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            validate_players: true,
        }
    }
}

/// Owns a [`TournamentStore`] from open to [`Tournament::close`].
///
/// Nothing derived is kept between calls; standings and pairings are
/// recomputed from the store each time they are requested.
pub struct Tournament<S: TournamentStore> {
    store: S,
    config: TournamentConfig,
}

impl Tournament<MemoryStore> {
    /// Tournament over an empty [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl Tournament<SqliteStore> {
    /// Opens (creating if needed) a SQLite-backed tournament at `path`.
    pub fn open(path: impl AsRef<Path>) -> TournamentResult<Self> {
        Self::open_with(path, &SqliteConfig::default(), TournamentConfig::default())
    }

    /// Opens a SQLite-backed tournament with explicit settings.
    pub fn open_with(
        path: impl AsRef<Path>,
        sqlite: &SqliteConfig,
        config: TournamentConfig,
    ) -> TournamentResult<Self> {
        let store = SqliteStore::open_with(path, sqlite)?;
        Ok(Self::with_config(store, config))
    }
}

impl<S: TournamentStore> Tournament<S> {
    /// Wraps `store` with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, TournamentConfig::default())
    }

    /// Wraps `store` with `config`.
    pub fn with_config(store: S, config: TournamentConfig) -> Self {
        Self { store, config }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds a player under `name` and returns the store-assigned id.
    pub fn register_player(&mut self, name: &str) -> TournamentResult<PlayerId> {
        let id = self.store.insert_player(name)?;
        log::debug!("registered player {id} ({name})");
        Ok(id)
    }

    /// Records one win for `winner` and one loss for `loser` as a single
    /// atomic write.
    pub fn report_match(&mut self, winner: PlayerId, loser: PlayerId) -> TournamentResult<MatchId> {
        if self.config.validate_players {
            for id in [winner, loser] {
                if !self.store.contains_player(id)? {
                    return Err(TournamentError::UnknownPlayer(id));
                }
            }
        }

        let match_id = self.store.insert_match(winner, loser)?;
        log::debug!("match {match_id}: {winner} beat {loser}");
        Ok(match_id)
    }

    /// Ranked standings: wins descending, ties by ascending player id.
    pub fn compute_standings(&self) -> TournamentResult<Vec<StandingEntry>> {
        Ok(compute_standings(&self.store)?)
    }

    /// Pairs adjacent players in the current standings for the next round.
    ///
    /// With an odd player count the lowest-ranked player is left unpaired.
    pub fn generate_pairings(&self) -> TournamentResult<Vec<Pairing>> {
        Ok(generate_pairings(&self.store)?)
    }

    /// Number of registered players.
    pub fn count_players(&self) -> TournamentResult<usize> {
        Ok(self.store.count_players()?)
    }

    /// Deletes every match record; players stay registered.
    pub fn reset_matches(&mut self) -> TournamentResult<()> {
        let removed = self.store.delete_all_matches()?;
        log::debug!("deleted {removed} match records");
        Ok(())
    }

    /// Deletes every player and, with them, every match record.
    pub fn reset_players(&mut self) -> TournamentResult<()> {
        let removed = self.store.delete_all_players()?;
        log::debug!("deleted {removed} players");
        Ok(())
    }

    /// Dumps the store's players, records and id counters.
    pub fn export_snapshot(&self) -> TournamentResult<TournamentSnapshotV1> {
        Ok(self.store.export_snapshot()?)
    }

    /// Gives the store back without closing it.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Flushes pending writes and releases the store.
    pub fn close(self) -> TournamentResult<()> {
        self.store.close()?;
        Ok(())
    }
}
