//! SQLite-backed tournament store.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hashbrown::HashSet;
use rusqlite::{Connection, OptionalExtension, Transaction, params};

use crate::{
    core::store::{SNAPSHOT_FORMAT_VERSION, TournamentSnapshotV1},
    player::{MatchRecord, Player},
    types::{MatchId, Outcome, PlayerId},
};

use super::{StoreError, StoreResult, TournamentStore, to_sql_id};

/// Connection settings applied when a [`SqliteStore`] is opened.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Value for `PRAGMA journal_mode`.
    pub journal_mode: String,
    /// Value for `PRAGMA synchronous`.
    pub synchronous: String,
    /// How long a write waits on a locked database before failing.
    pub busy_timeout_ms: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            journal_mode: "WAL".to_string(),
            synchronous: "NORMAL".to_string(),
            busy_timeout_ms: 5_000,
        }
    }
}

/// SQLite implementation of [`crate::persist::TournamentStore`].
///
/// Holds a single connection for its whole lifetime.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates a store at `path` with [`SqliteConfig::default`].
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with(path, &SqliteConfig::default())
    }

    /// Opens or creates a store at `path` with explicit connection settings.
    pub fn open_with(path: impl AsRef<Path>, config: &SqliteConfig) -> StoreResult<Self> {
        let conn = Connection::open(path).map_err(StoreError::Unavailable)?;
        Self::init_connection(conn, config)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::Unavailable)?;
        Self::init_connection(conn, &SqliteConfig::default())
    }

    fn init_connection(conn: Connection, config: &SqliteConfig) -> StoreResult<Self> {
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(StoreError::Unavailable)?;
        conn.execute_batch(include_str!("schema.sql"))
            .map_err(StoreError::Unavailable)?;
        conn.pragma_update(None, "journal_mode", config.journal_mode.as_str())?;
        conn.pragma_update(None, "synchronous", config.synchronous.as_str())?;
        Ok(Self { conn })
    }

    /// Replaces the entire database contents with `snapshot`.
    pub fn import_snapshot(&mut self, snapshot: &TournamentSnapshotV1) -> StoreResult<()> {
        snapshot.validate()?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM match_records", [])?;
        tx.execute("DELETE FROM matches", [])?;
        tx.execute("DELETE FROM players", [])?;
        {
            let mut insert_player = tx.prepare("INSERT INTO players(id, name) VALUES (?1, ?2)")?;
            for player in &snapshot.players {
                insert_player.execute(params![to_sql_id(player.id)?, player.name])?;
            }

            let ts_ms = now_ms() as i64;
            let mut seen_matches = HashSet::new();
            let mut insert_match =
                tx.prepare("INSERT INTO matches(id, reported_ms) VALUES (?1, ?2)")?;
            let mut insert_record = tx.prepare(
                "INSERT INTO match_records(match_id, player_id, outcome) VALUES (?1, ?2, ?3)",
            )?;
            for rec in &snapshot.records {
                if seen_matches.insert(rec.match_id) {
                    insert_match.execute(params![to_sql_id(rec.match_id)?, ts_ms])?;
                }
                insert_record.execute(params![
                    to_sql_id(rec.match_id)?,
                    to_sql_id(rec.player_id)?,
                    rec.outcome.as_flag(),
                ])?;
            }
        }
        bump_sequence(&tx, "players", snapshot.next_player_id)?;
        bump_sequence(&tx, "matches", snapshot.next_match_id)?;
        tx.commit()?;

        log::debug!(
            "imported snapshot: {} players, {} match records",
            snapshot.players.len(),
            snapshot.records.len()
        );
        Ok(())
    }

    fn next_id(&self, table: &str) -> StoreResult<u64> {
        let seq: Option<i64> = self
            .conn
            .query_row(
                "SELECT seq FROM sqlite_sequence WHERE name = ?1",
                params![table],
                |row| row.get(0),
            )
            .optional()?;
        Ok(seq.map(|s| s as u64 + 1).unwrap_or(1))
    }
}

impl TournamentStore for SqliteStore {
    fn players(&self) -> StoreResult<Vec<Player>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM players ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(Player {
                id: id_column(row, 0)?,
                name: row.get(1)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn match_records(&self) -> StoreResult<Vec<MatchRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT match_id, player_id, outcome FROM match_records ORDER BY match_id ASC, id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let flag: i64 = row.get(2)?;
            let outcome = Outcome::from_flag(flag).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    2,
                    rusqlite::types::Type::Integer,
                    Box::new(std::io::Error::other(format!("invalid outcome flag {flag}"))),
                )
            })?;
            Ok(MatchRecord {
                match_id: id_column(row, 0)?,
                player_id: id_column(row, 1)?,
                outcome,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn contains_player(&self, id: PlayerId) -> StoreResult<bool> {
        let Ok(id) = to_sql_id(id) else {
            return Ok(false);
        };
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM players WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn insert_player(&mut self, name: &str) -> StoreResult<PlayerId> {
        self.conn
            .execute("INSERT INTO players(name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid() as PlayerId)
    }

    fn insert_match(&mut self, winner: PlayerId, loser: PlayerId) -> StoreResult<MatchId> {
        let (winner, loser) = (to_sql_id(winner)?, to_sql_id(loser)?);
        let tx = self.conn.transaction()?;
        let match_id = {
            tx.execute(
                "INSERT INTO matches(reported_ms) VALUES (?1)",
                params![now_ms() as i64],
            )?;
            let match_id = tx.last_insert_rowid();
            let mut stmt = tx.prepare(
                "INSERT INTO match_records(match_id, player_id, outcome) VALUES (?1, ?2, ?3)",
            )?;
            stmt.execute(params![match_id, winner, Outcome::Win.as_flag()])?;
            stmt.execute(params![match_id, loser, Outcome::Loss.as_flag()])?;
            match_id as MatchId
        };
        tx.commit()?;
        Ok(match_id)
    }

    fn delete_all_matches(&mut self) -> StoreResult<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM match_records", [])?;
        tx.execute("DELETE FROM matches", [])?;
        tx.commit()?;
        Ok(removed)
    }

    fn delete_all_players(&mut self) -> StoreResult<usize> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM match_records", [])?;
        tx.execute("DELETE FROM matches", [])?;
        let removed = tx.execute("DELETE FROM players", [])?;
        tx.commit()?;
        Ok(removed)
    }

    fn count_players(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM players", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn export_snapshot(&self) -> StoreResult<TournamentSnapshotV1> {
        Ok(TournamentSnapshotV1 {
            format_version: SNAPSHOT_FORMAT_VERSION,
            next_player_id: self.next_id("players")?,
            next_match_id: self.next_id("matches")?,
            players: self.players()?,
            records: self.match_records()?,
        })
    }

    fn flush(&mut self) -> StoreResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }

    fn close(mut self) -> StoreResult<()> {
        self.flush()?;
        self.conn.close().map_err(|(_, err)| StoreError::Sqlite(err))
    }
}

/// Raises the AUTOINCREMENT counter of `table` so the next id is at least `next`.
fn bump_sequence(tx: &Transaction<'_>, table: &str, next: u64) -> StoreResult<()> {
    let floor = next.saturating_sub(1) as i64;
    let updated = tx.execute(
        "UPDATE sqlite_sequence SET seq = MAX(seq, ?2) WHERE name = ?1",
        params![table, floor],
    )?;
    if updated == 0 && floor > 0 {
        tx.execute(
            "INSERT INTO sqlite_sequence(name, seq) VALUES (?1, ?2)",
            params![table, floor],
        )?;
    }
    Ok(())
}

/// Reads a non-negative integer id column.
fn id_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(idx)?;
    u64::try_from(raw).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, raw))
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
