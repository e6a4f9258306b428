use std::cell::RefCell;
use std::rc::Rc;

use swisspair::{
    core::store::{MemoryStore, TournamentSnapshotV1},
    persist::{StoreResult, TournamentStore, sqlite::SqliteStore},
    player::{MatchRecord, Player, StandingEntry},
    tournament::Tournament,
    types::{MatchId, PlayerId},
};

fn sqlite() -> Tournament<SqliteStore> {
    Tournament::new(SqliteStore::open_in_memory().expect("open sqlite"))
}

fn summary(standings: &[StandingEntry]) -> Vec<(&str, u32, u32)> {
    standings
        .iter()
        .map(|e| (e.name.as_str(), e.wins, e.matches))
        .collect()
}

fn fresh_players_have_zero_records<S: TournamentStore>(mut t: Tournament<S>) {
    for name in ["p1", "p2", "p3", "p4"] {
        t.register_player(name).expect("register");
    }

    let standings = t.compute_standings().expect("standings");
    assert_eq!(
        summary(&standings),
        vec![("p1", 0, 0), ("p2", 0, 0), ("p3", 0, 0), ("p4", 0, 0)]
    );
}

fn winners_rank_above_losers<S: TournamentStore>(mut t: Tournament<S>) {
    let a = t.register_player("A").expect("register");
    let b = t.register_player("B").expect("register");
    let c = t.register_player("C").expect("register");
    let d = t.register_player("D").expect("register");

    t.report_match(a, b).expect("a beats b");
    t.report_match(c, d).expect("c beats d");

    let standings = t.compute_standings().expect("standings");
    assert_eq!(
        summary(&standings),
        vec![("A", 1, 1), ("C", 1, 1), ("B", 0, 1), ("D", 0, 1)]
    );
    for entry in &standings {
        assert!(entry.wins <= entry.matches);
    }
}

fn standings_are_idempotent<S: TournamentStore>(mut t: Tournament<S>) {
    let ids: Vec<_> = (0..6)
        .map(|i| t.register_player(&format!("P{i}")).expect("register"))
        .collect();
    t.report_match(ids[5], ids[0]).expect("report");
    t.report_match(ids[3], ids[1]).expect("report");
    t.report_match(ids[5], ids[3]).expect("report");

    let first = t.compute_standings().expect("standings");
    let second = t.compute_standings().expect("standings");
    assert_eq!(first, second);
    assert_eq!(first[0].id, ids[5]);
    assert_eq!((first[0].wins, first[0].matches), (2, 2));
}

fn reset_matches_keeps_players<S: TournamentStore>(mut t: Tournament<S>) {
    let a = t.register_player("A").expect("register");
    let b = t.register_player("B").expect("register");
    t.report_match(a, b).expect("report");

    t.reset_matches().expect("reset matches");
    let standings = t.compute_standings().expect("standings");
    assert_eq!(summary(&standings), vec![("A", 0, 0), ("B", 0, 0)]);
    assert_eq!(t.count_players().expect("count"), 2);

    t.reset_players().expect("reset players");
    assert_eq!(t.count_players().expect("count"), 0);
    assert!(t.compute_standings().expect("standings").is_empty());
}

#[test]
fn memory_fresh_players_have_zero_records() {
    fresh_players_have_zero_records(Tournament::in_memory());
}

#[test]
fn sqlite_fresh_players_have_zero_records() {
    fresh_players_have_zero_records(sqlite());
}

#[test]
fn memory_winners_rank_above_losers() {
    winners_rank_above_losers(Tournament::in_memory());
}

#[test]
fn sqlite_winners_rank_above_losers() {
    winners_rank_above_losers(sqlite());
}

#[test]
fn memory_standings_are_idempotent() {
    standings_are_idempotent(Tournament::in_memory());
}

#[test]
fn sqlite_standings_are_idempotent() {
    standings_are_idempotent(sqlite());
}

#[test]
fn memory_reset_matches_keeps_players() {
    reset_matches_keeps_players(Tournament::in_memory());
}

#[test]
fn sqlite_reset_matches_keeps_players() {
    reset_matches_keeps_players(sqlite());
}

#[test]
fn empty_tournament_has_empty_standings() {
    let t = Tournament::in_memory();
    assert!(t.compute_standings().expect("standings").is_empty());
    assert_eq!(t.count_players().expect("count"), 0);
}

#[test]
fn duplicate_names_are_distinct_players() {
    let mut t = Tournament::in_memory();
    let first = t.register_player("Sam").expect("register");
    let second = t.register_player("Sam").expect("register");
    assert_ne!(first, second);
    assert_eq!(t.count_players().expect("count"), 2);
}

/// Single-threaded store shared between two handles; not `Send`.
struct SharedStore(Rc<RefCell<MemoryStore>>);

impl TournamentStore for SharedStore {
    fn players(&self) -> StoreResult<Vec<Player>> {
        self.0.borrow().players()
    }

    fn match_records(&self) -> StoreResult<Vec<MatchRecord>> {
        self.0.borrow().match_records()
    }

    fn contains_player(&self, id: PlayerId) -> StoreResult<bool> {
        self.0.borrow().contains_player(id)
    }

    fn insert_player(&mut self, name: &str) -> StoreResult<PlayerId> {
        self.0.borrow_mut().insert_player(name)
    }

    fn insert_match(&mut self, winner: PlayerId, loser: PlayerId) -> StoreResult<MatchId> {
        self.0.borrow_mut().insert_match(winner, loser)
    }

    fn delete_all_matches(&mut self) -> StoreResult<usize> {
        self.0.borrow_mut().delete_all_matches()
    }

    fn delete_all_players(&mut self) -> StoreResult<usize> {
        self.0.borrow_mut().delete_all_players()
    }

    fn export_snapshot(&self) -> StoreResult<TournamentSnapshotV1> {
        self.0.borrow().export_snapshot()
    }
}

#[test]
fn single_threaded_store_drives_a_tournament() {
    let shared = Rc::new(RefCell::new(MemoryStore::new()));
    let mut t = Tournament::new(SharedStore(Rc::clone(&shared)));
    let a = t.register_player("A").expect("register");
    let b = t.register_player("B").expect("register");
    t.report_match(b, a).expect("report");

    assert_eq!(shared.borrow().count_players().expect("count"), 2);
    assert_eq!(
        summary(&t.compute_standings().expect("standings")),
        vec![("B", 1, 1), ("A", 0, 1)]
    );
}
