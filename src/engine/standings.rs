//! Standings aggregation and ranking.
//!
//! Ranking order is wins descending, then player id ascending. Because ids
//! are assigned monotonically at registration, ties keep registration order,
//! which makes both standings and pairings reproducible across backends.

use std::cmp::Ordering;

use hashbrown::HashMap;

use crate::{
    persist::{StoreResult, TournamentStore},
    player::{MatchRecord, Player, StandingEntry, StandingRow},
    types::{Outcome, PlayerId},
};

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    matches: u32,
    wins: u32,
}

/// Groups `records` by player and counts matches and wins for every player.
///
/// Output follows the order of `players`. Players without records get zero
/// counts; records whose player is not in `players` are ignored.
pub fn aggregate(players: &[Player], records: &[MatchRecord]) -> Vec<StandingRow> {
    let mut tallies: HashMap<PlayerId, Tally> = HashMap::with_capacity(players.len());
    for rec in records {
        let tally = tallies.entry(rec.player_id).or_default();
        tally.matches = tally.matches.saturating_add(1);
        if rec.outcome == Outcome::Win {
            tally.wins = tally.wins.saturating_add(1);
        }
    }

    players
        .iter()
        .map(|player| {
            let tally = tallies.get(&player.id).copied().unwrap_or_default();
            StandingRow {
                player_id: player.id,
                name: player.name.clone(),
                matches: tally.matches,
                wins: tally.wins,
            }
        })
        .collect()
}

/// Orders two standings: more wins first, then lower player id.
pub fn standing_order(a: &StandingEntry, b: &StandingEntry) -> Ordering {
    b.wins.cmp(&a.wins).then_with(|| a.id.cmp(&b.id))
}

/// Sorts aggregated rows into ranked standings.
pub fn rank(rows: Vec<StandingRow>) -> Vec<StandingEntry> {
    let mut entries: Vec<StandingEntry> = rows.into_iter().map(StandingEntry::from).collect();
    entries.sort_by(standing_order);
    entries
}

/// Reads the store and returns ranked standings.
pub fn compute_standings<S>(store: &S) -> StoreResult<Vec<StandingEntry>>
where
    S: TournamentStore + ?Sized,
{
    Ok(rank(store.fetch_aggregated_standings()?))
}
