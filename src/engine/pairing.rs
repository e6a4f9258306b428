use crate::{
    persist::{StoreResult, TournamentStore},
    player::{Pairing, StandingEntry},
};

use super::standings::compute_standings;

/// Pairs ranked players at positions (0, 1), (2, 3), and so on.
///
/// With an odd number of entries the last one is left out of the round.
/// No bye is issued for it.
pub fn pair_adjacent(standings: &[StandingEntry]) -> Vec<Pairing> {
    let groups = standings.chunks_exact(2);
    if let [unpaired] = groups.remainder() {
        log::warn!(
            "odd player count ({}); player {} ({}) is not paired this round",
            standings.len(),
            unpaired.id,
            unpaired.name
        );
    }

    groups
        .map(|group| Pairing {
            first: (&group[0]).into(),
            second: (&group[1]).into(),
        })
        .collect()
}

/// Reads current standings from the store and pairs them for the next round.
pub fn generate_pairings<S>(store: &S) -> StoreResult<Vec<Pairing>>
where
    S: TournamentStore + ?Sized,
{
    let standings = compute_standings(store)?;
    Ok(pair_adjacent(&standings))
}
