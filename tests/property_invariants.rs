use proptest::prelude::*;

use swisspair::{
    persist::{TournamentStore, sqlite::SqliteStore},
    tournament::Tournament,
    types::PlayerId,
};

#[derive(Debug, Clone)]
enum Action {
    Register,
    Report { winner: u8, loser: u8 },
    ResetMatches,
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => Just(Action::Register),
        8 => (0u8..32, 0u8..32).prop_map(|(winner, loser)| Action::Report { winner, loser }),
        1 => Just(Action::ResetMatches),
    ]
}

fn apply<S: TournamentStore>(t: &mut Tournament<S>, action: &Action) {
    match action {
        Action::Register => {
            let n = t.count_players().expect("count");
            t.register_player(&format!("P{n}")).expect("register");
        }
        Action::Report { winner, loser } => {
            let ids: Vec<PlayerId> = t
                .store()
                .players()
                .expect("players")
                .into_iter()
                .map(|p| p.id)
                .collect();
            if ids.len() < 2 {
                return;
            }
            let w = ids[usize::from(*winner) % ids.len()];
            let l = ids[usize::from(*loser) % ids.len()];
            if w != l {
                t.report_match(w, l).expect("report");
            }
        }
        Action::ResetMatches => t.reset_matches().expect("reset"),
    }
}

proptest! {
    #[test]
    fn standings_invariants_hold_for_random_histories(actions in prop::collection::vec(action_strategy(), 1..120)) {
        let mut t = Tournament::in_memory();
        for action in &actions {
            apply(&mut t, action);
        }

        let standings = t.compute_standings().expect("standings");
        prop_assert_eq!(standings.len(), t.count_players().expect("count"));
        for entry in &standings {
            prop_assert!(entry.wins <= entry.matches);
        }
        for pair in standings.windows(2) {
            prop_assert!(pair[0].wins > pair[1].wins
                || (pair[0].wins == pair[1].wins && pair[0].id < pair[1].id));
        }

        let total_wins: u32 = standings.iter().map(|e| e.wins).sum();
        let total_matches: u32 = standings.iter().map(|e| e.matches).sum();
        prop_assert_eq!(total_matches, total_wins * 2);

        let records = t.store().match_records().expect("records");
        for entry in &standings {
            let played = records.iter().filter(|r| r.player_id == entry.id).count();
            prop_assert_eq!(played, entry.matches as usize);
        }
    }

    #[test]
    fn pairings_cover_even_fields_exactly_once(actions in prop::collection::vec(action_strategy(), 1..80)) {
        let mut t = Tournament::in_memory();
        for action in &actions {
            apply(&mut t, action);
        }

        let standings = t.compute_standings().expect("standings");
        let pairings = t.generate_pairings().expect("pairings");
        prop_assert_eq!(pairings.len(), standings.len() / 2);

        let mut paired: Vec<PlayerId> = pairings
            .iter()
            .flat_map(|p| [p.first.id, p.second.id])
            .collect();
        let expected: Vec<PlayerId> = standings
            .iter()
            .take(pairings.len() * 2)
            .map(|e| e.id)
            .collect();
        prop_assert_eq!(&paired, &expected);

        paired.sort_unstable();
        paired.dedup();
        prop_assert_eq!(paired.len(), pairings.len() * 2);
    }

    #[test]
    fn sqlite_backend_matches_memory_backend(actions in prop::collection::vec(action_strategy(), 1..40)) {
        let mut mem = Tournament::in_memory();
        let mut sql = Tournament::new(SqliteStore::open_in_memory().expect("open sqlite"));
        for action in &actions {
            apply(&mut mem, action);
            apply(&mut sql, action);
        }

        prop_assert_eq!(
            mem.compute_standings().expect("standings"),
            sql.compute_standings().expect("standings")
        );
        prop_assert_eq!(
            mem.generate_pairings().expect("pairings"),
            sql.generate_pairings().expect("pairings")
        );
    }
}
