use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use swisspair::{
    core::store::MemoryStore,
    engine::{pairing::pair_adjacent, standings::compute_standings},
    persist::TournamentStore,
};

fn populated_store(players: u64) -> MemoryStore {
    let mut store = MemoryStore::new();
    for i in 0..players {
        store.insert_player(&format!("P{i}")).expect("insert player");
    }
    for i in 1..players {
        store.insert_match(i + 1, i).expect("insert match");
    }
    store
}

fn bench_report_matches(c: &mut Criterion) {
    c.bench_function("store_insert_match_50k", |b| {
        b.iter(|| {
            let mut store = MemoryStore::new();
            let a = store.insert_player("A").expect("insert");
            let d = store.insert_player("B").expect("insert");
            for _ in 0..50_000u64 {
                let _ = store.insert_match(a, d).expect("insert match");
            }
        });
    });
}

fn bench_standings(c: &mut Criterion) {
    let mut group = c.benchmark_group("standings");
    for n in [100u64, 1_000, 10_000] {
        let store = populated_store(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &store, |b, store| {
            b.iter(|| {
                let _ = compute_standings(store).expect("standings");
            });
        });
    }
    group.finish();
}

fn bench_pairings(c: &mut Criterion) {
    let store = populated_store(10_000);
    let standings = compute_standings(&store).expect("standings");
    c.bench_function("pair_adjacent_10k", |b| {
        b.iter(|| {
            let _ = pair_adjacent(&standings);
        });
    });
}

criterion_group!(benches, bench_report_matches, bench_standings, bench_pairings);
criterion_main!(benches);
