use criterion::{black_box, criterion_group, criterion_main, Criterion};
use deckforge::build::{full_build, BuildRequest};
use deckforge::card::CandidatePool;
use deckforge::combos::{ComboList, SynergyList};
use deckforge::rng::SeedInput;
use deckforge::state;

fn benchmark_single_build(c: &mut Criterion) {
    let pool = CandidatePool::from_file("pool.json").expect("Failed to load pool");
    let combos = ComboList::from_file("combos.json").expect("Failed to load combos");
    let synergies = SynergyList::from_file("synergies.json").expect("Failed to load synergies");

    let request = BuildRequest {
        seed: Some(SeedInput::Int(12345)),
        theme: Some("Tokens".to_string()),
        constraints: None,
    };

    c.bench_function("single_build_seed_12345", |b| {
        b.iter(|| full_build(black_box(&request), &pool, &combos, &synergies))
    });
}

fn benchmark_100_builds(c: &mut Criterion) {
    let pool = CandidatePool::from_file("pool.json").expect("Failed to load pool");
    let combos = ComboList::from_file("combos.json").expect("Failed to load combos");
    let synergies = SynergyList::from_file("synergies.json").expect("Failed to load synergies");

    c.bench_function("100_builds", |b| {
        b.iter(|| {
            for seed in 0..100i64 {
                let request = BuildRequest {
                    seed: Some(SeedInput::Int(seed)),
                    theme: None,
                    constraints: None,
                };
                let _ = full_build(black_box(&request), &pool, &combos, &synergies);
            }
        })
    });
}

fn benchmark_token_round_trip(c: &mut Criterion) {
    let pool = CandidatePool::from_file("pool.json").expect("Failed to load pool");
    let combos = ComboList::from_file("combos.json").expect("Failed to load combos");
    let synergies = SynergyList::from_file("synergies.json").expect("Failed to load synergies");

    let request = BuildRequest {
        seed: Some(SeedInput::Int(777)),
        theme: None,
        constraints: None,
    };
    let result = full_build(&request, &pool, &combos, &synergies).expect("build");

    c.bench_function("token_round_trip", |b| {
        b.iter(|| {
            let decoded = state::decode(black_box(&result.permalink)).unwrap();
            state::encode(black_box(&decoded)).unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_single_build,
    benchmark_100_builds,
    benchmark_token_round_trip
);
criterion_main!(benches);
