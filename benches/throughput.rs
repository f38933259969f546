use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use racetime::{
    config::RegistrationPolicy,
    contestant::Registration,
    core::store::RaceStore,
    types::{ContestantId, Group},
};

fn policy() -> RegistrationPolicy {
    RegistrationPolicy {
        phone_required: false,
        ..RegistrationPolicy::default()
    }
}

fn filled(n: usize) -> (RaceStore, Vec<ContestantId>) {
    let mut store = RaceStore::from_policy(policy());
    let ids = (0..n)
        .map(|i| {
            let group = Group::new((i % 30) as u8 + 1).expect("group");
            store
                .register(Registration::new(format!("runner {i}"), group))
                .expect("register")
        })
        .collect();
    (store, ids)
}

fn bench_register(c: &mut Criterion) {
    c.bench_function("store_register_5k", |b| {
        b.iter(|| filled(5_000));
    });
}

fn bench_finish_scans(c: &mut Criterion) {
    c.bench_function("store_finish_5k", |b| {
        b.iter(|| {
            let (mut store, ids) = filled(5_000);
            store.start_race();
            for id in &ids {
                let _ = store.record_finish(id.as_str()).expect("finish");
            }
        });
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    for n in [100usize, 1_000, 10_000] {
        let (mut store, ids) = filled(n);
        store.start_race();
        for id in ids.iter().step_by(2) {
            let _ = store.record_finish(id.as_str());
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| store.snapshot());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_register, bench_finish_scans, bench_snapshot);
criterion_main!(benches);
