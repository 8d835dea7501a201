use std::sync::Arc;

use budgetbox_core::{
    rollover_if_needed, sanitize::sanitize_value, BoxDraft, BoxService, ExpenseService,
    MemoryStore, SequentialIds, StateStore,
};
use budgetbox_domain::{AppState, Period};
use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

fn build_sample_state(box_count: usize, expenses_per_box: usize) -> AppState {
    let ids = SequentialIds::new();
    let mut state = AppState::default();
    for idx in 0..box_count {
        let period = Period::ALL[idx % Period::ALL.len()];
        let draft = BoxDraft::new(format!("Box {idx}"), period, 100.0 + idx as f64);
        let id = BoxService::create(&mut state, draft, start(), &ids).expect("create box");
        for n in 0..expenses_per_box {
            ExpenseService::add(&mut state, &id, 1.0 + (n % 7) as f64, start()).expect("expense");
        }
    }
    state
}

fn bench_rollover(c: &mut Criterion) {
    let state = build_sample_state(500, 20);
    let later = start() + Duration::days(40);

    c.bench_function("rollover_500_boxes", |b| {
        b.iter_batched(
            || state.clone(),
            |mut state| {
                for budget in &mut state.boxes {
                    rollover_if_needed(budget, black_box(later));
                }
                state
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_sanitize(c: &mut Criterion) {
    let state = build_sample_state(500, 20);
    let value = serde_json::to_value(&state).expect("serialize");
    let ids = SequentialIds::new();

    c.bench_function("sanitize_500_boxes", |b| {
        b.iter(|| sanitize_value(black_box(&value), &ids))
    });

    let store = StateStore::new(Arc::new(MemoryStore::new()), Arc::new(SequentialIds::new()));
    c.bench_function("save_load_500_boxes", |b| {
        b.iter(|| {
            store.save(&state);
            black_box(store.load())
        })
    });
}

criterion_group!(benches, bench_rollover, bench_sanitize);
criterion_main!(benches);
