//! Benchmark for the session registry
//!
//! Covers code rendering, session creation, lookup and public discovery.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use session_directory::{
    CodeLength, GameCode, GameKeywords, GameOptions, ListingQuery, MemoryNodeDirectory,
    ServerConfig, SessionRegistry,
};
use std::sync::Arc;

fn english() -> GameOptions {
    GameOptions {
        keywords: GameKeywords::English,
        ..Default::default()
    }
}

fn populated_registry(rt: &tokio::runtime::Runtime, sessions: usize) -> Arc<SessionRegistry> {
    rt.block_on(async {
        let registry =
            SessionRegistry::new(ServerConfig::default(), Arc::new(MemoryNodeDirectory::new()))
                .unwrap();
        for i in 0..sessions {
            let session = registry.create(english()).await.unwrap();
            session.set_public(i % 2 == 0);
            session.set_player_count((i % 12) as u32);
        }
        registry
    })
}

fn bench_code_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("game_code");
    group.throughput(Throughput::Elements(1));

    let code = GameCode::from_display("REDSUS").unwrap();

    group.bench_function("generate_six_letter", |b| {
        b.iter(|| GameCode::generate(black_box(CodeLength::Six)));
    });

    group.bench_function("to_display", |b| {
        b.iter(|| black_box(code).to_display());
    });

    group.bench_function("from_display", |b| {
        b.iter(|| GameCode::from_display(black_box("REDSUS")));
    });

    group.finish();
}

fn bench_create_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_registry");
    group.throughput(Throughput::Elements(1));

    let rt = tokio::runtime::Runtime::new().unwrap();
    let registry = populated_registry(&rt, 0);

    group.bench_function("create_then_remove", |b| {
        b.iter(|| {
            rt.block_on(async {
                let session = registry.create(black_box(english())).await.unwrap();
                registry.remove(session.code()).await;
            })
        });
    });

    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_registry");
    group.throughput(Throughput::Elements(1));

    let rt = tokio::runtime::Runtime::new().unwrap();
    let registry = populated_registry(&rt, 10_000);
    let codes = registry.codes();

    group.bench_function("find_hit", |b| {
        let mut counter = 0usize;
        b.iter(|| {
            counter += 1;
            registry.find(black_box(codes[counter % codes.len()]))
        });
    });

    group.bench_function("find_miss", |b| {
        b.iter(|| registry.find(black_box(GameCode::from_raw(1))));
    });

    group.finish();
}

fn bench_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery");
    group.throughput(Throughput::Elements(10));

    let rt = tokio::runtime::Runtime::new().unwrap();
    let registry = populated_registry(&rt, 10_000);

    group.bench_function("list_public_waiting_10", |b| {
        b.iter(|| {
            registry
                .list_public_waiting(black_box(ListingQuery::new(GameKeywords::English)))
                .count()
        });
    });

    group.bench_function("list_public_waiting_no_match", |b| {
        b.iter(|| {
            registry
                .list_public_waiting(black_box(ListingQuery::new(GameKeywords::German)))
                .count()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_code_rendering,
    bench_create_remove,
    bench_find,
    bench_listing,
);
criterion_main!(benches);
