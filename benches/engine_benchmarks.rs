//! Benchmarks for move generation, evaluation and search.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_core::board::eval::{DefaultEvaluator, Evaluator};
use chess_core::board::search::{search, smp_search, SearchLimits, SharedSearch};
use chess_core::board::{GenMode, MoveList, Position};
use chess_core::TranspositionTable;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const MIDDLEGAME: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

/// Hash size used by search benchmarks
const BENCH_TT_MB: usize = 16;

fn position(fen: &str) -> Position {
    Position::try_from_fen(fen).expect("valid benchmark FEN")
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = Position::new();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| startpos.perft(black_box(depth)))
        });
    }

    let mut kiwipete = position(KIWIPETE);
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    for (name, fen) in [("middlegame", MIDDLEGAME), ("kiwipete", KIWIPETE)] {
        let pos = position(fen);
        group.bench_function(BenchmarkId::new("moves", name), |b| {
            b.iter(|| black_box(pos.legal_moves()))
        });
        group.bench_function(BenchmarkId::new("attacks", name), |b| {
            b.iter(|| {
                let mut list = MoveList::new();
                pos.generate(GenMode::Attacks, &mut list);
                black_box(list)
            })
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            let pos = Position::new();
            b.iter(|| {
                search(
                    &pos,
                    Arc::new(TranspositionTable::new(BENCH_TT_MB)),
                    Arc::new(DefaultEvaluator::new()),
                    SearchLimits::depth(depth),
                )
            })
        });
    }

    for threads in [1, 2, 4] {
        group.bench_with_input(BenchmarkId::new("kiwipete_smp", threads), &threads, |b, &threads| {
            let pos = position(KIWIPETE);
            b.iter(|| {
                let shared = Arc::new(SharedSearch::new(
                    Arc::new(TranspositionTable::new(BENCH_TT_MB)),
                    Arc::new(DefaultEvaluator::new()),
                    SearchLimits::depth(4),
                    pos.move_counter(),
                ));
                smp_search(&pos, &shared, threads)
            })
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");
    let evaluator = DefaultEvaluator::new();

    let positions = [
        ("startpos", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        ("middlegame", MIDDLEGAME),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ];

    for (name, fen) in positions {
        let pos = position(fen);
        group.bench_with_input(BenchmarkId::new("position", name), &pos, |b, pos| {
            b.iter(|| black_box(evaluator.evaluate(pos)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_search, bench_eval);
criterion_main!(benches);
