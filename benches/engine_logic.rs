use criterion::{black_box, criterion_group, criterion_main, Criterion};
use match_three::core::{find_committing_swap, find_matches, Board, Engine, SimpleRng};

fn bench_find_matches(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);
    let board = Board::random(8, 5, &mut rng).unwrap();

    c.bench_function("find_matches_8x8", |b| {
        b.iter(|| find_matches(black_box(&board)))
    });
}

fn bench_attempt_swap(c: &mut Criterion) {
    let engine = Engine::new_game(8, 5, 12345).unwrap();

    c.bench_function("attempt_swap", |b| {
        b.iter(|| {
            let mut engine = engine.clone();
            let (a, b) = find_committing_swap(engine.board()).unwrap_or((0, 1));
            engine.attempt_swap(black_box(a), black_box(b))
        })
    });
}

fn bench_collapse_refill(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);

    c.bench_function("collapse_refill_half_board", |b| {
        b.iter(|| {
            let mut board = Board::random(8, 5, &mut rng).unwrap();
            // Knock out every other cell
            for i in (0..board.len()).step_by(2) {
                board.set(i, None);
            }
            board.collapse();
            board.refill(5, &mut rng)
        })
    });
}

fn bench_hint(c: &mut Criterion) {
    let engine = Engine::new_game(8, 5, 777).unwrap();

    c.bench_function("find_committing_swap", |b| {
        b.iter(|| find_committing_swap(black_box(engine.board())))
    });
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_attempt_swap,
    bench_collapse_refill,
    bench_hint
);
criterion_main!(benches);
