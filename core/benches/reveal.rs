use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sweeper_core::{Board, Game, GameConfig};

fn bench_place_mines(c: &mut Criterion) {
    let board = Board::new(30, 16).unwrap();
    let mut rng = SmallRng::seed_from_u64(12345);

    c.bench_function("place_mines_expert", |b| {
        b.iter(|| board.place_mines(black_box(99), Some((8, 15)), &mut rng))
    });
}

fn bench_flood_fill(c: &mut Criterion) {
    // worst case: one mine in the corner, everything else floods
    let board = Board::new(30, 30)
        .unwrap()
        .with_mine_coords(&[(29, 29)])
        .unwrap();

    c.bench_function("flood_fill_30x30", |b| {
        b.iter(|| {
            let mut board = board.clone();
            board.reveal_cell(black_box((0, 0))).unwrap()
        })
    });
}

fn bench_first_reveal(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(12345);

    c.bench_function("first_reveal_expert", |b| {
        b.iter(|| {
            let mut game = Game::new(GameConfig::EXPERT, true).unwrap();
            game.reveal(black_box((8, 15)), &mut rng).unwrap()
        })
    });
}

criterion_group!(benches, bench_place_mines, bench_flood_fill, bench_first_reveal);
criterion_main!(benches);
