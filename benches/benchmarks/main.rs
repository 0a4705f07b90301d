use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use itertools::Itertools as _;
use match_three::{
    Board, BoardConfig, Grid,
    board::{Cell, any_matches_possible, find_all_matches},
    piece::{PieceFactory, Vec2},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Random fills of every size from 3x3 to 8x8, matches left in.
fn generate_grids(count: usize) -> Vec<Grid> {
    let mut rng = ChaCha8Rng::seed_from_u64(0xbe4c);

    (3..=8)
        .cartesian_product(0..count)
        .map(|(size, _)| {
            let mut factory = PieceFactory::new(5);
            let mut grid = Grid::new(size, size);

            for column in 0..size {
                for row in 0..size {
                    grid.put(factory.generate(&mut rng, Cell::new(column, row), Vec2::ZERO));
                }
            }

            grid
        })
        .collect()
}

/// Dealt boards: full, without matches, at least one legal move.
fn generate_dealt(count: u64) -> Vec<Grid> {
    (0..count)
        .map(|seed| Board::seeded(BoardConfig::default(), seed))
        .map(Result::unwrap)
        .map(|board| board.grid().clone())
        .collect()
}

fn bench_matches(c: &mut Criterion) {
    const COUNT: usize = 100;

    let mut group = c.benchmark_group("matches");

    let grids = generate_grids(COUNT);
    let dealt = generate_dealt(COUNT as u64);

    group.throughput(Throughput::Elements(grids.len() as u64));
    group.bench_function("find_all_matches", |b| {
        b.iter(|| {
            for grid in &grids {
                black_box(find_all_matches(grid));
            }
        });
    });

    group.throughput(Throughput::Elements(dealt.len() as u64));
    group.bench_function("any_matches_possible", |b| {
        b.iter(|| {
            for grid in &dealt {
                black_box(any_matches_possible(grid));
            }
        });
    });
}

criterion_group!(benches, bench_matches);
criterion_main!(benches);
