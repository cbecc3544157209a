use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use royale_route::config::{MemoKey, SearchConfig};
use royale_route::generator::MapGenerator;
use royale_route::map::Map;
use royale_route::pathfinding::{Grid, Pathfinder, Pos};
use royale_route::solvers::{BruteForceSolver, OptimizedSolver, Solver};


fn make_map(size: u16, with_player: bool) -> Map {
    let generator = MapGenerator {
        rows: size,
        cols: size,
        loot_chance: 0.1,
        max_loot: 1,
        max_loot_cells: 8,
        with_player,
    };
    generator.generate(&mut SmallRng::seed_from_u64(35334))
        .expect("Couldn't generate a map")
}

fn bench_pathfinding(c: &mut Criterion) {
    let mut pathfinder = Pathfinder::new(Grid::new(31, 31));
    let center = Pos::new(15, 15);
    let mut group = c.benchmark_group("pathfinding");
    group.bench_function("shortest_path", |b| b.iter(|| {
        pathfinder.shortest_path(&Pos::new(0, 0), &center)
    }));
    group.bench_function("safe_path", |b| b.iter(|| {
        pathfinder.safe_path(&Pos::new(3, 3), &center, 3)
    }));
    group.finish();
}

fn bench_player_start(c: &mut Criterion) {
    let map = make_map(9, true);
    let mut group = c.benchmark_group("player_start");
    group.bench_function("brute-force", |b| b.iter(|| {
        BruteForceSolver {}.do_solve(&map)
    }));
    group.bench_function("optimized", |b| b.iter(|| {
        OptimizedSolver::default().do_solve(&map)
    }));
    group.bench_function("optimized (depth and visited key)", |b| b.iter(|| {
        let config = SearchConfig { memo_key: MemoKey::DepthAndVisited, ..Default::default() };
        OptimizedSolver::new(config).do_solve(&map)
    }));
    group.finish();
}

fn bench_drop_in(c: &mut Criterion) {
    let map = make_map(7, false);
    let mut group = c.benchmark_group("drop_in");
    group.bench_function("brute-force", |b| b.iter(|| {
        BruteForceSolver {}.do_solve(&map)
    }));
    group.bench_function("optimized", |b| b.iter(|| {
        OptimizedSolver::default().do_solve(&map)
    }));
    group.finish();
}

criterion_group!{
    name = benches;
    // Limit sample size given the slow brute force. Results will be noisy.
    config = Criterion::default().sample_size(50);
    targets = bench_pathfinding, bench_player_start, bench_drop_in,
}
criterion_main!(benches);
