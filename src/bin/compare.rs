// Binary that generates random maps and solves each of them with both the
// optimized and the brute-force solvers, to check that they agree on the best
// loot. Stops on the first disagreement and prints the map.

use clap::Parser;
use env_logger::Env;
use log::{error, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use royale_route::challenge::Solution;
use royale_route::config::SearchConfig;
use royale_route::generator::MapGenerator;
use royale_route::map::Map;
use royale_route::solvers::{BruteForceSolver, OptimizedSolver, Solver};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of maps to generate.
    #[arg(long, default_value_t = 100)]
    cases: usize,

    /// Rows and columns of the generated maps.
    #[arg(long, default_value_t = 7)]
    size: u16,

    /// Chance for each cell to hold loot.
    #[arg(long, default_value_t = 0.1)]
    loot_chance: f64,

    /// Maximum loot on a single cell.
    #[arg(long, default_value_t = 1)]
    max_loot: u8,

    /// Maximum number of cells with loot.
    #[arg(long, default_value_t = 3)]
    max_loot_cells: usize,

    /// Generate maps without a player, to compare drop-ins.
    #[arg(long)]
    drop_in: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn timed_solve(solver: &mut dyn Solver, map: &Map, total: &mut Duration) -> Option<Solution> {
    let start = Instant::now();
    let solution = solver.do_solve(map);
    *total += start.elapsed();
    solution
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let generator = MapGenerator {
        rows: cli.size,
        cols: cli.size,
        loot_chance: cli.loot_chance,
        max_loot: cli.max_loot,
        max_loot_cells: cli.max_loot_cells,
        with_player: !cli.drop_in,
    };
    let mut rng = SmallRng::seed_from_u64(cli.seed);
    let mut optimized = OptimizedSolver::new(SearchConfig::default());
    let mut brute_force = BruteForceSolver {};
    let mut optimized_time = Duration::ZERO;
    let mut brute_force_time = Duration::ZERO;

    for case in 0..cli.cases {
        let map = match generator.generate(&mut rng) {
            Ok(map) => map,
            Err(err) => {
                error!("Could not generate a map: {}", err);
                return ExitCode::FAILURE;
            },
        };
        let fast = timed_solve(&mut optimized, &map, &mut optimized_time);
        let slow = timed_solve(&mut brute_force, &map, &mut brute_force_time);
        let fast_loot = fast.as_ref().map(Solution::loot);
        let slow_loot = slow.as_ref().map(Solution::loot);
        if fast_loot != slow_loot {
            error!("Case #{case}: optimized got {:?}, brute-force got {:?}",
                   fast_loot, slow_loot);
            println!("{map}");
            return ExitCode::FAILURE;
        }
    }

    info!("All {} case(s) agree", cli.cases);
    info!("Optimized approach took {:?}", optimized_time);
    info!("Brute-force approach took {:?}", brute_force_time);
    ExitCode::SUCCESS
}
