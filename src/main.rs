use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use royale_route::config::{ConfigError, SearchConfig};
use royale_route::map::{Map, MapError};
use royale_route::report::Report;
use royale_route::solvers::{BruteForceSolver, OptimizedSolver, Solver};

#[derive(ValueEnum, Clone, Copy)]
enum SolverName {
    /// Memoized itinerary search between loot cells.
    Optimized,
    /// Exhaustive search over every move, only for small maps.
    BruteForce,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Map file. Prompted for on stdin when not given or invalid.
    #[arg(short, long)]
    map: Option<PathBuf>,

    /// Solver implementation to use to find a route.
    #[arg(short, long, value_enum, default_value_t = SolverName::Optimized)]
    solver: SolverName,

    /// When using the optimized solver, search config JSON file to use.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the outcome as JSON rather than drawing the route.
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&Path>) -> Result<SearchConfig, ConfigError> {
    match path {
        Some(path) => {
            info!("Loading search config from {}", path.display());
            SearchConfig::from_file(path)
        },
        None => Ok(SearchConfig::default()),
    }
}

fn new_solver(name: SolverName, config: SearchConfig) -> Box<dyn Solver> {
    match name {
        SolverName::Optimized => Box::new(OptimizedSolver::new(config)),
        SolverName::BruteForce => Box::new(BruteForceSolver {}),
    }
}

// Asks for map files until one can be read. None once stdin is exhausted.
fn prompt_map(first_try: Option<PathBuf>) -> Option<Map> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut candidate = first_try;
    loop {
        let path = match candidate.take() {
            Some(path) => path,
            None => {
                println!("Enter the name of the file containing the map");
                io::stdout().flush().ok();
                match lines.next() {
                    Some(Ok(line)) => PathBuf::from(line.trim()),
                    _ => return None,
                }
            },
        };
        match Map::load(&path) {
            Ok(map) => return Some(map),
            Err(MapError::NotFound(_)) => println!("The file does not exist"),
            Err(err) => {
                warn!("Could not load {}: {}", path.display(), err);
                println!("The file does not contain a map");
            },
        }
    }
}

fn main() -> ExitCode {
    // Load .env file
    dotenvy::dotenv().ok();
    // Init logger with default value of info
    // This can be overriden with RUST_LOG env var
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("Error while loading the search config:");
            error!("  {}", err);
            return ExitCode::FAILURE;
        },
    };
    let map = match prompt_map(cli.map) {
        Some(map) => map,
        None => {
            error!("No map to solve.");
            return ExitCode::FAILURE;
        },
    };
    info!("Loaded a {}x{} map, center at {}", map.rows, map.cols, map.center);

    let mut solver = new_solver(cli.solver, config);
    let start = Instant::now();
    let solution = solver.solve(&map);
    let report = Report::new(solver.name(), start.elapsed(), &map, solution.as_ref());

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                error!("Failed to serialize the report: {}", err);
                return ExitCode::FAILURE;
            },
        }
    } else {
        print!("{report}");
    }
    ExitCode::SUCCESS
}
