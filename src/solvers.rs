// Solvers that find the route with the most loot on a map.
//
// When the map has a player, the route starts from there. Otherwise the player
// can drop in anywhere, and every empty cell is tried as a start.

use log::{debug, info, warn};
use std::time::Instant;

use crate::boundary::Zone;
use crate::brute_force::BruteForce;
use crate::challenge::{Route, Solution};
use crate::config::SearchConfig;
use crate::map::Map;
use crate::pathfinding::Pos;
use crate::search::SearchEngine;

pub trait Solver {
    // Name to display for this solver.
    fn name(&self) -> &str;

    // Best route from a given start, if the player can survive from there.
    fn solve_from(&mut self, map: &Map, start: Pos) -> Option<Route>;

    // If the player may drop in on 'pos', on a map without a player.
    fn can_drop_in(&self, map: &Map, pos: &Pos) -> bool {
        map.loot(pos) == 0
    }

    // Starts to try: the map's player, or every drop-in position.
    fn starts(&self, map: &Map) -> Vec<Pos> {
        match map.start {
            Some(start) => vec![start],
            None => map.positions().filter(|pos| self.can_drop_in(map, pos)).collect(),
        }
    }

    // Implementation of the solver: the best route over all starts.
    fn do_solve(&mut self, map: &Map) -> Option<Solution> {
        let starts = self.starts(map);
        best_solution(map, starts, |start| self.solve_from(map, start))
    }

    // Wrapper to do_solve, to log timing and loot information.
    fn solve(&mut self, map: &Map) -> Option<Solution> {
        let start = Instant::now();
        let solution = self.do_solve(map);
        info!("Solver {} took {:?}", self.name(), start.elapsed());
        match &solution {
            Some(solution) => info!(
                "Solver {} would loot {} item(s), starting from {} with {} step(s)",
                self.name(), solution.loot(), solution.start, solution.route.len()),
            None => warn!("Solver {} did NOT find a route.", self.name()),
        };
        solution
    }
}

// Keeps the first start with the most loot.
fn best_solution(map: &Map, starts: Vec<Pos>,
                 mut solve_from: impl FnMut(Pos) -> Option<Route>) -> Option<Solution> {
    let mut best: Option<Solution> = None;
    for start in starts {
        if let Some(route) = solve_from(start) {
            if best.as_ref().map_or(true, |b| route.loot > b.loot()) {
                best = Some(Solution::new(map, start, route));
            }
        }
    }
    best
}

// Memoized itinerary search over the loot cells worth going to.
#[derive(Default)]
pub struct OptimizedSolver {
    pub config: SearchConfig,
}

// Tries every move at every tick. Only practical on small maps.
pub struct BruteForceSolver {}

impl OptimizedSolver {
    pub fn new(config: SearchConfig) -> Self {
        OptimizedSolver { config }
    }

    fn route_from(engine: &mut SearchEngine<'_>, start: Pos) -> Option<Route> {
        let itinerary = engine.find_best_path(start);
        if let Some(itinerary) = &itinerary {
            debug!("[optimized] From {start}, targets {:?}", itinerary.targets);
        }
        itinerary.map(|itinerary| itinerary.route)
    }
}

impl Solver for OptimizedSolver {
    fn name(&self) -> &str {
        "optimized"
    }

    fn solve_from(&mut self, map: &Map, start: Pos) -> Option<Route> {
        Self::route_from(&mut SearchEngine::new(map, &self.config), start)
    }

    // The engine and its buffers are shared by all drop-in starts.
    fn do_solve(&mut self, map: &Map) -> Option<Solution> {
        let starts = self.starts(map);
        let mut engine = SearchEngine::new(map, &self.config);
        best_solution(map, starts, |start| Self::route_from(&mut engine, start))
    }

    // No need to search from cells where the zone is sure to win.
    fn can_drop_in(&self, map: &Map, pos: &Pos) -> bool {
        map.loot(pos) == 0 && Zone::for_map(map).should_survive_to_center(pos, 0)
    }
}

impl Solver for BruteForceSolver {
    fn name(&self) -> &str {
        "brute-force"
    }

    fn solve_from(&mut self, map: &Map, start: Pos) -> Option<Route> {
        let mut brute_force = BruteForce::new(map);
        let route = brute_force.find_best_path(start);
        debug!("[brute-force] From {start}, explored {} node(s)", brute_force.nodes);
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(rows: &[&str]) -> Map {
        rows.join("\n").parse().unwrap()
    }

    fn check_player_start(solver: &mut dyn Solver) {
        let map = parse(&[".....", ".p...", "..1..", ".....", "....."]);
        let solution = solver.solve(&map).unwrap();
        assert_eq!(solution.start, Pos::new(1, 1));
        assert_eq!(solution.goal, Pos::new(2, 2));
        assert_eq!(solution.loot(), 1, "{}", solver.name());
    }

    #[test]
    fn test_player_start() {
        check_player_start(&mut OptimizedSolver::default());
        check_player_start(&mut BruteForceSolver {});
    }

    #[test]
    fn test_no_route() {
        let map = parse(&["p....", ".....", "..1..", ".....", "....."]);
        assert_eq!(OptimizedSolver::default().solve(&map), None);
        assert_eq!(BruteForceSolver {}.solve(&map), None);
    }

    #[test]
    fn test_drop_in() {
        let map = parse(&[
            ".........",
            ".........",
            ".........",
            "....1....",
            "...1.1...",
            "....1....",
            ".........",
            ".........",
            ".........",
        ]);
        let mut optimized = OptimizedSolver::default();
        let mut brute_force = BruteForceSolver {};
        let fast = optimized.solve(&map).unwrap();
        let slow = brute_force.solve(&map).unwrap();
        assert_eq!(fast.loot(), slow.loot());
        assert_eq!(fast.loot(), 2);
        // Starts are tried in row-major order, the first best one wins.
        assert_eq!(fast.start, Pos::new(2, 4));
        assert_eq!(slow.start, Pos::new(2, 4));
        assert_eq!(map.loot(&fast.start), 0);
    }

    #[test]
    fn test_drop_in_filter() {
        let map = parse(&[".....", ".....", "..1..", ".....", "....."]);
        let optimized = OptimizedSolver::default();
        let brute_force = BruteForceSolver {};
        assert!(!optimized.can_drop_in(&map, &Pos::new(0, 0)));
        assert!(brute_force.can_drop_in(&map, &Pos::new(0, 0)));
        assert!(optimized.can_drop_in(&map, &Pos::new(1, 2)));
        assert!(!optimized.can_drop_in(&map, &Pos::new(2, 2)));
    }

    #[test]
    fn test_shared_engine_matches_fresh_engines() {
        let map = parse(&[
            "1.....1",
            ".......",
            "..1.1..",
            ".......",
            "..1....",
            ".....1.",
            "1......",
        ]);
        let mut optimized = OptimizedSolver::default();
        let starts = optimized.starts(&map);
        assert!(starts.len() > 1);
        let mut fresh = OptimizedSolver::default();
        let expected = best_solution(&map, starts, |start| fresh.solve_from(&map, start));
        let solution = optimized.do_solve(&map);
        assert!(solution.is_some());
        assert_eq!(solution, expected);
    }
}
