use itertools::Itertools;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::challenge::{Solution, TotalLoot, CHAR_FINISH, CHAR_VISITED};
use crate::map::Map;
use crate::pathfinding::Pos;

/// The map with the route drawn over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    // chars[row][col]
    chars: Vec<Vec<char>>,
}

impl Overlay {
    pub fn new(map: &Map, solution: &Solution) -> Self {
        let mut chars = map.chars().to_vec();
        let mut mark = |pos: &Pos, c: char| chars[pos.row as usize][pos.col as usize] = c;
        for pos in &solution.route.steps {
            mark(pos, CHAR_VISITED);
        }
        mark(&solution.start, map.start_char);
        if let Some(last) = solution.route.steps.last() {
            mark(last, CHAR_FINISH);
        }
        Overlay { chars }
    }

    pub fn cell(&self, pos: &Pos) -> char {
        self.chars[pos.row as usize][pos.col as usize]
    }

    /// Loot under the drawn route. The start cell is not counted.
    pub fn loot(&self, map: &Map) -> TotalLoot {
        map.positions()
            .filter(|pos| matches!(self.cell(pos), CHAR_VISITED | CHAR_FINISH))
            .map(|pos| map.loot(&pos) as TotalLoot)
            .sum()
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.chars.iter().map(|row| row.iter().collect::<String>()).join("\n");
        writeln!(f, "{text}")
    }
}

/// Outcome of a run, printed as text or JSON.
#[derive(Serialize, Debug, Clone)]
pub struct Report {
    pub solver: String,
    pub elapsed_ms: u64,
    pub goal: Pos,
    pub start: Option<Pos>,
    pub loot: Option<TotalLoot>,
    pub steps: Option<Vec<Pos>>,
    #[serde(skip)]
    overlay: Option<Overlay>,
}

impl Report {
    pub fn new(solver: &str, elapsed: Duration, map: &Map, solution: Option<&Solution>) -> Self {
        Report {
            solver: solver.to_string(),
            elapsed_ms: elapsed.as_millis() as u64,
            goal: map.center,
            start: solution.map(|s| s.start),
            loot: solution.map(|s| s.loot()),
            steps: solution.map(|s| s.route.steps.clone()),
            overlay: solution.map(|s| Overlay::new(map, s)),
        }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "It took {} milliseconds to find the best path", self.elapsed_ms)?;
        match (&self.start, &self.loot, &self.overlay) {
            (Some(start), Some(loot), Some(overlay)) => {
                writeln!(f, "Path from {} to {} with {} item(s) looted",
                         start, self.goal, loot)?;
                write!(f, "{overlay}")
            },
            _ => writeln!(f, "No path exists"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::challenge::Route;
    use super::*;

    fn parse(rows: &[&str]) -> Map {
        rows.join("\n").parse().unwrap()
    }

    #[test]
    fn test_overlay() {
        let map = parse(&[".....", ".P1..", "..1..", ".....", "....."]);
        let start = Pos::new(1, 1);
        let route = Route::new(&map, vec![Pos::new(1, 2), Pos::new(2, 2)]);
        let solution = Solution::new(&map, start, route);
        let overlay = Overlay::new(&map, &solution);
        assert_eq!(overlay.to_string(), ".....\n.Pv..\n..f..\n.....\n.....\n");
        assert_eq!(overlay.cell(&start), 'P');
        assert_eq!(overlay.loot(&map), solution.loot());
        assert_eq!(overlay.loot(&map), 2);
    }

    #[test]
    fn test_overlay_route_through_start() {
        let map = parse(&["...", ".p.", "..."]);
        let start = Pos::new(1, 1);
        let solution = Solution::new(&map, start, Route::new(&map, vec![start]));
        // The final position wins over the start.
        let overlay = Overlay::new(&map, &solution);
        assert_eq!(overlay.cell(&start), CHAR_FINISH);
        let empty = Solution::new(&map, start, Route::new(&map, Vec::new()));
        assert_eq!(Overlay::new(&map, &empty).to_string(), "...\n.p.\n...\n");
    }

    #[test]
    fn test_report_text() {
        let map = parse(&[".....", ".P1..", "..1..", ".....", "....."]);
        let route = Route::new(&map, vec![Pos::new(1, 2), Pos::new(2, 2)]);
        let solution = Solution::new(&map, Pos::new(1, 1), route);
        let report = Report::new("optimized", Duration::from_millis(12), &map, Some(&solution));
        assert_eq!(report.to_string(), "It took 12 milliseconds to find the best path\n\
                                        Path from (1,1) to (2,2) with 2 item(s) looted\n\
                                        .....\n.Pv..\n..f..\n.....\n.....\n");
        assert!(report.overlay().is_some());
    }

    #[test]
    fn test_report_no_path() {
        let map = parse(&["p....", ".....", ".....", ".....", "....."]);
        let report = Report::new("optimized", Duration::from_millis(3), &map, None);
        assert_eq!(report.to_string(),
                   "It took 3 milliseconds to find the best path\nNo path exists\n");
        assert!(report.overlay().is_none());
    }

    #[test]
    fn test_report_json() {
        let map = parse(&["...", ".p.", "..1"]);
        let route = Route::new(&map, Vec::new());
        let solution = Solution::new(&map, Pos::new(1, 1), route);
        let report = Report::new("brute-force", Duration::from_millis(0), &map, Some(&solution));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["solver"], "brute-force");
        assert_eq!(json["loot"], 0);
        assert_eq!(json["goal"]["row"], 1);
        assert_eq!(json["steps"].as_array().map(|s| s.len()), Some(0));
        assert!(json.get("overlay").is_none());
    }
}
