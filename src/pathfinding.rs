use arrayvec::ArrayVec;
use priority_queue::PriorityQueue;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;

use crate::boundary::{Depth, Zone};

#[derive(Serialize, Debug, PartialEq, Eq, Hash, Ord, PartialOrd, Copy, Clone)]
pub struct Pos {
    pub row: u16,
    pub col: u16,
}

impl Pos {
    pub fn new(row: u16, col: u16) -> Self {
        Pos { row, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

pub fn manhattan_distance(a: &Pos, b: &Pos) -> u16 {
    ((a.row as i32) - (b.row as i32)).unsigned_abs() as u16
        + ((a.col as i32) - (b.col as i32)).unsigned_abs() as u16
}

type Neighbors = ArrayVec<Pos, 4>;

/// The grid the player walks on. There is no terrain: every cell is walkable,
/// as long as the zone has not closed over it.
pub struct Grid {
    rows: u16,
    cols: u16,
    zone: Zone,
}

impl Grid {
    pub fn new(rows: u16, cols: u16) -> Self {
        Grid { rows, cols, zone: Zone::new(rows, cols) }
    }

    #[inline]
    pub fn contains(&self, pos: &Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// If 'pos' can be stood on at 'depth'. Without a depth, the zone is
    /// ignored.
    #[inline]
    pub fn navigable(&self, pos: &Pos, depth: Option<Depth>) -> bool {
        self.contains(pos) && depth.map_or(true, |d| !self.zone.is_dead(pos, d))
    }

    /// Cells reachable in one step, entered at 'depth'.
    pub fn neighbors(&self, pos: Pos, depth: Option<Depth>) -> Neighbors {
        // Down, right, up, left.
        const DELTAS: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
        DELTAS.iter().filter_map(|&(drow, dcol)| {
            if pos.row == 0 && drow < 0 || pos.col == 0 && dcol < 0 {
                None
            } else {
                let neighbor = Pos {
                    row: (pos.row as i32 + drow) as u16,
                    col: (pos.col as i32 + dcol) as u16,
                };
                if self.navigable(&neighbor, depth) {
                    Some(neighbor)
                } else {
                    None
                }
            }
        }).collect()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Path {
    // Includes the start position.
    pub steps: Vec<Pos>,
    pub cost: u16,
    pub goal: Pos,
}

type CameFrom = FxHashMap<Pos, Pos>;
type CostSoFar = FxHashMap<Pos, u16>;
// Ordered on f-score, then on insertion order so ties are deterministic.
type Priority = Reverse<(u16, u32)>;

pub struct Pathfinder {
    pub grid: Grid,

    came_from: CameFrom,
    cost_so_far: CostSoFar,
}

impl Pathfinder {
    pub fn new(grid: Grid) -> Self {
        Pathfinder {
            grid,
            came_from: CameFrom::default(),
            cost_so_far: CostSoFar::default(),
        }
    }

    fn reconstruct_path(&self, start: &Pos, goal: &Pos) -> Option<Path> {
        let mut current = *goal;
        let cost = *self.cost_so_far.get(&current)?;
        let mut steps = Vec::with_capacity(cost as usize + 1);
        while current != *start {
            steps.push(current);
            current = self.came_from[&current];
        }
        steps.push(*start);
        steps.reverse();
        Some(Path { steps, cost, goal: *goal })
    }

    // A* with a Manhattan heuristic. When a depth is given, the cell entered on
    // step 'i' must still be inside the zone at 'depth + i'. The zone only
    // shrinks, so arriving earlier on a cell is never worse. Cells in 'avoid'
    // are never entered, unless they are the goal.
    fn a_star_search(
        &mut self, start: &Pos, goal: &Pos, depth: Option<Depth>,
        avoid: &FxHashSet<Pos>
        ) -> bool {
        self.cost_so_far.clear();
        self.came_from.clear();
        if !self.grid.contains(start) || !self.grid.contains(goal) {
            return false;
        }

        let mut frontier: PriorityQueue<Pos, Priority> = PriorityQueue::new();
        let mut pushes = 0u32;
        let start_f = manhattan_distance(start, goal);
        frontier.push(*start, Reverse((start_f, pushes)));
        self.came_from.insert(*start, *start);
        self.cost_so_far.insert(*start, 0);
        let mut early_explore: Option<(Pos, u16)> = None;

        loop {
            // Optimization: a node can skip the frontier if it has a score <=
            // the current one when being considered as a successor.
            let (current, current_f_score) = match early_explore.take() {
                Some(option) => option,
                None => match frontier.pop() {
                    Some((current, Reverse((f, _)))) => (current, f),
                    None => return false,
                },
            };
            if current == *goal {
                return true;
            }

            let cost = self.cost_so_far[&current];
            let next_depth = depth.map(|d| d + cost + 1);
            for next in self.grid.neighbors(current, next_depth) {
                if next != *goal && avoid.contains(&next) {
                    continue;
                }
                let new_cost = cost + 1;
                let improves = self.cost_so_far.get(&next)
                    .map_or(true, |&old_cost| new_cost < old_cost);
                if !improves {
                    continue;
                }
                self.cost_so_far.insert(next, new_cost);
                self.came_from.insert(next, current);
                let f = new_cost + manhattan_distance(&next, goal);
                let better_early_explore = match early_explore {
                    Some((_, score)) => f < score,
                    None => true,
                };
                if f <= current_f_score && better_early_explore {
                    if let Some((option, score)) = early_explore {
                        // No longer the best, needs to go in the frontier
                        pushes += 1;
                        frontier.push(option, Reverse((score, pushes)));
                    }
                    early_explore = Some((next, f));
                } else {
                    pushes += 1;
                    frontier.push(next, Reverse((f, pushes)));
                }
            }
        }
    }

    /// Shortest path over the whole grid, ignoring the zone.
    pub fn shortest_path(&mut self, start: &Pos, goal: &Pos) -> Option<Path> {
        if self.a_star_search(start, goal, None, &FxHashSet::default()) {
            self.reconstruct_path(start, goal)
        } else {
            None
        }
    }

    /// Shortest path leaving 'start' at 'depth' that stays inside the zone on
    /// every step.
    pub fn safe_path(
        &mut self, start: &Pos, goal: &Pos, depth: Depth
        ) -> Option<Path> {
        self.safe_path_avoiding(start, goal, depth, &FxHashSet::default())
    }

    /// Same as safe_path, without walking through any cell of 'avoid' on the
    /// way to the goal.
    pub fn safe_path_avoiding(
        &mut self, start: &Pos, goal: &Pos, depth: Depth, avoid: &FxHashSet<Pos>
        ) -> Option<Path> {
        if self.a_star_search(start, goal, Some(depth), avoid) {
            self.reconstruct_path(start, goal)
        } else {
            None
        }
    }

    pub fn distance(&mut self, start: &Pos, goal: &Pos) -> Option<u16> {
        if self.a_star_search(start, goal, None, &FxHashSet::default()) {
            self.cost_so_far.get(goal).cloned()
        } else {
            None
        }
    }

    /// If 'path' is contiguous and stays inside the zone when leaving at
    /// 'depth'.
    pub fn verify_path(&self, path: &Path, depth: Depth) -> bool {
        let contiguous = path.steps.windows(2)
            .all(|w| manhattan_distance(&w[0], &w[1]) == 1);
        let safe = path.steps.iter().enumerate().skip(1)
            .all(|(i, pos)| self.grid.navigable(pos, Some(depth + i as Depth)));
        contiguous && safe && path.steps.last() == Some(&path.goal)
            && path.cost as usize + 1 == path.steps.len()
    }
}
