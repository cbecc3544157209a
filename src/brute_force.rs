// Exhaustive search over every move (including staying put) at every tick.
// Exponential in the number of ticks: only meant for small maps, and as a
// reference to check the itinerary search against.

use crate::boundary::{Depth, Zone};
use crate::challenge::{Route, TotalLoot};
use crate::map::Map;
use crate::pathfinding::Pos;

// Down, right, up, left, stay.
const MOVES: [(i32, i32); 5] = [(1, 0), (0, 1), (-1, 0), (0, -1), (0, 0)];

pub struct BruteForce<'a> {
    map: &'a Map,
    zone: Zone,
    max_depth: Depth,
    // looted[row * cols + col]
    looted: Vec<bool>,
    steps: Vec<Pos>,
    best: Option<(TotalLoot, Vec<Pos>)>,
    pub nodes: u64,
}

impl<'a> BruteForce<'a> {
    pub fn new(map: &'a Map) -> Self {
        BruteForce {
            map,
            zone: Zone::for_map(map),
            max_depth: map.max_depth(),
            looted: vec![false; map.rows as usize * map.cols as usize],
            steps: Vec::new(),
            best: None,
            nodes: 0,
        }
    }

    /// Route with the most loot from 'start' that stands on the center when
    /// the zone is done shrinking.
    pub fn find_best_path(&mut self, start: Pos) -> Option<Route> {
        if !self.map.contains(&start) {
            return None;
        }
        self.looted.iter_mut().for_each(|looted| *looted = false);
        self.steps.clear();
        self.best = None;
        self.nodes = 0;
        self.explore(start, 0, 0);
        self.best.take().map(|(_, steps)| Route::new(self.map, steps))
    }

    fn step(&self, pos: &Pos, (drow, dcol): (i32, i32)) -> Option<Pos> {
        let row = pos.row as i32 + drow;
        let col = pos.col as i32 + dcol;
        if row < 0 || col < 0 {
            return None;
        }
        let next = Pos::new(row as u16, col as u16);
        if self.map.contains(&next) { Some(next) } else { None }
    }

    fn explore(&mut self, pos: Pos, depth: Depth, loot: TotalLoot) {
        self.nodes += 1;
        if depth == self.max_depth {
            if pos == self.map.center
                && self.best.as_ref().map_or(true, |(best, _)| loot > *best) {
                self.best = Some((loot, self.steps.clone()));
            }
            return;
        }

        for delta in MOVES {
            let next = match self.step(&pos, delta) {
                Some(next) => next,
                None => continue,
            };
            let index = next.row as usize * self.map.cols as usize + next.col as usize;
            let amount = if self.looted[index] { 0 } else { self.map.loot(&next) };
            // Picking up a stack of items takes one tick per item.
            let cost = if amount > 1 { amount as Depth } else { 1 };
            let next_depth = depth + cost;
            if next_depth > self.max_depth || self.zone.is_dead(&next, next_depth) {
                continue;
            }

            let fresh = amount > 0;
            if fresh {
                self.looted[index] = true;
            }
            self.steps.push(next);
            self.explore(next, next_depth, loot + amount as TotalLoot);
            self.steps.pop();
            if fresh {
                self.looted[index] = false;
            }
        }
    }
}
