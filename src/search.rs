// Memoized depth-first search over itineraries: which targets to visit, in
// which order, before heading to the center.
//
// The search walks a single shared buffer (depth, visited targets, route so
// far) and undoes its changes after each branch. Solved states are memoized
// on their Zobrist fingerprint, along with the complete route that was found
// from them (or the fact that no route survives from there).

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::boundary::{Depth, Zone};
use crate::challenge::Route;
use crate::config::{MemoKey, SearchConfig};
use crate::map::Map;
use crate::pathfinding::{Grid, Pathfinder, Pos};
use crate::targets::{valid_targets, Target, TargetId, CENTER_TARGET};
use crate::zobrist::{SearchState, ZobristHasher};

/// Targets visited in order, and the route walked to visit them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    pub targets: Vec<TargetId>,
    pub route: Route,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of search states entered.
    pub nodes: u64,
    pub memo_hits: u64,
    /// Targets skipped because looting them would doom the player.
    pub pruned: u64,
    /// Travel segments with no path that stays inside the zone.
    pub unreachable: u64,
    /// Travel segments that arrive too late.
    pub infeasible: u64,
}

pub struct SearchEngine<'a> {
    map: &'a Map,
    zone: Zone,
    max_depth: Depth,
    pathfinder: Pathfinder,
    hasher: ZobristHasher,
    memo_key: MemoKey,

    // Cells holding more than one item, which take time to loot.
    heavy_cells: Vec<Pos>,

    // Rebuilt for each start.
    targets: Vec<Target>,
    target_at: FxHashMap<Pos, TargetId>,
    memo: FxHashMap<u64, Option<Itinerary>>,

    // Shared buffers, restored after each branch.
    state: SearchState,
    steps: Vec<Pos>,
    order: Vec<TargetId>,
    avoid: FxHashSet<Pos>,

    pub stats: SearchStats,
}

impl<'a> SearchEngine<'a> {
    pub fn new(map: &'a Map, config: &SearchConfig) -> Self {
        SearchEngine {
            map,
            zone: Zone::for_map(map),
            max_depth: map.max_depth(),
            pathfinder: Pathfinder::new(Grid::new(map.rows, map.cols)),
            hasher: ZobristHasher::new(map.rows, map.cols, config.seed),
            memo_key: config.memo_key,
            heavy_cells: map.loot_cells()
                .filter(|&(_, loot)| loot > 1)
                .map(|(pos, _)| pos)
                .collect(),
            targets: Vec::new(),
            target_at: FxHashMap::default(),
            memo: FxHashMap::default(),
            state: SearchState::new(0),
            steps: Vec::new(),
            order: Vec::new(),
            avoid: FxHashSet::default(),
            stats: SearchStats::default(),
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Best itinerary from 'start' that ends on the center before the zone
    /// closes, if any.
    pub fn find_best_path(&mut self, start: Pos) -> Option<Itinerary> {
        if !self.map.contains(&start) {
            return None;
        }
        // On even dimensions, the last shrink covers the center too.
        if self.zone.is_dead(&self.zone.center(), self.max_depth) {
            debug!("The center does not survive depth {}", self.max_depth);
            return None;
        }
        self.targets = valid_targets(self.map, &self.zone, &start, 0);
        self.target_at = self.targets.iter().enumerate()
            .filter(|&(id, _)| id != CENTER_TARGET)
            .map(|(id, target)| (target.pos, id))
            .collect();
        self.memo.clear();
        self.state = SearchState::new(self.targets.len());
        self.steps.clear();
        self.order.clear();
        self.stats = SearchStats::default();

        let best = self.search(start, None);
        debug!("Search from {start}: {} target(s), {:?}", self.targets.len(), self.stats);
        best
    }

    fn fingerprint(&self, position: &Pos, goal: &Pos) -> u64 {
        match self.memo_key {
            MemoKey::DepthAndVisited => self.hasher.fingerprint(&self.state),
            MemoKey::FullState => self.hasher.fingerprint_full(&self.state, position, goal),
        }
    }

    // 'goal' is None only at the start, which counts as an already reached
    // goal.
    fn search(&mut self, position: Pos, goal: Option<TargetId>) -> Option<Itinerary> {
        self.stats.nodes += 1;
        let goal_pos = goal.map_or(position, |id| self.targets[id].pos);
        let key = self.fingerprint(&position, &goal_pos);
        if let Some(cached) = self.memo.get(&key) {
            self.stats.memo_hits += 1;
            return cached.clone();
        }

        if position != goal_pos {
            // Only the state at the goal is memoized. The travel state is
            // fully determined by it.
            return goal.and_then(|id| self.travel(position, id));
        }
        if goal == Some(CENTER_TARGET) {
            return Some(self.snapshot());
        }
        let best = self.branch(position);
        self.memo.insert(key, best.clone());
        best
    }

    // Try every unvisited target from 'position', keeping the first one with
    // the most loot.
    fn branch(&mut self, position: Pos) -> Option<Itinerary> {
        let mut best: Option<Itinerary> = None;
        for id in 0..self.targets.len() {
            if self.state.is_visited(id) {
                continue;
            }
            let target = self.targets[id];
            let next_depth = self.state.depth + target.extra_loot_time();
            if next_depth > self.max_depth
                || !self.zone.can_loot_and_live(&position, &target.pos, next_depth) {
                self.stats.pruned += 1;
                continue;
            }

            let depth = self.state.depth;
            self.state.visit(id);
            self.state.depth = next_depth;
            self.order.push(id);
            let result = self.search(position, Some(id));
            self.order.pop();
            self.state.depth = depth;
            self.state.unvisit(id);

            if let Some(itinerary) = result {
                let better = best.as_ref()
                    .map_or(true, |b| itinerary.route.loot > b.route.loot);
                if better {
                    best = Some(itinerary);
                }
            }
        }
        best
    }

    // Loot on 'pos' that still has to be picked up, and so costs time.
    fn uncollected_heavy(&self, pos: &Pos) -> bool {
        self.map.loot(pos) > 1
            && self.target_at.get(pos).map_or(true, |&id| !self.state.is_visited(id))
    }

    // Walk to the goal, then keep searching from there. Uncollected heavy loot
    // is walked around, since only a goal gets time to be looted.
    fn travel(&mut self, position: Pos, goal: TargetId) -> Option<Itinerary> {
        let target = self.targets[goal];
        let departure = self.state.depth - target.extra_loot_time();
        let mut avoid = std::mem::take(&mut self.avoid);
        avoid.clear();
        avoid.extend(self.heavy_cells.iter().filter(|pos| self.uncollected_heavy(pos)));
        let path = self.pathfinder.safe_path_avoiding(&position, &target.pos, departure, &avoid);
        self.avoid = avoid;
        let path = match path {
            Some(path) => path,
            None => {
                self.stats.unreachable += 1;
                return None;
            }
        };
        // Heavy loot on the center is picked up on the final arrival.
        let pending = if goal == CENTER_TARGET && self.uncollected_heavy(&target.pos) {
            self.map.loot(&target.pos) as Depth - 1
        } else {
            0
        };
        let arrival = self.state.depth + path.cost + pending;
        if arrival > self.max_depth || self.zone.is_dead(&target.pos, arrival) {
            self.stats.infeasible += 1;
            return None;
        }

        let depth = self.state.depth;
        let steps_len = self.steps.len();
        self.state.depth = arrival;
        self.steps.extend_from_slice(&path.steps[1..]);
        let crossed = match self.memo_key {
            MemoKey::FullState => self.mark_crossed(&path.steps[1..path.steps.len() - 1]),
            MemoKey::DepthAndVisited => Vec::new(),
        };

        let result = self.search(target.pos, Some(goal));

        for id in crossed {
            self.state.unvisit(id);
        }
        self.steps.truncate(steps_len);
        self.state.depth = depth;
        result
    }

    // Loot targets walked over on the way to a goal are picked up too. Returns
    // the targets that were newly marked, to undo them.
    fn mark_crossed(&mut self, steps: &[Pos]) -> Vec<TargetId> {
        let mut crossed = Vec::new();
        for pos in steps {
            if let Some(&id) = self.target_at.get(pos) {
                if !self.state.is_visited(id) {
                    self.state.visit(id);
                    crossed.push(id);
                }
            }
        }
        crossed
    }

    fn snapshot(&self) -> Itinerary {
        Itinerary {
            targets: self.order.clone(),
            route: Route::new(self.map, self.steps.clone()),
        }
    }
}
