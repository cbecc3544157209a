use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::map::Map;
use crate::pathfinding::Pos;

// Characters that represent the player in a map file.
pub const CHAR_PLAYER: char = 'p';
pub const CHAR_PLAYER_CAPITAL: char = 'P';
// Marks a position walked through by the route.
pub const CHAR_VISITED: char = 'v';
// Marks the final position of the route.
pub const CHAR_FINISH: char = 'f';

pub type TotalLoot = u32;

/// Loot picked up when walking 'steps'. Each cell only counts once, even if
/// the walk crosses it multiple times.
pub fn path_loot(map: &Map, steps: &[Pos]) -> TotalLoot {
    let looted: FxHashSet<Pos> = steps.iter().cloned().collect();
    looted.iter().map(|pos| map.loot(pos) as TotalLoot).sum()
}

/// Positions walked after leaving the start, up to the final position.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub steps: Vec<Pos>,
    pub loot: TotalLoot,
}

impl Route {
    pub fn new(map: &Map, steps: Vec<Pos>) -> Self {
        let loot = path_loot(map, &steps);
        Route { steps, loot }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub start: Pos,
    pub goal: Pos,
    pub route: Route,
}

impl Solution {
    pub fn new(map: &Map, start: Pos, route: Route) -> Self {
        Solution { start, goal: map.center, route }
    }

    pub fn loot(&self) -> TotalLoot {
        self.route.loot
    }
}
