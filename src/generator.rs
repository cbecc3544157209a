use rand::Rng;

use crate::challenge::CHAR_PLAYER_CAPITAL;
use crate::map::{Loot, Map, MapError};

/// Random maps, to compare solvers on.
#[derive(Debug, Clone)]
pub struct MapGenerator {
    pub rows: u16,
    pub cols: u16,
    /// Chance for each cell to hold loot.
    pub loot_chance: f64,
    /// Loot on a cell is picked uniformly in [1, max_loot].
    pub max_loot: Loot,
    pub max_loot_cells: usize,
    /// Places a 'P' on a random cell, over any loot there.
    pub with_player: bool,
}

impl Default for MapGenerator {
    fn default() -> Self {
        MapGenerator {
            rows: 15,
            cols: 15,
            loot_chance: 0.1,
            max_loot: 1,
            max_loot_cells: 20,
            with_player: true,
        }
    }
}

impl MapGenerator {
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Map, MapError> {
        let max_loot = self.max_loot.clamp(1, 9);
        let loot_chance = self.loot_chance.clamp(0.0, 1.0);
        let mut loot_cells = 0;
        let mut chars: Vec<Vec<char>> = (0..self.rows).map(|_| {
            (0..self.cols).map(|_| {
                if loot_cells < self.max_loot_cells && rng.gen_bool(loot_chance) {
                    loot_cells += 1;
                    char::from(b'0' + rng.gen_range(1..=max_loot))
                } else {
                    '.'
                }
            }).collect()
        }).collect();
        if self.with_player && self.rows > 0 && self.cols > 0 {
            let row = rng.gen_range(0..self.rows) as usize;
            let col = rng.gen_range(0..self.cols) as usize;
            chars[row][col] = CHAR_PLAYER_CAPITAL;
        }
        Map::from_rows(chars)
    }
}
