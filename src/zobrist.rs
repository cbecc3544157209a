// Zobrist hashing of search states, used as keys for memoization.
// See https://en.wikipedia.org/wiki/Zobrist_hashing
//
// Every possible depth value and every target index gets a random 64-bit
// mask. A state's fingerprint is the XOR of the mask of its depth and the
// masks of its visited targets, so the visiting order does not matter.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::boundary::Depth;
use crate::pathfinding::Pos;
use crate::targets::TargetId;

/// Depth reached so far, and which targets were visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub depth: Depth,
    visited: Vec<bool>,
}

impl SearchState {
    pub fn new(num_targets: usize) -> Self {
        SearchState { depth: 0, visited: vec![false; num_targets] }
    }

    #[inline]
    pub fn is_visited(&self, target: TargetId) -> bool {
        self.visited[target]
    }

    pub fn visit(&mut self, target: TargetId) {
        self.visited[target] = true;
    }

    pub fn unvisit(&mut self, target: TargetId) {
        self.visited[target] = false;
    }

    pub fn visited(&self) -> impl Iterator<Item=TargetId> + '_ {
        self.visited.iter().enumerate().filter(|(_, &v)| v).map(|(t, _)| t)
    }
}

pub struct ZobristHasher {
    // depth_masks[depth]
    depth_masks: Vec<u64>,
    // target_masks[target]
    target_masks: Vec<u64>,
    // position_masks[row * cols + col]
    position_masks: Vec<u64>,
    // goal_masks[row * cols + col]
    goal_masks: Vec<u64>,
    cols: usize,
}

fn random_masks(rng: &mut SmallRng, count: usize) -> Vec<u64> {
    (0..count).map(|_| rng.gen()).collect()
}

impl ZobristHasher {
    /// Tables are sized from the map: there can't be more targets than cells
    /// (plus the center), and the zone covers the whole map well before the
    /// depth reaches the number of cells.
    pub fn new(rows: u16, cols: u16, seed: u64) -> Self {
        let cells = rows as usize * cols as usize;
        let mut rng = SmallRng::seed_from_u64(seed);
        ZobristHasher {
            depth_masks: random_masks(&mut rng, cells + 1),
            target_masks: random_masks(&mut rng, cells + 1),
            position_masks: random_masks(&mut rng, cells),
            goal_masks: random_masks(&mut rng, cells),
            cols: cols as usize,
        }
    }

    #[inline]
    fn cell_index(&self, pos: &Pos) -> usize {
        pos.row as usize * self.cols + pos.col as usize
    }

    /// Fingerprint of the depth and the set of visited targets.
    pub fn fingerprint(&self, state: &SearchState) -> u64 {
        state.visited()
            .fold(self.depth_masks[state.depth as usize],
                  |hash, target| hash ^ self.target_masks[target])
    }

    /// Fingerprint that also covers where the player stands and where it is
    /// headed.
    pub fn fingerprint_full(&self, state: &SearchState, position: &Pos,
                            goal: &Pos) -> u64 {
        self.fingerprint(state)
            ^ self.position_masks[self.cell_index(position)]
            ^ self.goal_masks[self.cell_index(goal)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_order_does_not_matter() {
        let hasher = ZobristHasher::new(7, 7, 42);
        let mut a = SearchState::new(5);
        let mut b = SearchState::new(5);
        a.visit(1);
        a.visit(3);
        a.visit(4);
        b.visit(4);
        b.visit(1);
        b.visit(3);
        a.depth = 2;
        b.depth = 2;
        assert_eq!(a, b);
        assert_eq!(hasher.fingerprint(&a), hasher.fingerprint(&b));
    }

    #[test]
    fn test_different_states_differ() {
        let hasher = ZobristHasher::new(7, 7, 42);
        let mut state = SearchState::new(5);
        let empty = hasher.fingerprint(&state);
        state.visit(2);
        let visited = hasher.fingerprint(&state);
        assert_ne!(empty, visited);
        state.depth = 1;
        assert_ne!(visited, hasher.fingerprint(&state));
        state.depth = 0;
        state.unvisit(2);
        assert_eq!(empty, hasher.fingerprint(&state));
        assert_eq!(state.visited().count(), 0);
    }

    #[test]
    fn test_full_fingerprint_covers_position_and_goal() {
        let hasher = ZobristHasher::new(5, 5, 42);
        let state = SearchState::new(3);
        let a = Pos::new(1, 1);
        let b = Pos::new(1, 2);
        let base = hasher.fingerprint_full(&state, &a, &b);
        assert_eq!(base, hasher.fingerprint_full(&state, &a, &b));
        assert_ne!(base, hasher.fingerprint_full(&state, &b, &a));
        assert_ne!(base, hasher.fingerprint_full(&state, &a, &a));
        assert_ne!(base, hasher.fingerprint(&state));
    }

    #[test]
    fn test_seeded_masks_are_reproducible() {
        let mut state = SearchState::new(4);
        state.visit(0);
        state.depth = 3;
        let first = ZobristHasher::new(9, 9, 7).fingerprint(&state);
        let second = ZobristHasher::new(9, 9, 7).fingerprint(&state);
        let other_seed = ZobristHasher::new(9, 9, 8).fingerprint(&state);
        assert_eq!(first, second);
        assert_ne!(first, other_seed);
    }
}
