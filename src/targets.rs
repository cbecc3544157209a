use crate::boundary::{Depth, Zone};
use crate::map::{Loot, Map};
use crate::pathfinding::Pos;

pub type TargetId = usize;

/// The center is always the first target.
pub const CENTER_TARGET: TargetId = 0;

/// A waypoint the player may decide to go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub pos: Pos,
    pub loot: Loot,
}

impl Target {
    pub fn center(pos: Pos) -> Self {
        Target { pos, loot: 0 }
    }

    /// Ticks needed to pick up the loot. A single item is grabbed on the way.
    pub fn loot_time(&self) -> Depth {
        if self.loot > 1 { self.loot as Depth } else { 0 }
    }

    /// Looting time on top of the step that enters the cell.
    pub fn extra_loot_time(&self) -> Depth {
        self.loot_time().saturating_sub(1)
    }
}

/// Targets worth considering from 'start': the center, then every loot cell
/// (in row-major order) that can be looted without dooming the player.
pub fn valid_targets(map: &Map, zone: &Zone, start: &Pos, depth: Depth) -> Vec<Target> {
    let mut targets = vec![Target::center(zone.center())];
    targets.extend(map.loot_cells()
        .map(|(pos, loot)| Target { pos, loot })
        .filter(|target| zone.can_loot_and_live(start, &target.pos,
                                                depth + target.loot_time())));
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loot_time() {
        let pos = Pos::new(0, 0);
        assert_eq!(Target { pos, loot: 0 }.loot_time(), 0);
        assert_eq!(Target { pos, loot: 1 }.loot_time(), 0);
        assert_eq!(Target { pos, loot: 1 }.extra_loot_time(), 0);
        assert_eq!(Target { pos, loot: 4 }.loot_time(), 4);
        assert_eq!(Target { pos, loot: 4 }.extra_loot_time(), 3);
    }

    #[test]
    fn test_center_always_first() {
        let map: Map = "p....\n.....\n.....\n.....\n....1".parse().unwrap();
        let zone = Zone::for_map(&map);
        let targets = valid_targets(&map, &zone, &Pos::new(0, 0), 0);
        assert_eq!(targets, vec![Target::center(Pos::new(2, 2))]);
    }

    #[test]
    fn test_reachable_loot_kept_in_order() {
        let map: Map = [
            ".......",
            ".1.....",
            "..1....",
            "..p21..",
            ".......",
            ".......",
            "......9",
        ].join("\n").parse().unwrap();
        let zone = Zone::for_map(&map);
        let targets = valid_targets(&map, &zone, &Pos::new(3, 2), 0);
        let positions: Vec<Pos> = targets.iter().map(|t| t.pos).collect();
        assert_eq!(positions, vec![
            Pos::new(3, 3), Pos::new(2, 2), Pos::new(3, 3), Pos::new(3, 4),
        ]);
        assert_eq!(targets[CENTER_TARGET].loot, 0);
        assert_eq!(targets[2].loot, 2);
    }

    #[test]
    fn test_slow_loot_is_excluded() {
        // Looting the '4' takes too long to make it back to the center.
        let map: Map = [
            ".....",
            "..p..",
            ".4...",
            ".....",
            ".....",
        ].join("\n").parse().unwrap();
        let zone = Zone::for_map(&map);
        let targets = valid_targets(&map, &zone, &Pos::new(1, 2), 0);
        assert_eq!(targets, vec![Target::center(Pos::new(2, 2))]);
    }
}
