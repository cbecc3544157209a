// The shrinking zone. At depth D, the zone is the rectangle left after
// removing the D outermost rows and columns on each side of the map. Anyone
// outside of it dies.

use crate::map::Map;
use crate::pathfinding::{manhattan_distance, Pos};

/// Number of ticks elapsed, which is also how many times the zone shrunk.
pub type Depth = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zone {
    rows: i32,
    cols: i32,
    center_row: i32,
    center_col: i32,
}

impl Zone {
    pub fn new(rows: u16, cols: u16) -> Self {
        Zone {
            rows: rows as i32,
            cols: cols as i32,
            center_row: (rows / 2) as i32,
            center_col: (cols / 2) as i32,
        }
    }

    pub fn for_map(map: &Map) -> Self {
        Zone::new(map.rows, map.cols)
    }

    pub fn center(&self) -> Pos {
        Pos::new(self.center_row as u16, self.center_col as u16)
    }

    /// Maximum number of times the zone can shrink without covering the
    /// center.
    pub fn max_depth(&self) -> Depth {
        i32::min(self.rows / 2, self.cols / 2) as Depth
    }

    /// If 'pos' is outside of the zone at 'depth'.
    #[inline]
    pub fn is_dead(&self, pos: &Pos, depth: Depth) -> bool {
        let depth = depth as i32;
        let (row, col) = (pos.row as i32, pos.col as i32);
        let bound_bottom = self.rows - depth - 1;
        let bound_right = self.cols - depth - 1;
        row < depth || col < depth || row > bound_bottom || col > bound_right
    }

    /// If the player could still outrun the zone to the center from 'pos'.
    ///
    /// While crossing to the center row, the player does not get any further
    /// from the left and right boundaries, which keep closing in. The same goes
    /// for the top and bottom boundaries when crossing to the center column.
    pub fn should_survive_to_center(&self, pos: &Pos, depth: Depth) -> bool {
        let depth = depth as i32;
        let (row, col) = (pos.row as i32, pos.col as i32);
        let bound_bottom = self.rows - depth - 1;
        let bound_right = self.cols - depth - 1;

        let center_row_dist = (row - self.center_row).abs();
        let center_col_dist = (col - self.center_col).abs();

        let bound_top_dist = row - depth;
        let bound_bottom_dist = bound_bottom - row;
        let bound_left_dist = col - depth;
        let bound_right_dist = bound_right - col;

        let doomed = center_row_dist > bound_left_dist
            || center_row_dist > bound_right_dist
            || center_col_dist > bound_top_dist
            || center_col_dist > bound_bottom_dist;
        !doomed
    }

    /// If the player can walk from 'from' to 'to' and still make it to the
    /// center. 'depth' must already include the time spent looting 'to'.
    pub fn can_loot_and_live(&self, from: &Pos, to: &Pos, depth: Depth) -> bool {
        let depth = depth.saturating_add(manhattan_distance(from, to));
        self.should_survive_to_center(to, depth)
    }
}
