use itertools::{iproduct, Itertools};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::boundary::Depth;
use crate::challenge::{CHAR_PLAYER, CHAR_PLAYER_CAPITAL};
use crate::pathfinding::Pos;

pub type Loot = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    PlayerStart,
    Loot(Loot),
}

impl Cell {
    pub fn from_char(c: char) -> Self {
        match c {
            CHAR_PLAYER | CHAR_PLAYER_CAPITAL => Cell::PlayerStart,
            '1'..='9' => Cell::Loot(c as u8 - b'0'),
            _ => Cell::Empty,
        }
    }

    pub fn loot(&self) -> Loot {
        match self {
            Cell::Loot(amount) => *amount,
            _ => 0,
        }
    }
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("The file {0} does not exist")]
    NotFound(PathBuf),
    #[error("Failed reading the map file ({0})")]
    Io(#[from] std::io::Error),
    #[error("The file does not contain a map")]
    Empty,
    #[error("Row {row} has {found} column(s), expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("The map is too large ({rows}x{cols})")]
    TooLarge { rows: usize, cols: usize },
}

/// Immutable grid of the map, as loaded from a map file.
#[derive(Debug, Clone)]
pub struct Map {
    // chars[row][col], as read. Echoed back when drawing a route.
    chars: Vec<Vec<char>>,
    // cells[row][col]
    cells: Vec<Vec<Cell>>,
    pub rows: u16,
    pub cols: u16,
    pub center: Pos,
    pub start: Option<Pos>,
    /// Character used for the player, 'p' unless the map uses 'P'.
    pub start_char: char,
}

impl Map {
    pub fn load(path: &Path) -> Result<Map, MapError> {
        if !path.is_file() {
            return Err(MapError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    pub fn from_rows(chars: Vec<Vec<char>>) -> Result<Map, MapError> {
        let cols = match chars.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(MapError::Empty),
        };
        if let Some((row, found)) = chars.iter().map(|r| r.len()).enumerate()
            .find(|&(_, len)| len != cols) {
            return Err(MapError::Ragged { row, expected: cols, found });
        }
        let rows = chars.len();
        if rows > u16::MAX as usize || cols > u16::MAX as usize {
            return Err(MapError::TooLarge { rows, cols });
        }

        let cells: Vec<Vec<Cell>> = chars.iter()
            .map(|row| row.iter().map(|&c| Cell::from_char(c)).collect())
            .collect();
        // The last player found wins, if a map has more than one.
        let start = iproduct!(0..rows, 0..cols)
            .filter(|&(row, col)| cells[row][col] == Cell::PlayerStart)
            .last()
            .map(|(row, col)| Pos::new(row as u16, col as u16));
        let start_char = start.map_or(CHAR_PLAYER,
                                      |pos| chars[pos.row as usize][pos.col as usize]);
        let (rows, cols) = (rows as u16, cols as u16);
        Ok(Map {
            chars,
            cells,
            rows,
            cols,
            center: Pos::new(rows / 2, cols / 2),
            start,
            start_char,
        })
    }

    /// Number of times the zone can shrink without covering the center.
    pub fn max_depth(&self) -> Depth {
        Depth::min(self.rows / 2, self.cols / 2)
    }

    #[inline]
    pub fn contains(&self, pos: &Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    pub fn cell(&self, pos: &Pos) -> Cell {
        self.cells[pos.row as usize][pos.col as usize]
    }

    #[inline]
    pub fn loot(&self, pos: &Pos) -> Loot {
        self.cell(pos).loot()
    }

    pub fn chars(&self) -> &[Vec<char>] {
        &self.chars
    }

    /// All positions, in row-major order.
    pub fn positions(&self) -> impl Iterator<Item=Pos> {
        iproduct!(0..self.rows, 0..self.cols).map(|(row, col)| Pos::new(row, col))
    }

    /// Positions holding loot with their amount, in row-major order.
    pub fn loot_cells(&self) -> impl Iterator<Item=(Pos, Loot)> + '_ {
        self.positions()
            .map(|pos| (pos, self.loot(&pos)))
            .filter(|&(_, loot)| loot > 0)
    }
}

impl FromStr for Map {
    type Err = MapError;

    /// Spaces are ignored, and the map ends on the first blank line.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<char>> = text.lines()
            .map(|line| line.chars().filter(|&c| c != ' ').collect::<Vec<char>>())
            .take_while(|row| !row.is_empty())
            .collect();
        Map::from_rows(rows)
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.chars.iter().map(|row| row.iter().collect::<String>()).join("\n");
        writeln!(f, "{text}")
    }
}
