//! Board representation for the multi-board cube game

pub mod bitboard;
pub mod board;


use std::collections::BTreeSet;
use std::fmt;

// Re-exports
pub use bitboard::Bitboard;
pub use board::{Board, Occupancy};

/// Largest board `Bitboard` can hold (4 x u64)
pub const MAX_CELLS: usize = 256;

/// Occupant of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mark {
    #[default]
    Empty,
    X,
    O,
}

impl Mark {
    /// Get opponent mark
    #[inline]
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
            Mark::Empty => Mark::Empty,
        }
    }

    #[inline]
    pub fn is_player(self) -> bool {
        self != Mark::Empty
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
            Mark::Empty => write!(f, "."),
        }
    }
}

/// Cell coordinate inside one board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl Coord {
    #[inline]
    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn on(self, board: u8) -> GlobalPos {
        GlobalPos {
            board,
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

/// A cell identified across all boards.
///
/// Field order gives the tie-break order used by the AI: board first, then
/// x, y, z lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalPos {
    pub board: u8,
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl GlobalPos {
    #[inline]
    pub const fn new(board: u8, x: u8, y: u8, z: u8) -> Self {
        Self { board, x, y, z }
    }

    #[inline]
    pub fn coord(self) -> Coord {
        Coord::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn board_index(self) -> usize {
        self.board as usize
    }
}

impl fmt::Display for GlobalPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}({},{},{})", self.board, self.x, self.y, self.z)
    }
}

/// Set of global positions (blocked cells, winning cells).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSet(BTreeSet<GlobalPos>);

impl CellSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: GlobalPos) -> bool {
        self.0.insert(pos)
    }

    pub fn remove(&mut self, pos: GlobalPos) -> bool {
        self.0.remove(&pos)
    }

    #[inline]
    pub fn contains(&self, pos: GlobalPos) -> bool {
        self.0.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = GlobalPos> + '_ {
        self.0.iter().copied()
    }

    /// Positions that lie on `board`
    pub fn on_board(&self, board: u8) -> impl Iterator<Item = GlobalPos> + '_ {
        self.0.iter().copied().filter(move |p| p.board == board)
    }
}

impl FromIterator<GlobalPos> for CellSet {
    fn from_iter<I: IntoIterator<Item = GlobalPos>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<GlobalPos> for CellSet {
    fn extend<I: IntoIterator<Item = GlobalPos>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
