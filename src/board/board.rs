//! Occupancy of one board and of the whole board set

use super::bitboard::Bitboard;
use super::{CellSet, Coord, GlobalPos, Mark, MAX_CELLS};

/// Occupancy of a single 3D board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: u8,
    rows: u8,
    depth: u8,
    /// X marks
    pub x: Bitboard,
    /// O marks
    pub o: Bitboard,
}

impl Board {
    /// Empty board; x spans `cols`, y spans `rows`, z spans `depth`
    pub fn new(cols: u8, rows: u8, depth: u8) -> Self {
        debug_assert!(cols > 0 && rows > 0 && depth > 0);
        debug_assert!(cols as usize * rows as usize * depth as usize <= MAX_CELLS);
        Self {
            cols,
            rows,
            depth,
            x: Bitboard::new(),
            o: Bitboard::new(),
        }
    }

    #[inline]
    pub fn dims(&self) -> (u8, u8, u8) {
        (self.cols, self.rows, self.depth)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize * self.depth as usize
    }

    #[inline]
    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x < self.cols && c.y < self.rows && c.z < self.depth
    }

    /// Linear cell index, z-major
    #[inline]
    pub fn index(&self, c: Coord) -> usize {
        debug_assert!(self.in_bounds(c));
        (c.z as usize * self.rows as usize + c.y as usize) * self.cols as usize + c.x as usize
    }

    #[inline]
    pub fn coord_of(&self, idx: usize) -> Coord {
        let cols = self.cols as usize;
        let rows = self.rows as usize;
        Coord::new(
            (idx % cols) as u8,
            ((idx / cols) % rows) as u8,
            (idx / (cols * rows)) as u8,
        )
    }

    /// Get mark at coordinate
    #[inline]
    pub fn get(&self, c: Coord) -> Mark {
        let idx = self.index(c);
        if self.x.get(idx) {
            Mark::X
        } else if self.o.get(idx) {
            Mark::O
        } else {
            Mark::Empty
        }
    }

    #[inline]
    pub fn is_empty(&self, c: Coord) -> bool {
        let idx = self.index(c);
        !self.x.get(idx) && !self.o.get(idx)
    }

    /// Overwrite a cell; `Mark::Empty` clears it
    #[inline]
    pub fn set(&mut self, c: Coord, mark: Mark) {
        let idx = self.index(c);
        self.x.clear(idx);
        self.o.clear(idx);
        match mark {
            Mark::X => self.x.set(idx),
            Mark::O => self.o.set(idx),
            Mark::Empty => {}
        }
    }

    /// Get bitboard for a mark (returns None for Empty)
    #[inline]
    pub fn stones(&self, mark: Mark) -> Option<&Bitboard> {
        match mark {
            Mark::X => Some(&self.x),
            Mark::O => Some(&self.o),
            Mark::Empty => None,
        }
    }

    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.x.count() + self.o.count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.stone_count() as usize == self.cell_count()
    }

    /// All coordinates in index order
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.cell_count()).map(move |idx| self.coord_of(idx))
    }
}

/// Occupancy of every board in the set, indexed by board id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    boards: Vec<Board>,
}

impl Occupancy {
    pub fn new(boards: Vec<Board>) -> Self {
        Self { boards }
    }

    #[inline]
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    #[inline]
    pub fn board(&self, id: u8) -> Option<&Board> {
        self.boards.get(id as usize)
    }

    #[inline]
    pub fn contains(&self, pos: GlobalPos) -> bool {
        self.board(pos.board).is_some_and(|b| b.in_bounds(pos.coord()))
    }

    /// Mark at a global position; out-of-range positions read as empty
    #[inline]
    pub fn get(&self, pos: GlobalPos) -> Mark {
        match self.board(pos.board) {
            Some(b) if b.in_bounds(pos.coord()) => b.get(pos.coord()),
            _ => Mark::Empty,
        }
    }

    /// Overwrite a cell. Returns the previous mark; out-of-range writes are ignored.
    #[inline]
    pub fn set(&mut self, pos: GlobalPos, mark: Mark) -> Mark {
        match self.boards.get_mut(pos.board_index()) {
            Some(b) if b.in_bounds(pos.coord()) => {
                let prev = b.get(pos.coord());
                b.set(pos.coord(), mark);
                prev
            }
            _ => Mark::Empty,
        }
    }

    #[inline]
    pub fn is_empty_at(&self, pos: GlobalPos) -> bool {
        self.contains(pos) && self.get(pos) == Mark::Empty
    }

    /// Every cell on every board is occupied
    pub fn is_full(&self) -> bool {
        self.boards.iter().all(Board::is_full)
    }

    pub fn stone_count(&self) -> u32 {
        self.boards.iter().map(Board::stone_count).sum()
    }

    /// All positions, ordered by board then board index
    pub fn positions(&self) -> impl Iterator<Item = GlobalPos> + '_ {
        self.boards
            .iter()
            .enumerate()
            .flat_map(|(id, b)| b.coords().map(move |c| c.on(id as u8)))
    }

    /// Empty and not blocked, sorted by (board, x, y, z)
    pub fn eligible(&self, blocked: &CellSet) -> Vec<GlobalPos> {
        let mut cells: Vec<GlobalPos> = self
            .positions()
            .filter(|&p| self.get(p) == Mark::Empty && !blocked.contains(p))
            .collect();
        cells.sort_unstable();
        cells
    }
}
