//! Per-board topology: dimensions and wrap-around adjacency

use crate::board::{Board, Coord, MAX_CELLS};
use crate::error::{Error, Result};

/// Board axis. x spans columns, y spans rows, z spans depth layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    fn slot(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Immutable description of one board's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    extent: [u8; 3],
    wraps: [bool; 3],
}

impl Topology {
    /// Build a descriptor. Fails on a zero dimension or a board too large for a
    /// [`Bitboard`](crate::board::Bitboard).
    pub fn new(cols: usize, rows: usize, depth: usize, wraps: [bool; 3]) -> Result<Self> {
        if cols == 0 || rows == 0 || depth == 0 {
            return Err(Error::config(format!(
                "board dimensions must be positive, got {cols}x{rows}x{depth}"
            )));
        }
        let cells = cols
            .checked_mul(rows)
            .and_then(|n| n.checked_mul(depth))
            .unwrap_or(usize::MAX);
        if cells > MAX_CELLS || cols.max(rows).max(depth) > u8::MAX as usize {
            return Err(Error::config(format!(
                "board {cols}x{rows}x{depth} has {cells} cells, at most {MAX_CELLS} supported"
            )));
        }
        Ok(Self {
            extent: [cols as u8, rows as u8, depth as u8],
            wraps,
        })
    }

    /// Ordinary bounded cube
    pub fn euclidean(size: usize) -> Result<Self> {
        Self::new(size, size, size, [false; 3])
    }

    #[inline]
    pub fn extent(&self, axis: Axis) -> u8 {
        self.extent[axis.slot()]
    }

    #[inline]
    pub fn wraps(&self, axis: Axis) -> bool {
        self.wraps[axis.slot()]
    }

    #[inline]
    pub fn is_toroidal(&self) -> bool {
        self.wraps.iter().any(|&w| w)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.extent.iter().map(|&e| e as usize).product()
    }

    /// Map a raw index on `axis` into range: modulo on a wrapped axis,
    /// rejected when out of bounds on an ordinary one.
    #[inline]
    pub fn normalize(&self, axis: Axis, value: i32) -> Option<u8> {
        let extent = self.extent(axis) as i32;
        if self.wraps(axis) {
            Some(value.rem_euclid(extent) as u8)
        } else if (0..extent).contains(&value) {
            Some(value as u8)
        } else {
            None
        }
    }

    /// Normalize a raw (x, y, z) triple
    pub fn normalize_coord(&self, raw: [i32; 3]) -> Option<Coord> {
        Some(Coord::new(
            self.normalize(Axis::X, raw[0])?,
            self.normalize(Axis::Y, raw[1])?,
            self.normalize(Axis::Z, raw[2])?,
        ))
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.x < self.extent[0] && c.y < self.extent[1] && c.z < self.extent[2]
    }

    /// Linear cell index, same layout as [`Board::index`]
    #[inline]
    pub fn index(&self, c: Coord) -> usize {
        let [cols, rows, _] = self.extent;
        (c.z as usize * rows as usize + c.y as usize) * cols as usize + c.x as usize
    }

    /// Empty occupancy matching this geometry
    pub fn empty_board(&self) -> Board {
        Board::new(self.extent[0], self.extent[1], self.extent[2])
    }

    /// All in-range coordinates in board index order (x fastest)
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let [cols, rows, depth] = self.extent;
        (0..depth).flat_map(move |z| {
            (0..rows).flat_map(move |y| (0..cols).map(move |x| Coord::new(x, y, z)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimension_rejected() {
        let err = Topology::new(4, 0, 4, [false; 3]).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_oversized_board_rejected() {
        assert!(Topology::new(8, 8, 5, [false; 3]).is_err());
        assert!(Topology::new(8, 8, 4, [false; 3]).is_ok());
        assert!(Topology::new(256, 1, 1, [false; 3]).is_err());
    }

    #[test]
    fn test_normalize_bounded_axis() {
        let t = Topology::euclidean(4).unwrap();
        assert_eq!(t.normalize(Axis::X, 3), Some(3));
        assert_eq!(t.normalize(Axis::X, 4), None);
        assert_eq!(t.normalize(Axis::Y, -1), None);
        assert!(!t.is_toroidal());
    }

    #[test]
    fn test_normalize_wrapped_axis() {
        let t = Topology::new(4, 4, 4, [true, false, false]).unwrap();
        assert_eq!(t.normalize(Axis::X, 4), Some(0));
        assert_eq!(t.normalize(Axis::X, -1), Some(3));
        assert_eq!(t.normalize(Axis::X, 9), Some(1));
        assert_eq!(t.normalize(Axis::Y, 4), None);
        assert!(t.is_toroidal());
    }

    #[test]
    fn test_coords_match_board_indexing() {
        let t = Topology::new(3, 2, 2, [false; 3]).unwrap();
        let board = t.empty_board();
        for (idx, c) in t.coords().enumerate() {
            assert_eq!(board.index(c), idx);
        }
        assert_eq!(t.coords().count(), t.cell_count());
    }
}
