//! Winning-line registry for a set of boards
//!
//! Enumerates, once at startup, every line a player can complete:
//! - axis-aligned rows, columns and pillars
//! - diagonals inside every x/y/z plane
//! - the space diagonals of each board
//! - wrap-connected versions of all of the above on toroidal axes
//! - cross-board lines joining the same coordinates on every board
//!
//! Lines are deduplicated by their position set, so a wrapped line reached
//! from several starting cells is stored once.

use std::collections::HashSet;
use std::ops::Range;

use tracing::info;

use crate::board::{Bitboard, Coord, GlobalPos, Occupancy};
use crate::error::{Error, Result};

use super::topology::{Axis, Topology};

/// The 13 line directions, one per opposite pair (first non-zero component positive).
pub const DIRECTIONS: [[i32; 3]; 13] = [
    [1, 0, 0],  // x
    [0, 1, 0],  // y
    [0, 0, 1],  // z
    [1, 1, 0],  // xy diagonal
    [1, -1, 0], // xy anti-diagonal
    [1, 0, 1],  // xz diagonal
    [1, 0, -1], // xz anti-diagonal
    [0, 1, 1],  // yz diagonal
    [0, 1, -1], // yz anti-diagonal
    [1, 1, 1],  // space diagonals
    [1, 1, -1],
    [1, -1, 1],
    [1, -1, -1],
];

/// One winning line: an ordered run of global positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningLine {
    positions: Vec<GlobalPos>,
    /// Cell mask per board touched, sorted by board id
    masks: Vec<(u8, Bitboard)>,
}

impl WinningLine {
    fn new(positions: Vec<GlobalPos>, masks: Vec<(u8, Bitboard)>) -> Self {
        Self { positions, masks }
    }

    #[inline]
    pub fn positions(&self) -> &[GlobalPos] {
        &self.positions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Per-board cell masks, sorted by board id
    #[inline]
    pub fn masks(&self) -> &[(u8, Bitboard)] {
        &self.masks
    }

    /// Touches more than one board
    #[inline]
    pub fn is_cross_board(&self) -> bool {
        self.masks.len() > 1
    }

    /// Positions do not all share the first position's depth layer
    pub fn varies_depth(&self) -> bool {
        match self.positions.first() {
            Some(first) => self.positions.iter().any(|p| p.z != first.z),
            None => false,
        }
    }

    pub fn contains(&self, pos: GlobalPos) -> bool {
        self.positions.contains(&pos)
    }
}

/// Immutable set of winning lines for every configured board.
#[derive(Debug, Clone)]
pub struct TopologyRegistry {
    topologies: Vec<Topology>,
    line_length: usize,
    /// In-board lines for board 0, board 1, ... followed by cross-board lines
    lines: Vec<WinningLine>,
    board_ranges: Vec<Range<usize>>,
    cross_range: Range<usize>,
    /// Line ids through each cell, `through[board][cell_index]`
    through: Vec<Vec<Vec<usize>>>,
}

impl TopologyRegistry {
    /// Enumerate every line for the given boards.
    pub fn new(topologies: Vec<Topology>, line_length: usize) -> Result<Self> {
        if topologies.is_empty() {
            return Err(Error::config("at least one board is required"));
        }
        if topologies.len() > u8::MAX as usize {
            return Err(Error::config(format!(
                "{} boards configured, at most {} supported",
                topologies.len(),
                u8::MAX
            )));
        }
        if line_length == 0 {
            return Err(Error::config("line length must be positive"));
        }
        let longest = topologies.iter().map(longest_extent).max().unwrap_or(0);
        if line_length > longest {
            return Err(Error::config(format!(
                "line length {line_length} exceeds the longest board axis ({longest})"
            )));
        }

        let mut lines = Vec::new();
        let mut board_ranges = Vec::with_capacity(topologies.len());
        let mut seen: HashSet<Vec<(u8, Bitboard)>> = HashSet::new();

        for id in 0..topologies.len() {
            let start = lines.len();
            enumerate_board_lines(id as u8, &topologies, line_length, &mut seen, &mut lines);
            board_ranges.push(start..lines.len());
        }

        let cross_start = lines.len();
        enumerate_cross_lines(&topologies, line_length, &mut seen, &mut lines);
        let cross_range = cross_start..lines.len();

        let mut through: Vec<Vec<Vec<usize>>> = topologies
            .iter()
            .map(|t| vec![Vec::new(); t.cell_count()])
            .collect();
        for (line_id, line) in lines.iter().enumerate() {
            for &(board, mask) in line.masks() {
                for idx in mask.iter_ones() {
                    through[board as usize][idx].push(line_id);
                }
            }
        }

        info!(
            boards = topologies.len(),
            line_length,
            in_board = cross_start,
            cross_board = cross_range.len(),
            "topology registry built"
        );

        Ok(Self {
            topologies,
            line_length,
            lines,
            board_ranges,
            cross_range,
            through,
        })
    }

    #[inline]
    pub fn board_count(&self) -> usize {
        self.topologies.len()
    }

    #[inline]
    pub fn line_length(&self) -> usize {
        self.line_length
    }

    #[inline]
    pub fn topology(&self, board: u8) -> Option<&Topology> {
        self.topologies.get(board as usize)
    }

    pub fn topologies(&self) -> &[Topology] {
        &self.topologies
    }

    /// In-board lines of one board, in enumeration order
    pub fn lines_for(&self, board: u8) -> &[WinningLine] {
        match self.board_ranges.get(board as usize) {
            Some(range) => &self.lines[range.clone()],
            None => &[],
        }
    }

    /// Lines spanning more than one board
    pub fn cross_board_lines(&self) -> &[WinningLine] {
        &self.lines[self.cross_range.clone()]
    }

    /// Every line: in-board lines board by board, then cross-board lines
    #[inline]
    pub fn all_lines(&self) -> &[WinningLine] {
        &self.lines
    }

    #[inline]
    pub fn line(&self, id: usize) -> &WinningLine {
        &self.lines[id]
    }

    /// Ids of the lines containing `pos`; empty for an out-of-range position
    pub fn lines_through(&self, pos: GlobalPos) -> &[usize] {
        let Some(topo) = self.topology(pos.board) else {
            return &[];
        };
        if !topo.contains(pos.coord()) {
            return &[];
        }
        &self.through[pos.board_index()][topo.index(pos.coord())]
    }

    /// All-empty occupancy shaped like the configured boards
    pub fn empty_occupancy(&self) -> Occupancy {
        Occupancy::new(self.topologies.iter().map(Topology::empty_board).collect())
    }
}

/// Push a line unless its position set was already registered
fn push_unique(
    positions: Vec<GlobalPos>,
    topologies: &[Topology],
    seen: &mut HashSet<Vec<(u8, Bitboard)>>,
    out: &mut Vec<WinningLine>,
) {
    let mut masks: Vec<(u8, Bitboard)> = Vec::new();
    for p in &positions {
        let idx = topologies[p.board_index()].index(p.coord());
        match masks.iter_mut().find(|(b, _)| *b == p.board) {
            Some((_, mask)) => mask.set(idx),
            None => {
                let mut mask = Bitboard::new();
                mask.set(idx);
                masks.push((p.board, mask));
            }
        }
    }
    masks.sort_unstable_by_key(|(b, _)| *b);

    // Repeated cells (short wrapped axis) do not make a line
    let distinct: u32 = masks.iter().map(|(_, m)| m.count()).sum();
    if distinct as usize != positions.len() {
        return;
    }
    if seen.insert(masks.clone()) {
        out.push(WinningLine::new(positions, masks));
    }
}

fn enumerate_board_lines(
    board: u8,
    topologies: &[Topology],
    line_length: usize,
    seen: &mut HashSet<Vec<(u8, Bitboard)>>,
    out: &mut Vec<WinningLine>,
) {
    let topo = &topologies[board as usize];
    for dir in DIRECTIONS {
        for start in topo.coords() {
            let Some(cells) = walk(start, dir, line_length, |raw| topo.normalize_coord(raw)) else {
                continue;
            };
            let positions = cells.iter().map(|c| c.on(board)).collect();
            push_unique(positions, topologies, seen, out);
        }
    }
}

fn enumerate_cross_lines(
    topologies: &[Topology],
    line_length: usize,
    seen: &mut HashSet<Vec<(u8, Bitboard)>>,
    out: &mut Vec<WinningLine>,
) {
    let boards = topologies.len();
    if boards < 2 || line_length % boards != 0 {
        return;
    }
    let segment = line_length / boards;

    // Bounds shared by every board; cross-board segments never wrap
    let common = |raw: [i32; 3]| -> Option<Coord> {
        let [x, y, z] = raw.map(|v| u8::try_from(v).ok());
        let c = Coord::new(x?, y?, z?);
        topologies.iter().all(|t| t.contains(c)).then_some(c)
    };

    for dir in DIRECTIONS {
        for start in topologies[0].coords() {
            let Some(cells) = walk(start, dir, segment, &common) else {
                continue;
            };
            let positions: Vec<GlobalPos> = cells
                .iter()
                .flat_map(|c| (0..boards).map(move |b| c.on(b as u8)))
                .collect();
            push_unique(positions, topologies, seen, out);
        }
    }
}

/// Largest extent over the three axes of `topo`
pub(crate) fn longest_extent(topo: &Topology) -> usize {
    Axis::ALL
        .iter()
        .map(|&axis| topo.extent(axis) as usize)
        .max()
        .unwrap_or(0)
}

/// Step `len` cells from `start` along `dir`, normalizing each raw coordinate
fn walk(
    start: Coord,
    dir: [i32; 3],
    len: usize,
    normalize: impl Fn([i32; 3]) -> Option<Coord>,
) -> Option<Vec<Coord>> {
    (0..len as i32)
        .map(|i| {
            normalize([
                start.x as i32 + dir[0] * i,
                start.y as i32 + dir[1] * i,
                start.z as i32 + dir[2] * i,
            ])
        })
        .collect()
}
