//! Board rendering for the arena GUI
//!
//! One view per board. Every depth layer is drawn as its own grid, x across
//! and y down, with the layers tiled left to right and top to bottom.

use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use crate::board::{Board, CellSet, Coord, GlobalPos, Mark};
use crate::rules::{Axis, Topology};

use super::theme::*;

/// Overlays drawn on top of the marks
pub struct BoardMarkers<'a> {
    pub blocked: &'a CellSet,
    pub winning: &'a CellSet,
    /// Targets picked so far for a pending power-up
    pub selected: &'a [GlobalPos],
    pub peek: Option<GlobalPos>,
}

/// Board view handles rendering and input for one board
pub struct BoardView {
    board: u8,
    cell_size: f32,
    origin: Pos2,
    dims: (u8, u8, u8),
    layer_cols: u8,
}

impl BoardView {
    pub fn new(board: u8) -> Self {
        Self {
            board,
            cell_size: 20.0,
            origin: Pos2::ZERO,
            dims: (0, 0, 0),
            layer_cols: 1,
        }
    }

    /// Render the board and return the clicked cell, if any
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        board: &Board,
        topology: &Topology,
        markers: &BoardMarkers<'_>,
        interactive: bool,
    ) -> Option<GlobalPos> {
        self.dims = board.dims();
        let (cols, rows, depth) = self.dims;
        self.layer_cols = (depth as f32).sqrt().ceil().max(1.0) as u8;
        let layer_rows = depth.div_ceil(self.layer_cols);

        // Fit the cell size to the available width
        let lc = self.layer_cols as f32;
        let spare = ui.available_width()
            - 2.0 * BOARD_MARGIN
            - (lc - 1.0) * LAYER_GAP
            - lc * (cols as f32 - 1.0) * CELL_GAP;
        self.cell_size = (spare / (lc * cols as f32)).clamp(10.0, 48.0);

        let lr = layer_rows as f32;
        let width = 2.0 * BOARD_MARGIN
            + lc * self.layer_width()
            + (lc - 1.0) * LAYER_GAP;
        let height = 2.0 * BOARD_MARGIN
            + lr * (LAYER_LABEL_HEIGHT + self.layer_height(rows))
            + (lr - 1.0) * LAYER_GAP;

        let (response, painter) = ui.allocate_painter(Vec2::new(width, height), Sense::click());
        self.origin = response.rect.min;

        let tint = if topology.is_toroidal() {
            TOROIDAL_TINT
        } else {
            EUCLIDEAN_TINT
        };
        painter.rect_filled(response.rect, CornerRadius::same(8), tint);

        for z in 0..depth {
            self.draw_layer(&painter, board, z, markers);
        }
        self.draw_wrap_hint(&painter, topology, response.rect);

        let mut clicked = None;
        if interactive {
            if let Some(pointer) = response.hover_pos() {
                if let Some(coord) = self.screen_to_cell(pointer) {
                    let pos = coord.on(self.board);
                    let free = board.is_empty(coord) && !markers.blocked.contains(pos);
                    let color = if free { hover_valid() } else { hover_invalid() };
                    painter.rect_filled(self.cell_rect(coord), CornerRadius::same(3), color);
                    if response.clicked() {
                        clicked = Some(pos);
                    }
                }
            }
        }
        clicked
    }

    fn layer_width(&self) -> f32 {
        let cols = self.dims.0 as f32;
        cols * self.cell_size + (cols - 1.0) * CELL_GAP
    }

    fn layer_height(&self, rows: u8) -> f32 {
        let rows = rows as f32;
        rows * self.cell_size + (rows - 1.0) * CELL_GAP
    }

    /// Top-left corner of layer `z`'s grid (below its label)
    fn layer_origin(&self, z: u8) -> Pos2 {
        let col = (z % self.layer_cols) as f32;
        let row = (z / self.layer_cols) as f32;
        let block_h = LAYER_LABEL_HEIGHT + self.layer_height(self.dims.1);
        Pos2::new(
            self.origin.x + BOARD_MARGIN + col * (self.layer_width() + LAYER_GAP),
            self.origin.y + BOARD_MARGIN + row * (block_h + LAYER_GAP) + LAYER_LABEL_HEIGHT,
        )
    }

    fn cell_rect(&self, c: Coord) -> Rect {
        let step = self.cell_size + CELL_GAP;
        let min = self.layer_origin(c.z) + Vec2::new(c.x as f32 * step, c.y as f32 * step);
        Rect::from_min_size(min, Vec2::splat(self.cell_size))
    }

    /// Convert screen coordinates to a cell, `None` over gaps and margins
    pub fn screen_to_cell(&self, p: Pos2) -> Option<Coord> {
        let (cols, rows, depth) = self.dims;
        (0..depth).find_map(|z| {
            let origin = self.layer_origin(z);
            let rel = p - origin;
            if rel.x < 0.0 || rel.y < 0.0 {
                return None;
            }
            let step = self.cell_size + CELL_GAP;
            let (x, y) = ((rel.x / step) as u32, (rel.y / step) as u32);
            let inside = rel.x - x as f32 * step <= self.cell_size
                && rel.y - y as f32 * step <= self.cell_size;
            (inside && x < cols as u32 && y < rows as u32)
                .then(|| Coord::new(x as u8, y as u8, z))
        })
    }

    fn draw_layer(&self, painter: &Painter, board: &Board, z: u8, markers: &BoardMarkers<'_>) {
        let origin = self.layer_origin(z);
        painter.text(
            origin - Vec2::new(0.0, 2.0),
            Align2::LEFT_BOTTOM,
            format!("L{}", z + 1),
            FontId::proportional(11.0),
            TEXT_MUTED,
        );

        let (cols, rows, _) = self.dims;
        for y in 0..rows {
            for x in 0..cols {
                let coord = Coord::new(x, y, z);
                let pos = coord.on(self.board);
                let rect = self.cell_rect(coord);

                let fill = if markers.blocked.contains(pos) {
                    BLOCKED_FILL
                } else {
                    CELL_EMPTY
                };
                painter.rect_filled(rect, CornerRadius::same(3), fill);

                self.draw_mark(painter, rect, board.get(coord));

                if markers.winning.contains(pos) {
                    outline(painter, rect, WIN_HIGHLIGHT);
                }
                if markers.selected.contains(&pos) {
                    outline(painter, rect, SELECTED_MARKER);
                }
                if markers.peek == Some(pos) {
                    painter.circle_stroke(
                        rect.center(),
                        self.cell_size * 0.45,
                        Stroke::new(HIGHLIGHT_STROKE_WIDTH, PEEK_MARKER),
                    );
                }
            }
        }
    }

    fn draw_mark(&self, painter: &Painter, rect: Rect, mark: Mark) {
        let r = self.cell_size * MARK_RADIUS_RATIO;
        let c = rect.center();
        match mark {
            Mark::X => {
                let stroke = Stroke::new(MARK_STROKE_WIDTH, X_MARK);
                painter.line_segment([c + Vec2::new(-r, -r), c + Vec2::new(r, r)], stroke);
                painter.line_segment([c + Vec2::new(-r, r), c + Vec2::new(r, -r)], stroke);
            }
            Mark::O => {
                painter.circle_stroke(c, r, Stroke::new(MARK_STROKE_WIDTH, O_MARK));
            }
            Mark::Empty => {}
        }
    }

    /// Name the wrapped axes in the bottom-right corner
    fn draw_wrap_hint(&self, painter: &Painter, topology: &Topology, rect: Rect) {
        let wrapped: Vec<&str> = Axis::ALL
            .iter()
            .filter(|&&axis| topology.wraps(axis))
            .map(|axis| match axis {
                Axis::X => "x",
                Axis::Y => "y",
                Axis::Z => "z",
            })
            .collect();
        if wrapped.is_empty() {
            return;
        }
        painter.text(
            rect.max - Vec2::new(6.0, 4.0),
            Align2::RIGHT_BOTTOM,
            format!("wraps {}", wrapped.join(" ")),
            FontId::proportional(10.0),
            WRAP_HINT,
        );
    }
}

fn outline(painter: &Painter, rect: Rect, color: Color32) {
    let stroke = Stroke::new(HIGHLIGHT_STROKE_WIDTH, color);
    let [a, b, c, d] = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
    for segment in [[a, b], [b, c], [c, d], [d, a]] {
        painter.line_segment(segment, stroke);
    }
}
