//! Theme constants for the arena GUI

use egui::Color32;

// Board colors - dark neon
pub const BOARD_BG: Color32 = Color32::from_rgb(10, 15, 29);
pub const EUCLIDEAN_TINT: Color32 = Color32::from_rgb(14, 26, 44);
pub const TOROIDAL_TINT: Color32 = Color32::from_rgb(30, 16, 46);
pub const CELL_EMPTY: Color32 = Color32::from_rgb(18, 24, 38);

// Marks
pub const X_MARK: Color32 = Color32::from_rgb(34, 211, 238); // Cyan
pub const O_MARK: Color32 = Color32::from_rgb(244, 63, 94); // Rose

// Markers
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(250, 204, 21);
pub const BLOCKED_FILL: Color32 = Color32::from_rgb(70, 75, 90);
pub const PEEK_MARKER: Color32 = Color32::from_rgb(168, 85, 247);
pub const SELECTED_MARKER: Color32 = Color32::from_rgb(250, 250, 250);
pub const WRAP_HINT: Color32 = Color32::from_rgb(192, 132, 252);

pub fn hover_valid() -> Color32 {
    Color32::from_rgba_unmultiplied(34, 211, 238, 60)
}

pub fn hover_invalid() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 50, 50, 60)
}

// Panel colors
pub const PANEL_BG: Color32 = Color32::from_rgb(3, 7, 18);
pub const CARD_BG: Color32 = Color32::from_rgb(17, 24, 39);
pub const NOTICE_BG: Color32 = Color32::from_rgb(8, 145, 178);
pub const GAME_OVER_BG: Color32 = Color32::from_rgb(8, 51, 68);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(107, 114, 128);
pub const CREDITS: Color32 = Color32::from_rgb(250, 204, 21);
pub const SHOP_ACCENT: Color32 = Color32::from_rgb(192, 132, 252);

// Status colors
pub const STATUS_READY: Color32 = Color32::from_rgb(6, 182, 212);
pub const STATUS_THINKING: Color32 = Color32::from_rgb(244, 63, 94);

// Sizes
pub const BOARD_MARGIN: f32 = 12.0;
pub const LAYER_GAP: f32 = 14.0;
pub const LAYER_LABEL_HEIGHT: f32 = 14.0;
pub const CELL_GAP: f32 = 3.0;
pub const MARK_RADIUS_RATIO: f32 = 0.36;
pub const MARK_STROKE_WIDTH: f32 = 3.0;
pub const HIGHLIGHT_STROKE_WIDTH: f32 = 2.0;
