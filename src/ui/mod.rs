//! Native GUI for the arena, built on egui/eframe.

mod app;
mod board_view;
mod game_state;
mod theme;

pub use app::HyperspaceApp;
pub use game_state::{AiState, Session};
