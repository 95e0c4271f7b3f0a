//! Line geometry, win detection and scoring
//!
//! - [`topology`]: per-board dimensions and wrap-around normalization
//! - [`registry`]: every winning line, in-board and cross-board
//! - [`win`]: completed-line detection and classification
//! - [`scoring`]: bonus points for a completed set of lines

pub mod registry;
pub mod scoring;
pub mod topology;
pub mod win;

pub use registry::{TopologyRegistry, WinningLine, DIRECTIONS};
pub use scoring::{line_points, score_report};
pub use topology::{Axis, Topology};
pub use win::{classify, ClassifiedLine, LineClass, WinEvaluator, WinReport};
