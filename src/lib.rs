//! Hyper-space tic-tac-toe engine
//!
//! Noughts and crosses on several 3D boards at once:
//! - Any number of boards, each with its own size and wrap-around axes
//! - Line length fixed per game (4 by default)
//! - Lines inside one board, wrapped lines on toroidal boards, and lines
//!   that run across boards
//! - Points per completed line, with bonuses for 3D and cross-board lines
//! - Credits economy with undo and power-ups
//!
//! # Architecture
//!
//! - [`board`]: cells, marks and bitboard occupancy
//! - [`rules`]: topologies, the winning-line registry, win detection and scoring
//! - [`eval`]: one-ply cell heuristic
//! - [`search`]: one-reply lookahead
//! - [`engine`]: the [`AIEngine`] with its three difficulty tiers
//! - [`game`]: turns, credits, undo and power-ups
//! - [`config`]: TOML configuration with env overrides
//! - [`ui`]: egui front end
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use hyperspace::{AIEngine, GameConfig, GameState, Mark};
//! use hyperspace::board::GlobalPos;
//!
//! let config = GameConfig::default();
//! let registry = Arc::new(config.registry().unwrap());
//! let mut game = GameState::new(&config, Arc::clone(&registry)).unwrap();
//! let mut engine = AIEngine::with_seed(registry, &config.ai, 1).unwrap();
//!
//! game.play(GlobalPos::new(0, 1, 1, 1)).unwrap();
//! let reply = game.ai_move(&mut engine).unwrap();
//! assert_eq!(reply.player, Mark::O);
//! assert_eq!(game.current_player(), Mark::X);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod rules;
pub mod search;
pub mod ui;

pub use board::{CellSet, GlobalPos, Mark, Occupancy};
pub use config::GameConfig;
pub use engine::{AIEngine, Difficulty, MoveResult};
pub use error::{Error, Result};
pub use game::{GameState, Outcome};
pub use rules::{Topology, TopologyRegistry, WinEvaluator};
