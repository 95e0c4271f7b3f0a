//! Caller-side game state
//!
//! Owns the occupancy, move history, credits and blocked cells, and drives
//! the win evaluator after every mutation. The core modules only ever see
//! snapshots handed out by [`GameState::occupancy`] and
//! [`GameState::blocked_cells`].

pub mod power;


use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::board::{CellSet, Coord, GlobalPos, Mark, Occupancy};
use crate::config::{EconomyConfig, GameConfig, ScoringConfig};
use crate::engine::{AIEngine, Difficulty, MoveResult};
use crate::error::{Error, Result};
use crate::rules::{score_report, TopologyRegistry, WinEvaluator, WinReport};

pub use power::{PowerUp, PowerUpEffect, PowerUpKind};

/// One entry of the append-only move history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub board: u8,
    pub coord: Coord,
    pub player: Mark,
    pub timestamp: SystemTime,
}

impl Move {
    #[inline]
    pub fn pos(&self) -> GlobalPos {
        self.coord.on(self.board)
    }
}

/// Terminal status of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    InProgress,
    Won(Mark),
    Draw,
}

impl Outcome {
    #[inline]
    pub fn is_over(self) -> bool {
        self != Outcome::InProgress
    }
}

/// What a single move did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub pos: GlobalPos,
    pub player: Mark,
    /// Points credited to the human for this move
    pub points: u32,
    pub report: WinReport,
    pub outcome: Outcome,
}

/// Full state of one game
pub struct GameState {
    registry: Arc<TopologyRegistry>,
    scoring: ScoringConfig,
    economy: EconomyConfig,
    occupancy: Occupancy,
    /// The computer's mark; the human plays the other one
    ai_player: Mark,
    current: Mark,
    score: u32,
    wallet: u32,
    history: Vec<Move>,
    difficulty: Difficulty,
    testing_mode: bool,
    outcome: Outcome,
    /// Blocked cell -> moves left before it thaws
    blocked: BTreeMap<GlobalPos, u32>,
    winning_cells: CellSet,
}

impl GameState {
    pub fn new(config: &GameConfig, registry: Arc<TopologyRegistry>) -> Result<Self> {
        let occupancy = registry.empty_occupancy();
        Ok(Self {
            registry,
            scoring: config.scoring.clone(),
            economy: config.economy.clone(),
            occupancy,
            ai_player: config.ai.player()?,
            current: Mark::X,
            score: 0,
            wallet: config.economy.initial_wallet,
            history: Vec::new(),
            difficulty: config.ai.difficulty()?,
            testing_mode: false,
            outcome: Outcome::InProgress,
            blocked: BTreeMap::new(),
            winning_cells: CellSet::new(),
        })
    }

    /// Start over, keeping difficulty and testing mode
    pub fn reset(&mut self) {
        self.occupancy = self.registry.empty_occupancy();
        self.current = Mark::X;
        self.score = 0;
        self.wallet = self.economy.initial_wallet;
        self.history.clear();
        self.outcome = Outcome::InProgress;
        self.blocked.clear();
        self.winning_cells.clear();
        info!(difficulty = %self.difficulty, "game reset");
    }

    #[inline]
    pub fn registry(&self) -> &Arc<TopologyRegistry> {
        &self.registry
    }

    #[inline]
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    #[inline]
    pub fn current_player(&self) -> Mark {
        self.current
    }

    #[inline]
    pub fn ai_player(&self) -> Mark {
        self.ai_player
    }

    #[inline]
    pub fn human_player(&self) -> Mark {
        self.ai_player.opponent()
    }

    /// Points the human has earned this game
    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn wallet(&self) -> u32 {
        self.wallet
    }

    #[inline]
    pub fn economy(&self) -> &EconomyConfig {
        &self.economy
    }

    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        debug!(%difficulty, "difficulty changed");
        self.difficulty = difficulty;
    }

    #[inline]
    pub fn testing_mode(&self) -> bool {
        self.testing_mode
    }

    /// In testing mode the human also plays the computer's side
    pub fn set_testing_mode(&mut self, enabled: bool) {
        self.testing_mode = enabled;
    }

    #[inline]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    #[inline]
    pub fn winning_cells(&self) -> &CellSet {
        &self.winning_cells
    }

    /// Snapshot of currently blocked cells
    pub fn blocked_cells(&self) -> CellSet {
        self.blocked.keys().copied().collect()
    }

    #[inline]
    pub fn is_blocked(&self, pos: GlobalPos) -> bool {
        self.blocked.contains_key(&pos)
    }

    /// Moves left before `pos` thaws
    pub fn blocked_turns(&self, pos: GlobalPos) -> Option<u32> {
        self.blocked.get(&pos).copied()
    }

    /// The computer should move now
    pub fn is_ai_turn(&self) -> bool {
        !self.is_over() && !self.testing_mode && self.current == self.ai_player
    }

    /// Whether a click may place a mark right now
    pub fn is_human_turn(&self) -> bool {
        !self.is_over() && (self.testing_mode || self.current != self.ai_player)
    }

    /// Empty, in range and not blocked
    pub fn is_playable(&self, pos: GlobalPos) -> bool {
        self.occupancy.is_empty_at(pos) && !self.is_blocked(pos)
    }

    /// Place the side to move's mark on behalf of the human.
    pub fn play(&mut self, pos: GlobalPos) -> Result<MoveOutcome> {
        if self.is_over() {
            return Err(reject("game is over"));
        }
        if !self.is_human_turn() {
            return Err(reject("waiting for the computer to move"));
        }
        self.check_target(pos)?;
        Ok(self.apply_move(pos, self.current))
    }

    /// Apply a move the engine already chose (the delayed half of an AI turn).
    pub fn apply_ai_move(&mut self, pos: GlobalPos) -> Result<MoveOutcome> {
        if !self.is_ai_turn() {
            return Err(reject("not the computer's turn"));
        }
        self.check_target(pos)?;
        Ok(self.apply_move(pos, self.ai_player))
    }

    /// Ask the engine for a move without applying it
    pub fn ai_choice(&self, engine: &mut AIEngine) -> Result<GlobalPos> {
        self.ai_analysis(engine).map(|r| r.best_move)
    }

    /// [`ai_choice`](Self::ai_choice) with the engine's statistics
    pub fn ai_analysis(&self, engine: &mut AIEngine) -> Result<MoveResult> {
        if !self.is_ai_turn() {
            return Err(reject("not the computer's turn"));
        }
        engine.select_move_with_stats(&self.occupancy, &self.blocked_cells(), self.difficulty)
    }

    /// Choose and apply the computer's move in one step
    pub fn ai_move(&mut self, engine: &mut AIEngine) -> Result<MoveOutcome> {
        let pos = self.ai_choice(engine)?;
        self.apply_ai_move(pos)
    }

    /// Take back the last two moves for `undo_cost` credits.
    ///
    /// Points already paid stay paid. The turn returns to X.
    pub fn undo(&mut self) -> Result<()> {
        if self.history.len() < 2 {
            return Err(reject("nothing to undo"));
        }
        if self.wallet < self.economy.undo_cost {
            return Err(reject("insufficient credits"));
        }
        for mv in self.history.split_off(self.history.len() - 2) {
            self.occupancy.set(mv.pos(), Mark::Empty);
        }
        self.wallet -= self.economy.undo_cost;
        self.current = Mark::X;
        self.outcome = Outcome::InProgress;
        self.winning_cells.clear();
        debug!(wallet = self.wallet, moves = self.history.len(), "undo");
        Ok(())
    }

    fn check_target(&self, pos: GlobalPos) -> Result<()> {
        if !self.occupancy.contains(pos) {
            return Err(reject(format!("{pos} is off the board")));
        }
        if !self.occupancy.is_empty_at(pos) {
            return Err(reject(format!("{pos} is occupied")));
        }
        if self.is_blocked(pos) {
            return Err(reject(format!("{pos} is blocked")));
        }
        Ok(())
    }

    fn apply_move(&mut self, pos: GlobalPos, player: Mark) -> MoveOutcome {
        self.occupancy.set(pos, player);
        self.history.push(Move {
            board: pos.board,
            coord: pos.coord(),
            player,
            timestamp: SystemTime::now(),
        });

        let report = WinEvaluator::new(&self.registry).evaluate(&self.occupancy, player);
        let points = self.settle(player, &report);

        self.current = player.opponent();
        self.age_blocked();
        self.skip_stalled_turns();

        debug!(%pos, %player, points, outcome = ?self.outcome, "move applied");
        MoveOutcome {
            pos,
            player,
            points,
            report,
            outcome: self.outcome,
        }
    }

    /// Record the terminal state for `report` and pay the human. Returns the
    /// points credited.
    fn settle(&mut self, player: Mark, report: &WinReport) -> u32 {
        self.winning_cells = report.winning_cells();
        let mut points = 0;
        if report.is_win() {
            if player == self.human_player() {
                points = score_report(report, &self.scoring);
                self.wallet = self.wallet.saturating_add(points);
                self.score = self.score.saturating_add(points);
            }
            self.outcome = Outcome::Won(player);
            info!(winner = %player, lines = report.lines.len(), points, "game won");
        } else if self.occupancy.is_full() {
            self.outcome = Outcome::Draw;
            info!("game drawn");
        }
        points
    }

    /// Terminal detection after a power-up changed the board. The user of the
    /// power-up is checked first.
    fn rescan(&mut self, user: Mark) -> u32 {
        let eval = WinEvaluator::new(&self.registry);
        for player in [user, user.opponent()] {
            let report = eval.evaluate(&self.occupancy, player);
            if report.is_win() {
                return self.settle(player, &report);
            }
        }
        self.settle(user, &WinReport::default())
    }

    /// Pass the turn while the side to move has only blocked cells left.
    /// Every pass ages the blocks, so this ends once one of them thaws.
    fn skip_stalled_turns(&mut self) {
        while !self.is_over()
            && !self.occupancy.is_full()
            && self.occupancy.eligible(&self.blocked_cells()).is_empty()
        {
            info!(player = %self.current, blocked = self.blocked.len(), "no free cell, turn skipped");
            self.current = self.current.opponent();
            self.age_blocked();
        }
    }

    fn age_blocked(&mut self) {
        self.blocked.retain(|_, left| {
            *left = left.saturating_sub(1);
            *left > 0
        });
    }
}

fn reject(reason: impl Into<String>) -> Error {
    let reason = reason.into();
    warn!(%reason, "action rejected");
    Error::illegal(reason)
}
