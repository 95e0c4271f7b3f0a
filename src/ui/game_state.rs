//! Session state for the arena GUI
//!
//! Wraps the game with the pieces only the front end needs: the delayed
//! AI move, notifications and power-up targeting.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::board::GlobalPos;
use crate::config::GameConfig;
use crate::engine::{AIEngine, MoveResult};
use crate::error::Result;
use crate::game::{GameState, PowerUp, PowerUpEffect, PowerUpKind};
use crate::rules::TopologyRegistry;

/// Notifications stay up this long
const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// AI computation state
pub enum AiState {
    Idle,
    /// Move chosen, waiting out the think time before it is applied
    Thinking {
        result: MoveResult,
        /// History length when the move was chosen
        history_len: usize,
        start_time: Instant,
    },
}

pub struct Notice {
    pub text: String,
    until: Instant,
}

/// One running session: game, engine and presentation state
pub struct Session {
    pub game: GameState,
    engine: AIEngine,
    pub ai_state: AiState,
    think_time: Duration,
    pub last_ai_result: Option<MoveResult>,
    pub notice: Option<Notice>,
    /// Power-up waiting for its targets
    pub armed: Option<PowerUpKind>,
    pub targets: Vec<GlobalPos>,
    pub peeked: Option<GlobalPos>,
}

impl Session {
    pub fn new(config: &GameConfig, registry: Arc<TopologyRegistry>) -> Result<Self> {
        let engine = AIEngine::new(Arc::clone(&registry), &config.ai)?;
        Self::with_engine(config, registry, engine)
    }

    pub fn with_engine(
        config: &GameConfig,
        registry: Arc<TopologyRegistry>,
        engine: AIEngine,
    ) -> Result<Self> {
        Ok(Self {
            game: GameState::new(config, registry)?,
            engine,
            ai_state: AiState::Idle,
            think_time: Duration::from_millis(config.ai.think_time_ms),
            last_ai_result: None,
            notice: None,
            armed: None,
            targets: Vec::new(),
            peeked: None,
        })
    }

    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    /// Fraction of the think time already spent
    pub fn thinking_progress(&self) -> Option<f32> {
        match &self.ai_state {
            AiState::Thinking { start_time, .. } if !self.think_time.is_zero() => Some(
                (start_time.elapsed().as_secs_f32() / self.think_time.as_secs_f32()).min(1.0),
            ),
            AiState::Thinking { .. } => Some(1.0),
            AiState::Idle => None,
        }
    }

    pub fn think_time(&self) -> Duration {
        self.think_time
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            text: text.into(),
            until: Instant::now() + NOTICE_DURATION,
        });
    }

    /// Advance timers: expire the notice, choose or apply the AI move.
    pub fn tick(&mut self) {
        if self.notice.as_ref().is_some_and(|n| Instant::now() >= n.until) {
            self.notice = None;
        }
        self.start_ai_thinking();
        self.check_ai_result();
    }

    /// Pick the AI move now; it is applied once the think time has passed
    pub fn start_ai_thinking(&mut self) {
        if !self.game.is_ai_turn() || self.is_ai_thinking() {
            return;
        }
        match self.game.ai_analysis(&mut self.engine) {
            Ok(result) => {
                self.ai_state = AiState::Thinking {
                    result,
                    history_len: self.game.history().len(),
                    start_time: Instant::now(),
                };
            }
            Err(e) => {
                warn!(error = %e, "AI could not move");
                self.notify("AI FAULT");
            }
        }
    }

    /// Apply the pending AI move once it is due. A move chosen for a
    /// position that no longer exists is dropped.
    pub fn check_ai_result(&mut self) {
        let (result, history_len) = match &self.ai_state {
            AiState::Thinking {
                result,
                history_len,
                start_time,
            } if start_time.elapsed() >= self.think_time => (*result, *history_len),
            _ => return,
        };
        self.ai_state = AiState::Idle;

        if !self.game.is_ai_turn() || self.game.history().len() != history_len {
            return;
        }
        match self.game.apply_ai_move(result.best_move) {
            Ok(_) => {
                self.last_ai_result = Some(result);
                self.peeked = None;
            }
            Err(e) => self.notify(e.to_string()),
        }
    }

    /// Board click: a power-up target if one is armed, otherwise a move
    pub fn click(&mut self, pos: GlobalPos) {
        if self.is_ai_thinking() {
            return;
        }
        let Some(kind) = self.armed else {
            if let Err(e) = self.game.play(pos) {
                self.notify(e.to_string());
            }
            return;
        };

        if !self.targets.contains(&pos) {
            self.targets.push(pos);
        }
        if self.targets.len() < kind.targets() {
            return;
        }
        let power = match (kind, self.targets.as_slice()) {
            (PowerUpKind::Swap, &[a, b]) => PowerUp::Swap(a, b),
            (PowerUpKind::Remove, &[p]) => PowerUp::Remove(p),
            (PowerUpKind::Block, &[p]) => PowerUp::Block(p),
            (PowerUpKind::Clone, &[p]) => PowerUp::Clone(p),
            _ => PowerUp::Peek,
        };
        self.armed = None;
        self.targets.clear();
        self.apply_power_up(power);
    }

    /// Shop button. Peek fires at once, the others wait for targets.
    pub fn select_power_up(&mut self, kind: PowerUpKind) {
        if self.is_ai_thinking() || self.game.is_over() {
            return;
        }
        if self.game.wallet() < kind.cost(&self.game.economy().costs) {
            self.notify("CREDITS LOW");
            return;
        }
        self.targets.clear();
        if kind == PowerUpKind::Peek {
            self.armed = None;
            self.apply_power_up(PowerUp::Peek);
        } else {
            self.armed = Some(kind);
            self.notify(format!("SYSTEM: {} ENGAGED", kind.to_string().to_uppercase()));
        }
    }

    pub fn cancel_power_up(&mut self) {
        self.armed = None;
        self.targets.clear();
    }

    fn apply_power_up(&mut self, power: PowerUp) {
        match self.game.use_power_up(power, &mut self.engine) {
            Ok(PowerUpEffect::Peeked(pos)) => {
                self.peeked = Some(pos);
                self.notify(format!("AI TARGET: B{} L{}", pos.board + 1, pos.z + 1));
            }
            Ok(PowerUpEffect::Applied { .. }) => {}
            Err(e) => self.notify(e.to_string()),
        }
    }

    pub fn undo(&mut self) {
        if self.is_ai_thinking() {
            self.notify("SHIFT BLOCKED");
            return;
        }
        match self.game.undo() {
            Ok(()) => self.peeked = None,
            Err(_) => self.notify("SHIFT BLOCKED"),
        }
    }

    /// New game. A pending AI move is discarded.
    pub fn reset(&mut self) {
        self.ai_state = AiState::Idle;
        self.game.reset();
        self.last_ai_result = None;
        self.peeked = None;
        self.cancel_power_up();
    }
}
