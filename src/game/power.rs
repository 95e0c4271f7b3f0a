//! Power-up shop
//!
//! Every power-up is paid from the wallet only when it succeeds. The ones
//! that change the board re-run terminal detection afterwards.

use std::fmt;

use tracing::info;

use crate::board::{GlobalPos, Mark};
use crate::config::PowerUpCosts;
use crate::engine::AIEngine;
use crate::error::Result;

use super::{reject, GameState};

/// Shop entry, without a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Swap,
    Remove,
    Block,
    Peek,
    Clone,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Swap,
        PowerUpKind::Remove,
        PowerUpKind::Block,
        PowerUpKind::Peek,
        PowerUpKind::Clone,
    ];

    pub fn cost(self, costs: &PowerUpCosts) -> u32 {
        match self {
            PowerUpKind::Swap => costs.swap,
            PowerUpKind::Remove => costs.remove,
            PowerUpKind::Block => costs.block,
            PowerUpKind::Peek => costs.peek,
            PowerUpKind::Clone => costs.clone,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PowerUpKind::Swap => "Exchange any two pieces on any board.",
            PowerUpKind::Remove => "Delete one opponent piece.",
            PowerUpKind::Block => "Freeze a space for a few turns.",
            PowerUpKind::Peek => "See the AI's next intended move.",
            PowerUpKind::Clone => "Copy your last move to another space.",
        }
    }

    /// Number of cells the player has to pick
    pub fn targets(self) -> usize {
        match self {
            PowerUpKind::Swap => 2,
            PowerUpKind::Peek => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A power-up with its targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUp {
    Swap(GlobalPos, GlobalPos),
    Remove(GlobalPos),
    Block(GlobalPos),
    Peek,
    Clone(GlobalPos),
}

impl PowerUp {
    pub fn kind(&self) -> PowerUpKind {
        match self {
            PowerUp::Swap(..) => PowerUpKind::Swap,
            PowerUp::Remove(_) => PowerUpKind::Remove,
            PowerUp::Block(_) => PowerUpKind::Block,
            PowerUp::Peek => PowerUpKind::Peek,
            PowerUp::Clone(_) => PowerUpKind::Clone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpEffect {
    /// Board changed; carries the points any resulting win paid
    Applied { points: u32 },
    /// Cell the computer would play next
    Peeked(GlobalPos),
}

impl GameState {
    /// Buy and apply a power-up for the side to move.
    ///
    /// `engine` answers [`PowerUp::Peek`] and is untouched otherwise.
    pub fn use_power_up(&mut self, power: PowerUp, engine: &mut AIEngine) -> Result<PowerUpEffect> {
        if self.is_over() {
            return Err(reject("game is over"));
        }
        if !self.is_human_turn() {
            return Err(reject("waiting for the computer to move"));
        }
        let kind = power.kind();
        let cost = kind.cost(&self.economy.costs);
        if self.wallet < cost {
            return Err(reject(format!(
                "insufficient credits for {kind}: need {cost}, have {}",
                self.wallet
            )));
        }

        let user = self.current;
        let peeked = match power {
            PowerUp::Swap(a, b) => {
                self.swap(a, b)?;
                None
            }
            PowerUp::Remove(pos) => {
                self.remove(pos, user)?;
                None
            }
            PowerUp::Block(pos) => {
                self.check_target(pos)?;
                let mut frozen = self.blocked_cells();
                frozen.insert(pos);
                if self.occupancy.eligible(&frozen).is_empty() {
                    return Err(reject(format!("{pos} is the last free cell")));
                }
                self.blocked.insert(pos, self.economy.block_turns);
                None
            }
            PowerUp::Peek => Some(engine.select_move(
                &self.occupancy,
                &self.blocked_cells(),
                self.difficulty,
            )?),
            PowerUp::Clone(pos) => {
                self.clone_last(pos, user)?;
                None
            }
        };

        self.wallet -= cost;
        let effect = match peeked {
            Some(target) => PowerUpEffect::Peeked(target),
            None if kind == PowerUpKind::Block => PowerUpEffect::Applied { points: 0 },
            None => PowerUpEffect::Applied {
                points: self.rescan(user),
            },
        };
        if peeked.is_none() {
            self.skip_stalled_turns();
        }
        info!(%kind, cost, wallet = self.wallet, ?effect, "power-up used");
        Ok(effect)
    }

    fn swap(&mut self, a: GlobalPos, b: GlobalPos) -> Result<()> {
        if a == b {
            return Err(reject("swap needs two different cells"));
        }
        let (ma, mb) = (self.occupancy.get(a), self.occupancy.get(b));
        if !ma.is_player() || !mb.is_player() {
            return Err(reject("swap needs a piece on both cells"));
        }
        if ma == mb {
            return Err(reject("both pieces belong to the same player"));
        }
        self.occupancy.set(a, mb);
        self.occupancy.set(b, ma);
        Ok(())
    }

    fn remove(&mut self, pos: GlobalPos, user: Mark) -> Result<()> {
        if self.occupancy.get(pos) != user.opponent() {
            return Err(reject(format!("{pos} holds no opponent piece")));
        }
        self.occupancy.set(pos, Mark::Empty);
        Ok(())
    }

    fn clone_last(&mut self, pos: GlobalPos, user: Mark) -> Result<()> {
        if !self.history.iter().any(|mv| mv.player == user) {
            return Err(reject("no previous move to clone"));
        }
        self.check_target(pos)?;
        self.occupancy.set(pos, user);
        Ok(())
    }
}
