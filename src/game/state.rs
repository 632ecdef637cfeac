//! Game lifecycle state machine.
//!
//! The phase is a pure function of the game's timestamps and settlement flags
//! plus the caller's `now` snapshot. It is re-evaluated on every read and never
//! persisted.

use crate::game::types::Game;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a game: `Pending → Open → Closed → {Settled | Voided}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Pending,
    Open,
    Closed,
    Settled,
    Voided,
}

impl GamePhase {
    /// Bets are accepted only while Open.
    pub fn accepts_bets(self) -> bool {
        self == GamePhase::Open
    }
}

/// Derive the phase at a given instant. Total over all inputs.
///
/// A zero-width window (`close_time == open_time`) is immediately Closed,
/// never Open.
pub fn phase_at(game: &Game, now: i64) -> GamePhase {
    if game.settled_at.is_some() {
        if game.is_voided() {
            return GamePhase::Voided;
        }
        return GamePhase::Settled;
    }
    if now < game.open_time {
        GamePhase::Pending
    } else if now < game.close_time {
        GamePhase::Open
    } else {
        GamePhase::Closed
    }
}

impl Game {
    pub fn phase(&self, now: i64) -> GamePhase {
        phase_at(self, now)
    }

    /// Phase against the wall clock. Core logic should prefer an explicit
    /// `now` snapshot via [`phase_at`].
    pub fn phase_now(&self) -> GamePhase {
        phase_at(self, chrono::Utc::now().timestamp())
    }
}
