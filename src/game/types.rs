//! Core game, option and bet records.
//!
//! Everything here is a cache derived from the ledger: the ledger replay is the
//! sole source of truth and these structures carry no independent authority.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Outcome recorded for a game once it has been settled on the ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    /// Index of the winning option.
    Winner(u8),
    /// Every stake is refundable in full.
    Voided,
}

/// One bettable option of a game. The index is stable and 0-based.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameOption {
    pub index: u8,
    /// Monotonically non-decreasing while the game accepts bets.
    pub total_stake: Money,
    pub total_bets: u64,
}

/// A multi-option pari-mutuel game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Game {
    pub id: u64,
    /// Unix seconds. Betting opens at `open_time` and closes at `close_time`;
    /// `close_time == open_time` means a zero-width window (never open).
    pub open_time: i64,
    pub close_time: i64,
    pub settle_time: i64,
    /// Fee in basis points, 0..=10000.
    pub fee_bps: u16,
    pub min_stake: Money,
    pub min_step: Money,
    pub options: Vec<GameOption>,
    /// Set at most once, only after `close_time`; immutable once any payout
    /// has been claimed.
    pub outcome: Option<GameOutcome>,
    /// Mirrored from the on-ledger game account so a replayed view
    /// round-trips field for field; the betting flow itself does not
    /// consult it.
    pub is_active: bool,
    pub settled_at: Option<i64>,
    /// Claim bookkeeping mirrored from the on-ledger account, like
    /// `is_active`: the program updates these as payouts are cashed.
    pub cashed_at: Option<i64>,
    pub total_bets_claimed: u64,
}

impl Game {
    pub fn option(&self, index: u8) -> Option<&GameOption> {
        self.options.iter().find(|o| o.index == index)
    }

    pub fn is_voided(&self) -> bool {
        matches!(self.outcome, Some(GameOutcome::Voided))
    }
}

/// A bet as recorded on the ledger. Immutable once observed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bet {
    pub game_id: u64,
    /// Per-bettor bet sequence number, carried in the memo.
    pub bet_id: u64,
    pub option_id: u8,
    pub stake: Money,
    pub bettor: String,
    /// Transaction signature of the bet entry.
    pub signature: String,
    pub block_time: i64,
}

/// A bet joined with its settlement status, derived by replaying the ledger.
///
/// `payment` and `pay_signature` are filled exactly once, when a Payment or
/// Refund event referencing the bet id is found; a rescan over the same ledger
/// prefix yields a byte-identical value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MyBet {
    pub bet: Bet,
    pub payment: Option<Money>,
    pub pay_signature: Option<String>,
}

impl MyBet {
    pub fn is_settled(&self) -> bool {
        self.payment.is_some()
    }
}

/// Off-ledger definition document that labels a game's option indices.
///
/// Consumed read-only for display; never trusted for monetary values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameManifest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub options: Vec<OptionManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionManifest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}
