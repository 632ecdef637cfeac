//! Memo wire format: a fixed human-readable prefix followed by a tagged JSON
//! payload.
//!
//! Every memo embeds the site identifier and game id, used as a coarse filter
//! before full structural decode. Unrecognized `type` discriminants decode to
//! [`MemoPayload::Unknown`]; the scanner skips them rather than failing.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Human-readable marker at the front of every paribet memo.
pub const MEMO_PREFIX: &str = "paribet:";

/// A bet placed on a game option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BetMemo {
    pub site: String,
    pub game_id: u64,
    /// Per-bettor bet sequence number on this game.
    pub bet_id: u64,
    pub option_id: u8,
    pub stake: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral: Option<String>,
}

/// A batch cash-out: one transaction settling several bets at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettlementMemo {
    pub site: String,
    pub game_id: u64,
    /// `(bet_id, amount)` pairs, one per settled bet.
    pub bets: Vec<(u64, Money)>,
}

/// Classified memo payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum MemoPayload {
    Bet(BetMemo),
    Payment(SettlementMemo),
    Refund(SettlementMemo),
    /// A structurally valid memo with a discriminant this client does not
    /// know. Skipped, never a crash.
    #[serde(other)]
    Unknown,
}

/// Minimal envelope decoded for the coarse site/game filter.
#[derive(Debug, Deserialize)]
struct MemoEnvelope {
    site: String,
    game_id: u64,
}

/// Errors decoding a memo that claimed to be ours.
#[derive(Debug, Error)]
pub enum MemoError {
    #[error("memo does not start with the '{MEMO_PREFIX}' prefix")]
    MissingPrefix,

    #[error("memo payload is not a valid record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cheap pre-filter: does this memo belong to the given site and game?
///
/// Memos for other games or sites are expected traffic on a shared address,
/// so a mismatch (or an undecodable envelope) is simply `false`.
pub fn matches_game(memo: &str, site: &str, game_id: u64) -> bool {
    let Some(json) = memo.strip_prefix(MEMO_PREFIX) else {
        return false;
    };
    match serde_json::from_str::<MemoEnvelope>(json) {
        Ok(envelope) => envelope.site == site && envelope.game_id == game_id,
        Err(_) => false,
    }
}

/// Full structural decode of a memo into its tagged payload.
pub fn decode(memo: &str) -> Result<MemoPayload, MemoError> {
    let json = memo.strip_prefix(MEMO_PREFIX).ok_or(MemoError::MissingPrefix)?;
    Ok(serde_json::from_str(json)?)
}

/// Encode a payload into the on-ledger memo text.
pub fn encode(payload: &MemoPayload) -> Result<String, MemoError> {
    Ok(format!("{}{}", MEMO_PREFIX, serde_json::to_string(payload)?))
}
