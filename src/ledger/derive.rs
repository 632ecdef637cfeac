//! Deterministic account address derivation.
//!
//! Bet records live at addresses derived from known inputs, so the client can
//! locate them without an external index.

use sha2::{Digest, Sha256};

/// Address of the account holding a bettor's `bet_seq`-th bet on a game.
pub fn bet_account_address(site: &str, bettor: &str, game_id: u64, bet_seq: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(site.as_bytes());
    hasher.update(b"/bet/");
    hasher.update(bettor.as_bytes());
    hasher.update(game_id.to_be_bytes());
    hasher.update(bet_seq.to_be_bytes());
    hex::encode(hasher.finalize())
}
