//! Paribet — client-side core for pari-mutuel betting over an append-only
//! ledger.
//!
//! The ledger is the sole source of truth. A bettor's history and payouts are
//! reconstructed purely by replaying it: [`ledger::scanner::LedgerScanner`]
//! pages backward through the bettor's transactions and classifies memo
//! payloads, [`ledger::reconstruct::reconstruct`] folds them into a per-user
//! bet view, and [`game`] derives lifecycle phase, pot totals and pari-mutuel
//! payouts from exact integer arithmetic. [`submit::BetSubmitter`] places new
//! bets, with an honest "outcome unknown" answer when confirmation times out.
//!
//! Everything outside the process boundary goes through the
//! [`ledger::client::LedgerClient`] trait.

pub mod config;
pub mod errors;
pub mod game;
pub mod ledger;
pub mod money;
pub mod submit;

pub use config::ParibetConfig;
pub use errors::{ClientError, ScanError, SubmitError, ValidationError};
pub use game::payout::{payout_for, settlement_amount, winning_stake};
pub use game::pot::{total_pot, winner_pool};
pub use game::state::{phase_at, GamePhase};
pub use game::types::{Bet, Game, GameManifest, GameOption, GameOutcome, MyBet};
pub use ledger::client::{BetInstruction, LedgerClient, SignatureInfo};
pub use ledger::memo::{MemoPayload, MEMO_PREFIX};
pub use ledger::reconstruct::{reconstruct, total_paid};
pub use ledger::scanner::{LedgerEvent, LedgerScanner};
pub use money::Money;
pub use submit::{BetRequest, BetSubmitter, CostEstimate, SubmitOutcome, SubmitStage};
