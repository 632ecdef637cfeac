//! The ledger boundary.
//!
//! Everything the core needs from the outside world goes through the
//! [`LedgerClient`] trait: transaction history pages, balance and cost
//! lookups, bet broadcast and confirmation. Tests substitute mock
//! implementations; a production build wires an RPC-backed one.

use crate::errors::ClientError;
use crate::money::Money;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry of an address's transaction history, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignatureInfo {
    pub signature: String,
    /// Memo text attached to the transaction, if any.
    pub memo: Option<String>,
    /// Unix seconds; absent while the entry is not yet finalized.
    pub block_time: Option<i64>,
    /// The transaction landed but its execution failed.
    pub failed: bool,
}

/// Instruction submitted to the on-chain betting program.
///
/// The program is an opaque counterparty: it either commits the bet or
/// rejects it, and its own validation logic is out of scope here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BetInstruction {
    pub game_id: u64,
    pub option_id: u8,
    pub stake: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral: Option<String>,
    /// Bets this bettor already holds on the game; seeds the derived
    /// bet-account address.
    pub prev_bet_count: u64,
    /// Deterministic account address the bet record will live at.
    pub bet_account: String,
}

/// Async interface to the external ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Page backward through `address`'s history: up to `limit` entries
    /// older than the `before` signature (or the newest entries when `None`).
    async fn signatures_for_address(
        &self,
        address: &str,
        before: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, ClientError>;

    async fn get_balance(&self, address: &str) -> Result<Money, ClientError>;

    /// Deposit required to keep an account of `account_size` bytes alive.
    async fn minimum_rent_exemption(&self, account_size: usize) -> Result<Money, ClientError>;

    async fn estimate_fee(&self, instruction: &BetInstruction) -> Result<Money, ClientError>;

    /// Opaque cursor the confirmation check is anchored to.
    async fn latest_checkpoint(&self) -> Result<String, ClientError>;

    /// Sign and broadcast the bet transaction, carrying `memo` on-ledger.
    /// Returns the transaction signature. A program refusal surfaces as
    /// [`ClientError::Rejected`].
    async fn submit_bet(
        &self,
        instruction: &BetInstruction,
        memo: &str,
    ) -> Result<String, ClientError>;

    /// Whether `signature` is confirmed relative to `checkpoint`.
    /// `Ok(false)` means "not yet", not failure.
    async fn confirm(&self, signature: &str, checkpoint: &str) -> Result<bool, ClientError>;
}
