//! Bet submission: validate, estimate, broadcast, await confirmation.
//!
//! Each attempt walks `Validating → Estimating → Submitting →
//! AwaitingConfirmation` and ends in exactly one of Confirmed,
//! TimedOutUnknown or an error. A confirmation timeout is NOT a failure: the
//! broadcast is not cancelled and the transaction may still land, so the
//! outcome is surfaced as genuinely unknown and never resubmitted
//! automatically.

use crate::config::ParibetConfig;
use crate::errors::{ClientError, SubmitError, ValidationError};
use crate::game::state::{phase_at, GamePhase};
use crate::game::types::Game;
use crate::ledger::client::{BetInstruction, LedgerClient};
use crate::ledger::derive;
use crate::ledger::memo::{self, BetMemo, MemoPayload};
use crate::money::Money;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Progress stage of a submission attempt, for logs and progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStage {
    Validating,
    Estimating,
    Submitting,
    AwaitingConfirmation,
}

/// Terminal result of a submission attempt that was not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Confirmed {
        signature: String,
    },
    /// The confirmation window elapsed without an answer from the ledger.
    /// Distinct from both success and failure: the caller must show
    /// "unknown, check later", never a failure state.
    TimedOutUnknown {
        signature: String,
    },
}

/// Cost breakdown of one bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostEstimate {
    pub network_fee: Money,
    pub stake: Money,
    pub service_fee: Money,
    /// Account-creation deposit; nonzero only for the bettor's first bet on
    /// the game.
    pub rent: Money,
}

impl CostEstimate {
    pub fn total(&self) -> Money {
        self.network_fee
            .saturating_add(self.stake)
            .saturating_add(self.service_fee)
            .saturating_add(self.rent)
    }
}

/// A bet the caller wants to place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetRequest {
    pub option_id: u8,
    pub stake: Money,
    pub referral: Option<String>,
    pub terms_accepted: bool,
}

/// Validates, prices and broadcasts bets over a [`LedgerClient`].
pub struct BetSubmitter {
    client: Arc<dyn LedgerClient>,
    site: String,
    bettor: Option<String>,
    service_fee: Money,
    bet_account_size: usize,
    max_open_bets: u64,
    confirm_timeout: Duration,
    confirm_poll_interval: Duration,
}

impl BetSubmitter {
    pub fn new(client: Arc<dyn LedgerClient>, config: &ParibetConfig) -> Self {
        Self {
            client,
            site: config.site.clone(),
            bettor: None,
            service_fee: config.service_fee,
            bet_account_size: config.bet_account_size,
            max_open_bets: config.max_open_bets,
            confirm_timeout: Duration::from_millis(config.confirm_timeout_ms),
            confirm_poll_interval: Duration::from_millis(config.confirm_poll_interval_ms),
        }
    }

    /// Attach the connected bettor identity.
    pub fn with_bettor(mut self, bettor: impl Into<String>) -> Self {
        self.bettor = Some(bettor.into());
        self
    }

    /// Check every precondition the on-chain program will also enforce, so a
    /// doomed transaction is never broadcast.
    pub fn validate(
        &self,
        game: &Game,
        request: &BetRequest,
        now: i64,
        open_bets: u64,
    ) -> Result<(), ValidationError> {
        let phase = phase_at(game, now);
        if phase != GamePhase::Open {
            return Err(ValidationError::GameNotOpen { phase });
        }
        if self.bettor.is_none() {
            return Err(ValidationError::MissingIdentity);
        }
        if !request.terms_accepted {
            return Err(ValidationError::TermsNotAccepted);
        }
        if request.stake < game.min_stake {
            return Err(ValidationError::StakeBelowMinimum {
                stake: request.stake,
                min: game.min_stake,
            });
        }
        if !request.stake.is_multiple_of(game.min_step) {
            return Err(ValidationError::StakeNotStepAligned {
                stake: request.stake,
                step: game.min_step,
            });
        }
        if open_bets >= self.max_open_bets {
            return Err(ValidationError::BetLimitReached {
                limit: self.max_open_bets,
            });
        }
        Ok(())
    }

    /// Price the bet and check the balance covers it.
    ///
    /// The independent lookups run concurrently and are joined all-or-nothing:
    /// if any one fails, no partial inputs feed the estimate.
    pub async fn estimate(
        &self,
        bettor: &str,
        instruction: &BetInstruction,
        first_bet: bool,
    ) -> Result<CostEstimate, SubmitError> {
        let (balance, network_fee, rent) = if first_bet {
            futures::try_join!(
                self.client.get_balance(bettor),
                self.client.estimate_fee(instruction),
                self.client.minimum_rent_exemption(self.bet_account_size),
            )
            .map_err(SubmitError::Network)?
        } else {
            let (balance, network_fee) = futures::try_join!(
                self.client.get_balance(bettor),
                self.client.estimate_fee(instruction),
            )
            .map_err(SubmitError::Network)?;
            (balance, network_fee, Money::ZERO)
        };

        let estimate = CostEstimate {
            network_fee,
            stake: instruction.stake,
            service_fee: self.service_fee,
            rent,
        };
        let required = estimate.total();
        if balance < required {
            return Err(SubmitError::InsufficientBalance {
                required,
                available: balance,
                shortfall: required.saturating_sub(balance),
            });
        }
        Ok(estimate)
    }

    /// Run one full submission attempt.
    pub async fn place_bet(
        &self,
        game: &Game,
        request: &BetRequest,
        open_bets: u64,
    ) -> Result<SubmitOutcome, SubmitError> {
        let now = chrono::Utc::now().timestamp();
        info!(game_id = game.id, stage = ?SubmitStage::Validating, "placing bet");
        self.validate(game, request, now, open_bets)?;
        let bettor = self
            .bettor
            .as_deref()
            .ok_or(ValidationError::MissingIdentity)?;

        let instruction = BetInstruction {
            game_id: game.id,
            option_id: request.option_id,
            stake: request.stake,
            referral: request.referral.clone(),
            prev_bet_count: open_bets,
            bet_account: derive::bet_account_address(&self.site, bettor, game.id, open_bets),
        };

        info!(game_id = game.id, stage = ?SubmitStage::Estimating, "pricing bet");
        let estimate = self.estimate(bettor, &instruction, open_bets == 0).await?;

        let memo_text = memo::encode(&MemoPayload::Bet(BetMemo {
            site: self.site.clone(),
            game_id: game.id,
            bet_id: open_bets,
            option_id: request.option_id,
            stake: request.stake,
            referral: request.referral.clone(),
        }))?;

        // Anchor the confirmation check before broadcasting.
        let checkpoint = self
            .client
            .latest_checkpoint()
            .await
            .map_err(SubmitError::Network)?;

        info!(
            game_id = game.id,
            total = %estimate.total(),
            stage = ?SubmitStage::Submitting,
            "broadcasting bet"
        );
        let signature = self
            .client
            .submit_bet(&instruction, &memo_text)
            .await
            .map_err(|err| match err {
                ClientError::Rejected(reason) => SubmitError::Rejected(reason),
                other => SubmitError::Network(other),
            })?;

        info!(%signature, stage = ?SubmitStage::AwaitingConfirmation, "awaiting confirmation");
        Ok(self.await_confirmation(signature, &checkpoint).await)
    }

    /// Poll for confirmation until the hard timeout.
    ///
    /// Poll errors are swallowed and retried: within the window the answer is
    /// simply not known yet, and after it the outcome is reported unknown
    /// either way. The underlying broadcast is never cancelled.
    async fn await_confirmation(&self, signature: String, checkpoint: &str) -> SubmitOutcome {
        let poll = async {
            loop {
                match self.client.confirm(&signature, checkpoint).await {
                    Ok(true) => return,
                    Ok(false) => {}
                    Err(err) => {
                        warn!(%signature, %err, "confirmation poll failed, retrying");
                    }
                }
                tokio::time::sleep(self.confirm_poll_interval).await;
            }
        };
        match tokio::time::timeout(self.confirm_timeout, poll).await {
            Ok(()) => SubmitOutcome::Confirmed { signature },
            Err(_) => {
                warn!(%signature, "confirmation window elapsed, outcome unknown");
                SubmitOutcome::TimedOutUnknown { signature }
            }
        }
    }
}
