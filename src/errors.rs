//! Error taxonomy for the paribet core.
//!
//! Validation failures are always locally recoverable and never retried.
//! Network failures get bounded retries at the call site, then surface as a
//! scan-incomplete or submission error. A confirmation timeout is deliberately
//! NOT in this module: an ambiguous outcome is neither success nor failure and
//! is modelled as [`crate::submit::SubmitOutcome::TimedOutUnknown`].

use crate::game::state::GamePhase;
use crate::money::Money;
use thiserror::Error;

/// Failure of a call across the ledger boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Transient transport failure; eligible for bounded retry.
    #[error("ledger request failed: {0}")]
    Network(String),

    /// The on-chain program refused the instruction. Surfaced verbatim,
    /// never retried.
    #[error("counterparty rejected the instruction: {0}")]
    Rejected(String),
}

/// Precondition failures caught before anything is sent to the ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("game is not open for betting (phase: {phase:?})")]
    GameNotOpen { phase: GamePhase },

    #[error("no bettor identity configured")]
    MissingIdentity,

    #[error("terms of service not accepted")]
    TermsNotAccepted,

    #[error("stake {stake} is below the minimum stake {min}")]
    StakeBelowMinimum { stake: Money, min: Money },

    #[error("stake {stake} is not a multiple of the stake step {step}")]
    StakeNotStepAligned { stake: Money, step: Money },

    #[error("open bet limit of {limit} reached for this game")]
    BetLimitReached { limit: u64 },
}

/// Failures of a bet submission attempt.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Recoverable by topping up; carries the exact shortfall.
    #[error("insufficient balance: need {required}, have {available} (short {shortfall})")]
    InsufficientBalance {
        required: Money,
        available: Money,
        shortfall: Money,
    },

    /// The ledger program refused the bet (e.g. stale pot state).
    #[error("bet rejected by the ledger program: {0}")]
    Rejected(String),

    #[error("network failure during submission: {0}")]
    Network(#[source] ClientError),

    #[error("failed to encode bet memo: {0}")]
    Memo(#[from] crate::ledger::memo::MemoError),
}

/// A ledger scan that could not complete. Never returned for a partial page;
/// the caller gets either the full relevant history or this error.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("ledger scan incomplete: page fetch failed after {attempts} attempts")]
    Incomplete {
        attempts: u32,
        #[source]
        source: ClientError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_balance_reports_shortfall() {
        let err = SubmitError::InsufficientBalance {
            required: Money::from_units(53),
            available: Money::from_units(52),
            shortfall: Money::from_units(1),
        };
        let message = err.to_string();
        assert!(message.contains("short"));
        assert!(message.contains("0.000000001"));
    }

    #[test]
    fn test_validation_error_converts_into_submit_error() {
        let err: SubmitError = ValidationError::TermsNotAccepted.into();
        assert!(matches!(err, SubmitError::Validation(_)));
    }

    #[test]
    fn test_scan_error_carries_source() {
        use std::error::Error as _;
        let err = ScanError::Incomplete {
            attempts: 3,
            source: ClientError::Network("connection reset".to_string()),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("3 attempts"));
    }
}
