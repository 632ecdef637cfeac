//! Pari-mutuel payout arithmetic.
//!
//! All intermediate math runs in u128 rationals with a single final floor, so
//! payouts never pass through floating point and the sum over all winning
//! bettors can never exceed the fee-reduced pot.

use crate::game::pot::{total_pot, winner_pool};
use crate::game::types::{Bet, Game, GameOutcome};
use crate::money::Money;

/// Fee denominator: fees are expressed in basis points.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Settlement amount for one bettor under the pari-mutuel formula:
///
/// `floor(my_winning_stake × total_pot × (10000 − fee_bps) / (10000 × winner_pool))`
///
/// A zero winner pool pays 0 for everyone: a degenerate but legal state, not a
/// division fault.
pub fn settlement_amount(
    my_winning_stake: Money,
    total_pot: Money,
    winner_pool: Money,
    fee_bps: u16,
) -> Money {
    if my_winning_stake.units() <= 0 || winner_pool.units() <= 0 || total_pot.units() <= 0 {
        return Money::ZERO;
    }
    let keep_bps = BPS_DENOMINATOR.saturating_sub(fee_bps as u128);
    // floor(gross * keep / denom), split so every intermediate stays within
    // u128 for any i64 inputs: gross and denom are each a product of two
    // i64-range factors, keep <= 10000, and the remainder is below denom.
    let gross = my_winning_stake.units() as u128 * total_pot.units() as u128;
    let denom = BPS_DENOMINATOR * winner_pool.units() as u128;
    let units = (gross / denom) * keep_bps + (gross % denom) * keep_bps / denom;
    Money::from_units(i64::try_from(units).unwrap_or(i64::MAX))
}

/// Stake the bettor holds on the winning side of a decided game.
///
/// Voided games count every stake (all options refund); settled games count
/// only the winning option. Undecided games have no winning side yet.
pub fn winning_stake(game: &Game, bets: &[Bet]) -> Money {
    let in_game = bets.iter().filter(|b| b.game_id == game.id);
    match game.outcome {
        Some(GameOutcome::Voided) => in_game.map(|b| b.stake).sum(),
        Some(GameOutcome::Winner(index)) => in_game
            .filter(|b| b.option_id == index)
            .map(|b| b.stake)
            .sum(),
        None => Money::ZERO,
    }
}

/// What a bettor is owed for their bets on a decided game.
///
/// Voided: the exact sum of their stakes, fee not applied. Settled: the
/// pari-mutuel share of the fee-reduced pot. Undecided: nothing yet.
pub fn payout_for(game: &Game, bets: &[Bet]) -> Money {
    match game.outcome {
        Some(GameOutcome::Voided) => winning_stake(game, bets),
        Some(GameOutcome::Winner(_)) => settlement_amount(
            winning_stake(game, bets),
            total_pot(game),
            winner_pool(game),
            game.fee_bps,
        ),
        None => Money::ZERO,
    }
}
