//! Pot aggregation over a game's options.

use crate::game::types::{Game, GameOutcome};
use crate::money::Money;

/// Total pool: sum of every option's stake. An empty option list yields 0.
pub fn total_pot(game: &Game) -> Money {
    game.options.iter().map(|o| o.total_stake).sum()
}

/// Pool that pays out, given the recorded outcome.
///
/// Settled: the winning option's stake. Voided: the whole pot (every stake is
/// its own winner). Undecided games have no winner pool yet and yield 0.
pub fn winner_pool(game: &Game) -> Money {
    match game.outcome {
        Some(GameOutcome::Winner(index)) => game
            .option(index)
            .map(|o| o.total_stake)
            .unwrap_or(Money::ZERO),
        Some(GameOutcome::Voided) => total_pot(game),
        None => Money::ZERO,
    }
}
