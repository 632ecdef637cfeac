//! Folding scanned ledger events into a per-user bet view.
//!
//! The fold is pure: no shared accumulator survives between calls, so the
//! periodic refresh poll and a push-notification trigger can both re-run it
//! concurrently, and running it twice over the same event list yields
//! byte-identical output.

use crate::game::types::{Bet, MyBet};
use crate::ledger::memo::MemoPayload;
use crate::ledger::scanner::LedgerEvent;
use crate::money::Money;
use std::collections::HashMap;

/// Join Bet events with the Payment/Refund events that settled them.
///
/// Output order matches the scan order (newest first). Bets with no matching
/// settlement are emitted with `payment: None`; a batch settlement contributes
/// one index entry per bet id it names.
pub fn reconstruct(bettor: &str, events: &[LedgerEvent]) -> Vec<MyBet> {
    let mut settlements: HashMap<u64, (Money, &str)> = HashMap::new();
    for event in events {
        let pairs = match &event.payload {
            MemoPayload::Payment(memo) | MemoPayload::Refund(memo) => &memo.bets,
            _ => continue,
        };
        for (bet_id, amount) in pairs {
            // Scan order is newest first; the first settlement seen wins and
            // a bet is never re-settled.
            settlements
                .entry(*bet_id)
                .or_insert((*amount, event.signature.as_str()));
        }
    }

    events
        .iter()
        .filter_map(|event| {
            let MemoPayload::Bet(memo) = &event.payload else {
                return None;
            };
            let settled = settlements.get(&memo.bet_id);
            Some(MyBet {
                bet: Bet {
                    game_id: memo.game_id,
                    bet_id: memo.bet_id,
                    option_id: memo.option_id,
                    stake: memo.stake,
                    bettor: bettor.to_string(),
                    signature: event.signature.clone(),
                    block_time: event.block_time,
                },
                payment: settled.map(|(amount, _)| *amount),
                pay_signature: settled.map(|(_, sig)| sig.to_string()),
            })
        })
        .collect()
}

/// Sum of settlement amounts already recorded on the ledger for this view.
pub fn total_paid(bets: &[MyBet]) -> Money {
    bets.iter().filter_map(|b| b.payment).sum()
}
