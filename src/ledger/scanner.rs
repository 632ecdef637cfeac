//! Backward pagination over a bettor's transaction history.
//!
//! The scanner walks fixed-size pages from newest to oldest, classifies memo
//! payloads for one game, and stops as soon as an entry predates the game's
//! open time. Pagination is strictly sequential: each page depends on the
//! previous page's oldest signature, and the early-termination rule relies on
//! the ledger being time-ordered per address.

use crate::errors::{ClientError, ScanError};
use crate::ledger::client::{LedgerClient, SignatureInfo};
use crate::ledger::memo::{self, MemoPayload};
use std::sync::Arc;
use tracing::{debug, warn};

/// One ledger entry that belongs to the scanned game, in scan order
/// (newest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEvent {
    pub payload: MemoPayload,
    pub signature: String,
    pub block_time: i64,
}

/// Paginating scanner for one site over a shared [`LedgerClient`].
pub struct LedgerScanner {
    client: Arc<dyn LedgerClient>,
    site: String,
    page_size: usize,
    max_page_attempts: u32,
}

impl LedgerScanner {
    pub fn new(
        client: Arc<dyn LedgerClient>,
        site: impl Into<String>,
        page_size: usize,
        max_page_attempts: u32,
    ) -> Self {
        Self {
            client,
            site: site.into(),
            page_size: page_size.max(1),
            max_page_attempts: max_page_attempts.max(1),
        }
    }

    /// Collect every Bet/Payment/Refund entry of `bettor` for `game_id`,
    /// newest first.
    ///
    /// Entries that are failed, memo-less, foreign to the game, or malformed
    /// are skipped without aborting the scan. A page fetch that keeps failing
    /// past the attempt bound surfaces as [`ScanError::Incomplete`] instead of
    /// a silently-partial result.
    pub async fn scan(
        &self,
        bettor: &str,
        game_id: u64,
        open_time: i64,
    ) -> Result<Vec<LedgerEvent>, ScanError> {
        let mut events = Vec::new();
        let mut before: Option<String> = None;

        loop {
            let page = self.fetch_page(bettor, before.as_deref()).await?;
            let page_len = page.len();
            debug!(game_id, page_len, before = ?before, "scanning history page");

            let mut reached_open_time = false;
            for entry in &page {
                // Entries still missing a block time cannot be ordered against
                // the open-time cutoff; they carry no settled memo yet.
                let Some(block_time) = entry.block_time else {
                    continue;
                };
                if block_time < open_time {
                    // Nothing older can belong to this game; ignore the rest
                    // of the page too.
                    reached_open_time = true;
                    break;
                }
                if entry.failed {
                    continue;
                }
                let Some(memo_text) = entry.memo.as_deref() else {
                    continue;
                };
                if !memo::matches_game(memo_text, &self.site, game_id) {
                    continue;
                }
                match memo::decode(memo_text) {
                    Ok(MemoPayload::Unknown) => {
                        warn!(signature = %entry.signature, "unknown memo type, skipping");
                    }
                    Ok(payload) => events.push(LedgerEvent {
                        payload,
                        signature: entry.signature.clone(),
                        block_time,
                    }),
                    Err(err) => {
                        warn!(signature = %entry.signature, %err, "malformed memo, skipping");
                    }
                }
            }

            if reached_open_time || page_len < self.page_size {
                break;
            }
            before = page.last().map(|entry| entry.signature.clone());
        }

        Ok(events)
    }

    /// Fetch one page, retrying the same cursor up to the attempt bound.
    async fn fetch_page(
        &self,
        address: &str,
        before: Option<&str>,
    ) -> Result<Vec<SignatureInfo>, ScanError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .client
                .signatures_for_address(address, before, self.page_size)
                .await
            {
                Ok(page) => return Ok(page),
                Err(err @ ClientError::Network(_)) if attempt < self.max_page_attempts => {
                    warn!(attempt, max = self.max_page_attempts, %err, "page fetch failed, retrying");
                }
                Err(err) => {
                    return Err(ScanError::Incomplete {
                        attempts: attempt,
                        source: err,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClientError;
    use crate::ledger::client::BetInstruction;
    use crate::ledger::memo::{BetMemo, SettlementMemo};
    use crate::money::Money;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    const SITE: &str = "derby";
    const GAME: u64 = 42;
    const OPEN_TIME: i64 = 1_000;

    struct MockLedger {
        /// Pages returned in order; a `None` slot injects a network failure.
        pages: Mutex<Vec<Option<Vec<SignatureInfo>>>>,
        calls: AtomicU32,
    }

    impl MockLedger {
        fn new(pages: Vec<Option<Vec<SignatureInfo>>>) -> Self {
            Self {
                pages: Mutex::new(pages),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl LedgerClient for MockLedger {
        async fn signatures_for_address(
            &self,
            _address: &str,
            _before: Option<&str>,
            _limit: usize,
        ) -> Result<Vec<SignatureInfo>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                return Ok(vec![]);
            }
            match pages.remove(0) {
                Some(page) => Ok(page),
                None => Err(ClientError::Network("connection reset".to_string())),
            }
        }

        async fn get_balance(&self, _address: &str) -> Result<Money, ClientError> {
            Ok(Money::ZERO)
        }

        async fn minimum_rent_exemption(&self, _size: usize) -> Result<Money, ClientError> {
            Ok(Money::ZERO)
        }

        async fn estimate_fee(&self, _ix: &BetInstruction) -> Result<Money, ClientError> {
            Ok(Money::ZERO)
        }

        async fn latest_checkpoint(&self) -> Result<String, ClientError> {
            Ok("checkpoint".to_string())
        }

        async fn submit_bet(
            &self,
            _ix: &BetInstruction,
            _memo: &str,
        ) -> Result<String, ClientError> {
            Err(ClientError::Network("not a submission mock".to_string()))
        }

        async fn confirm(&self, _sig: &str, _cp: &str) -> Result<bool, ClientError> {
            Ok(false)
        }
    }

    fn bet_entry(signature: &str, bet_id: u64, block_time: i64) -> SignatureInfo {
        let memo = memo::encode(&MemoPayload::Bet(BetMemo {
            site: SITE.to_string(),
            game_id: GAME,
            bet_id,
            option_id: 0,
            stake: Money::from_units(7),
            referral: None,
        }))
        .unwrap();
        SignatureInfo {
            signature: signature.to_string(),
            memo: Some(memo),
            block_time: Some(block_time),
            failed: false,
        }
    }

    fn payment_entry(signature: &str, bet_ids: &[u64], block_time: i64) -> SignatureInfo {
        let memo = memo::encode(&MemoPayload::Payment(SettlementMemo {
            site: SITE.to_string(),
            game_id: GAME,
            bets: bet_ids.iter().map(|id| (*id, Money::from_units(9))).collect(),
        }))
        .unwrap();
        SignatureInfo {
            signature: signature.to_string(),
            memo: Some(memo),
            block_time: Some(block_time),
            failed: false,
        }
    }

    fn scanner(client: MockLedger) -> (LedgerScanner, Arc<MockLedger>) {
        let client = Arc::new(client);
        (
            LedgerScanner::new(client.clone(), SITE, 4, 3),
            client,
        )
    }

    #[tokio::test]
    async fn test_scan_classifies_and_skips() {
        let noise_memo = memo::encode(&MemoPayload::Bet(BetMemo {
            site: SITE.to_string(),
            game_id: 99, // other game
            bet_id: 1,
            option_id: 0,
            stake: Money::from_units(5),
            referral: None,
        }))
        .unwrap();
        let page = vec![
            payment_entry("pay-1", &[0], 2_000),
            SignatureInfo {
                signature: "noise-1".to_string(),
                memo: Some(noise_memo),
                block_time: Some(1_900),
                failed: false,
            },
            SignatureInfo {
                signature: "failed-1".to_string(),
                memo: Some("paribet:{}".to_string()),
                block_time: Some(1_800),
                failed: true,
            },
            SignatureInfo {
                signature: "plain-1".to_string(),
                memo: None,
                block_time: Some(1_700),
                failed: false,
            },
            SignatureInfo {
                signature: "malformed-1".to_string(),
                memo: Some(format!(
                    "paribet:{{\"type\":\"Bet\",\"site\":\"{}\",\"game_id\":{}}}",
                    SITE, GAME
                )),
                block_time: Some(1_600),
                failed: false,
            },
            bet_entry("bet-0", 0, 1_500),
        ];
        let (scanner, _) = scanner(MockLedger::new(vec![Some(page)]));

        let events = scanner.scan("alice", GAME, OPEN_TIME).await.unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0].payload, MemoPayload::Payment(_)));
        assert!(matches!(events[1].payload, MemoPayload::Bet(_)));
        assert_eq!(events[1].signature, "bet-0");
    }

    #[tokio::test]
    async fn test_scan_stops_at_open_time_mid_page() {
        // Full page whose third entry predates open_time: the scan must stop
        // there and never request another page.
        let page = vec![
            bet_entry("bet-2", 2, 2_000),
            bet_entry("bet-1", 1, 1_500),
            SignatureInfo {
                signature: "ancient".to_string(),
                memo: Some("unrelated".to_string()),
                block_time: Some(OPEN_TIME - 1),
                failed: false,
            },
            bet_entry("bet-ghost", 9, OPEN_TIME - 50),
        ];
        let (scanner, client) = scanner(MockLedger::new(vec![Some(page)]));

        let events = scanner.scan("alice", GAME, OPEN_TIME).await.unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.signature != "bet-ghost"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_scan_follows_cursor_until_short_page() {
        let page1 = vec![
            bet_entry("bet-3", 3, 4_000),
            bet_entry("bet-2", 2, 3_500),
            bet_entry("bet-1", 1, 3_000),
            bet_entry("bet-0", 0, 2_500),
        ];
        let page2 = vec![payment_entry("pay-0", &[0], 2_000)];
        let (scanner, client) = scanner(MockLedger::new(vec![Some(page1), Some(page2)]));

        let events = scanner.scan("alice", GAME, OPEN_TIME).await.unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_page_failure_is_retried_then_succeeds() {
        let page = vec![bet_entry("bet-0", 0, 2_000)];
        let (scanner, client) = scanner(MockLedger::new(vec![None, None, Some(page)]));

        let events = scanner.scan("alice", GAME, OPEN_TIME).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted_surface_scan_incomplete() {
        let (scanner, client) = scanner(MockLedger::new(vec![None, None, None, None]));

        let err = scanner.scan("alice", GAME, OPEN_TIME).await.unwrap_err();
        let ScanError::Incomplete { attempts, .. } = err;
        assert_eq!(attempts, 3);
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_history() {
        let (scanner, _) = scanner(MockLedger::new(vec![Some(vec![])]));
        let events = scanner.scan("alice", GAME, OPEN_TIME).await.unwrap();
        assert!(events.is_empty());
    }
}
