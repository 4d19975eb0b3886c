//! Once-only settlement of verified attestations.
//!
//! Attestations stay valid for their whole freshness window and carry no
//! replay protection of their own. Whatever releases funds must remember
//! which games were already paid out; this ledger is the off-chain mirror
//! of that rule.

use crate::attestation::{Attestation, Clock, SystemClock, VerifyError, Verifier};
use crate::crypto::{Address, Nonce};
use crate::protocol::GameId;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

/// Errors from settling an attestation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("Attestation rejected")]
    Rejected(#[source] VerifyError),

    #[error("Game {0} already settled")]
    AlreadySettled(GameId),
}

/// Record of a settled game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub game_id: GameId,
    pub winner_address: Address,
    pub nonce: Nonce,
    pub settled_at: u64,
}

/// In-memory set of settled games
pub struct SettlementLedger {
    settled: Mutex<HashMap<GameId, Settlement>>,
    clock: Arc<dyn Clock>,
}

impl SettlementLedger {
    pub fn new() -> Self {
        Self {
            settled: Mutex::new(HashMap::new()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Read time from `clock` instead of the system clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Verify `attestation` and mark its game settled
    ///
    /// Fails with `AlreadySettled` for a game that was settled before, even
    /// when a different, valid attestation for it is presented.
    pub fn settle(
        &self,
        attestation: &Attestation,
        verifier: &Verifier,
    ) -> Result<Settlement, SettlementError> {
        let game_id = attestation.game_id;
        verifier
            .verify_attestation(attestation)
            .map_err(SettlementError::Rejected)?;

        let mut settled = self.settled.lock().unwrap_or_else(PoisonError::into_inner);
        match settled.entry(game_id) {
            Entry::Occupied(existing) => {
                warn!(
                    %game_id,
                    settled_winner = %existing.get().winner_address,
                    presented_winner = %attestation.winner_address,
                    "Rejected settlement: game already settled"
                );
                Err(SettlementError::AlreadySettled(game_id))
            }
            Entry::Vacant(slot) => {
                let settlement = Settlement {
                    game_id,
                    winner_address: attestation.winner_address,
                    nonce: attestation.nonce,
                    settled_at: self.clock.now(),
                };
                slot.insert(settlement.clone());
                info!(%game_id, winner = %settlement.winner_address, "Game settled");
                Ok(settlement)
            }
        }
    }

    pub fn is_settled(&self, game_id: GameId) -> bool {
        self.get(game_id).is_some()
    }

    pub fn get(&self, game_id: GameId) -> Option<Settlement> {
        self.settled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&game_id)
            .cloned()
    }
}

impl Default for SettlementLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::{Attestor, ManualClock};
    use crate::crypto::SigningIdentity;

    fn setup() -> (ManualClock, Attestor, Verifier, SettlementLedger) {
        let clock = ManualClock::new(1000);
        let identity = Arc::new(SigningIdentity::random());
        let verifier =
            Verifier::new(Some(identity.address())).with_clock(Arc::new(clock.clone()));
        let attestor = Attestor::new(Some(identity)).with_clock(Arc::new(clock.clone()));
        let ledger = SettlementLedger::new().with_clock(Arc::new(clock.clone()));
        (clock, attestor, verifier, ledger)
    }

    #[test]
    fn test_settle_once() {
        let (_, attestor, verifier, ledger) = setup();
        let winner = Address::from_bytes([0xab; 20]);
        let attestation = attestor.issue(GameId::new(7), winner).unwrap();

        let settlement = ledger.settle(&attestation, &verifier).unwrap();
        assert_eq!(settlement.game_id, GameId::new(7));
        assert_eq!(settlement.winner_address, winner);
        assert_eq!(settlement.settled_at, 1000);
        assert!(ledger.is_settled(GameId::new(7)));

        assert_eq!(
            ledger.settle(&attestation, &verifier),
            Err(SettlementError::AlreadySettled(GameId::new(7)))
        );
    }

    #[test]
    fn test_fresh_attestation_cannot_resettle_game() {
        let (clock, attestor, verifier, ledger) = setup();
        let first = attestor
            .issue(GameId::new(7), Address::from_bytes([0xab; 20]))
            .unwrap();
        ledger.settle(&first, &verifier).unwrap();

        clock.advance(5);
        let second = attestor
            .issue(GameId::new(7), Address::from_bytes([0xcd; 20]))
            .unwrap();
        assert_eq!(
            ledger.settle(&second, &verifier),
            Err(SettlementError::AlreadySettled(GameId::new(7)))
        );
        assert_eq!(
            ledger.get(GameId::new(7)).unwrap().winner_address,
            Address::from_bytes([0xab; 20])
        );
    }

    #[test]
    fn test_rejected_attestation_does_not_settle() {
        let (clock, attestor, verifier, ledger) = setup();
        let attestation = attestor
            .issue(GameId::new(9), Address::from_bytes([0xab; 20]))
            .unwrap();

        clock.advance(61);
        assert_eq!(
            ledger.settle(&attestation, &verifier),
            Err(SettlementError::Rejected(VerifyError::Stale { age_secs: 61 }))
        );
        assert!(!ledger.is_settled(GameId::new(9)));
    }

    #[test]
    fn test_games_settle_independently() {
        let (_, attestor, verifier, ledger) = setup();
        let winner = Address::from_bytes([0xab; 20]);

        for id in 1..=3 {
            let attestation = attestor.issue(GameId::new(id), winner).unwrap();
            assert!(ledger.settle(&attestation, &verifier).is_ok());
        }
        assert!(ledger.is_settled(GameId::new(2)));
        assert!(!ledger.is_settled(GameId::new(4)));
    }
}
