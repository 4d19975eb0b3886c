//! Validates winner attestations before they are trusted to move funds.

use super::clock::{Clock, SystemClock};
use super::error::VerifyError;
use super::types::Attestation;
use crate::crypto::{decode_prefixed, recover_signer, Address, Nonce};
use crate::protocol::{GameId, WinnerClaim};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default maximum age of an attestation
pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 60;

/// Checks freshness and signer identity of attestations
///
/// Verification proceeds in order: trusted signer configured, freshness,
/// message reconstruction, signer recovery, trust comparison. The cheap
/// timestamp check runs before elliptic-curve recovery.
pub struct Verifier {
    trusted_signer: Option<Address>,
    window_secs: u64,
    max_clock_skew_secs: u64,
    clock: Arc<dyn Clock>,
}

impl Verifier {
    /// Create a verifier; `None` makes every verification fail closed
    pub fn new(trusted_signer: Option<Address>) -> Self {
        Self {
            trusted_signer,
            window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
            max_clock_skew_secs: 0,
            clock: Arc::new(SystemClock),
        }
    }

    /// Read time from `clock` instead of the system clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Maximum accepted age in seconds (inclusive)
    pub fn with_window(mut self, window_secs: u64) -> Self {
        self.window_secs = window_secs;
        self
    }

    /// How far in the future a timestamp may lie (inclusive)
    pub fn with_max_clock_skew(mut self, skew_secs: u64) -> Self {
        self.max_clock_skew_secs = skew_secs;
        self
    }

    pub fn trusted_signer(&self) -> Option<Address> {
        self.trusted_signer
    }

    pub fn window_secs(&self) -> u64 {
        self.window_secs
    }

    /// Accept/reject view of [`Verifier::verify`]
    pub fn check(
        &self,
        signature: &[u8],
        game_id: GameId,
        winner: Address,
        timestamp: u64,
        nonce: Nonce,
    ) -> bool {
        let claim = WinnerClaim {
            game_id,
            winner,
            timestamp,
            nonce,
        };
        self.verify(signature, &claim).is_ok()
    }

    /// Accept/reject for hex-encoded inputs as received from a client
    pub fn check_encoded(
        &self,
        signature: &str,
        game_id: u64,
        winner: &str,
        timestamp: u64,
        nonce: &str,
    ) -> bool {
        self.verify_encoded(signature, game_id, winner, timestamp, nonce)
            .is_ok()
    }

    /// Decode hex-encoded inputs and verify them
    pub fn verify_encoded(
        &self,
        signature: &str,
        game_id: u64,
        winner: &str,
        timestamp: u64,
        nonce: &str,
    ) -> Result<Address, VerifyError> {
        let decoded = decode_prefixed("signature", signature).and_then(|signature| {
            Ok((signature, winner.parse::<Address>()?, nonce.parse::<Nonce>()?))
        });

        let (signature, winner, nonce) = match decoded {
            Ok(parts) => parts,
            Err(e) => {
                warn!(game_id, error = %e, "Rejected attestation: malformed field");
                return Err(VerifyError::Encoding(e));
            }
        };

        let claim = WinnerClaim {
            game_id: GameId::new(game_id),
            winner,
            timestamp,
            nonce,
        };
        self.verify(&signature, &claim)
    }

    /// Verify a complete attestation
    pub fn verify_attestation(&self, attestation: &Attestation) -> Result<Address, VerifyError> {
        self.verify(&attestation.signature, &attestation.claim())
    }

    /// Verify `signature` over `claim`, returning the recovered signer
    pub fn verify(&self, signature: &[u8], claim: &WinnerClaim) -> Result<Address, VerifyError> {
        let game_id = claim.game_id;

        let Some(expected) = self.trusted_signer else {
            warn!(%game_id, "Rejected attestation: trusted signer not configured");
            return Err(VerifyError::Configuration);
        };

        if let Err(e) = self.check_freshness(claim.timestamp) {
            if let VerifyError::Stale { age_secs } = e {
                warn!(
                    %game_id,
                    age_secs,
                    window_secs = self.window_secs,
                    "Rejected attestation: outside freshness window"
                );
            }
            return Err(e);
        }

        let recovered = match recover_signer(&claim.signing_hash(), signature) {
            Ok(address) => address,
            Err(e) => {
                warn!(%game_id, error = %e, "Rejected attestation: malformed signature");
                return Err(VerifyError::MalformedSignature(e));
            }
        };

        if recovered != expected {
            warn!(
                %game_id,
                %expected,
                %recovered,
                "Rejected attestation: signer mismatch"
            );
            return Err(VerifyError::SignatureInvalid {
                expected,
                recovered,
            });
        }

        debug!(%game_id, winner = %claim.winner, "Attestation verified");
        Ok(recovered)
    }

    /// Freshness check alone
    ///
    /// Accepts `timestamp` when `now - timestamp <= window` and, for future
    /// timestamps, `timestamp - now <= max_clock_skew`.
    pub fn check_freshness(&self, timestamp: u64) -> Result<(), VerifyError> {
        let now = self.clock.now();
        let fresh = if timestamp <= now {
            now - timestamp <= self.window_secs
        } else {
            timestamp - now <= self.max_clock_skew_secs
        };

        if fresh {
            Ok(())
        } else {
            Err(VerifyError::Stale {
                age_secs: signed_age(now, timestamp),
            })
        }
    }
}

fn signed_age(now: u64, timestamp: u64) -> i64 {
    let age = i128::from(now) - i128::from(timestamp);
    age.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
