//! Issues signed winner attestations.

use super::clock::{Clock, SystemClock};
use super::error::AttestError;
use super::types::Attestation;
use crate::crypto::{recover_signer, Address, Nonce, SigningIdentity};
use crate::protocol::{GameId, WinnerClaim};
use std::sync::Arc;
use tracing::{error, info};

/// Default validity window of an issued attestation
pub const DEFAULT_VALIDITY_SECS: u64 = 60;

/// Signs winner claims with the process-wide signing identity
pub struct Attestor {
    identity: Option<Arc<SigningIdentity>>,
    clock: Arc<dyn Clock>,
    default_validity_secs: u64,
}

impl Attestor {
    /// Create an attestor; `None` makes every `issue` fail with a configuration error
    pub fn new(identity: Option<Arc<SigningIdentity>>) -> Self {
        Self {
            identity,
            clock: Arc::new(SystemClock),
            default_validity_secs: DEFAULT_VALIDITY_SECS,
        }
    }

    /// Read time from `clock` instead of the system clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validity used by [`Attestor::issue`]
    pub fn with_default_validity(mut self, validity_secs: u64) -> Self {
        self.default_validity_secs = validity_secs;
        self
    }

    pub fn default_validity_secs(&self) -> u64 {
        self.default_validity_secs
    }

    /// Address of the configured signing key
    pub fn identity(&self) -> Result<Address, AttestError> {
        self.identity
            .as_ref()
            .map(|identity| identity.address())
            .ok_or(AttestError::Configuration)
    }

    /// Issue an attestation valid for the default window
    pub fn issue(&self, game_id: GameId, winner: Address) -> Result<Attestation, AttestError> {
        self.issue_with_validity(game_id, winner, self.default_validity_secs)
    }

    /// Issue an attestation valid for `validity_secs`
    pub fn issue_with_validity(
        &self,
        game_id: GameId,
        winner: Address,
        validity_secs: u64,
    ) -> Result<Attestation, AttestError> {
        let identity = self.identity.as_ref().ok_or_else(|| {
            error!(%game_id, "Attestation requested but no signing key is configured");
            AttestError::Configuration
        })?;

        let timestamp = self.clock.now();
        let expiry = timestamp.checked_add(validity_secs).ok_or_else(|| {
            error!(%game_id, timestamp, validity_secs, "Attestation expiry overflows");
            AttestError::SigningFailed
        })?;

        let claim = WinnerClaim {
            game_id,
            winner,
            timestamp,
            nonce: Nonce::random(),
        };
        let digest = claim.signing_hash();
        let signature = identity.sign_digest(&digest);

        // Never hand out a signature the verifier would reject
        match recover_signer(&digest, &signature) {
            Ok(recovered) if recovered == identity.address() => {}
            Ok(recovered) => {
                error!(%game_id, %recovered, "Fresh signature recovered to a foreign address");
                return Err(AttestError::SigningFailed);
            }
            Err(e) => {
                error!(%game_id, error = %e, "Fresh signature failed recovery");
                return Err(AttestError::SigningFailed);
            }
        }

        info!(
            %game_id,
            %winner,
            timestamp,
            expiry,
            nonce = %claim.nonce,
            "Issued winner attestation"
        );

        Ok(Attestation {
            signature: signature.to_vec(),
            game_id,
            winner_address: winner,
            timestamp,
            nonce: claim.nonce,
            expiry,
        })
    }
}
