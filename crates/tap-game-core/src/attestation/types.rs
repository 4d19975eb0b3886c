//! Attestation wire type.

use crate::crypto::{Address, Nonce};
use crate::protocol::{GameId, WinnerClaim};
use serde::{Deserialize, Serialize};

/// Signed, time-bounded claim that `winner_address` won `game_id`
///
/// JSON shape: `{ signature, gameId, winnerAddress, timestamp, nonce, expiry }`.
/// `expiry` is informational; verifiers re-derive freshness from `timestamp`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attestation {
    #[serde(with = "crate::crypto::hex_bytes_serde")]
    pub signature: Vec<u8>,
    pub game_id: GameId,
    pub winner_address: Address,
    pub timestamp: u64,
    pub nonce: Nonce,
    pub expiry: u64,
}

impl Attestation {
    /// The signed fields, without signature and expiry
    pub fn claim(&self) -> WinnerClaim {
        WinnerClaim {
            game_id: self.game_id,
            winner: self.winner_address,
            timestamp: self.timestamp,
            nonce: self.nonce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::NONCE_LEN;

    fn sample() -> Attestation {
        Attestation {
            signature: vec![0xaa; 65],
            game_id: GameId::new(7),
            winner_address: Address::from_bytes([0xab; 20]),
            timestamp: 1000,
            nonce: Nonce::from_bytes([0x01; NONCE_LEN]),
            expiry: 1060,
        }
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["gameId"], 7);
        assert_eq!(value["timestamp"], 1000);
        assert_eq!(value["expiry"], 1060);
        assert_eq!(
            value["winnerAddress"].as_str().unwrap().to_lowercase(),
            format!("0x{}", "ab".repeat(20))
        );
        assert_eq!(value["nonce"], format!("0x{}", "01".repeat(32)));
        assert_eq!(value["signature"], format!("0x{}", "aa".repeat(65)));
    }

    #[test]
    fn test_deserialize_rejects_short_nonce() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["nonce"] = serde_json::json!(format!("0x{}", "01".repeat(16)));

        assert!(serde_json::from_value::<Attestation>(value).is_err());
    }

    #[test]
    fn test_claim_drops_signature_and_expiry() {
        let attestation = sample();
        let claim = attestation.claim();

        assert_eq!(claim.game_id, attestation.game_id);
        assert_eq!(claim.winner, attestation.winner_address);
        assert_eq!(claim.timestamp, attestation.timestamp);
        assert_eq!(claim.nonce, attestation.nonce);
    }
}
