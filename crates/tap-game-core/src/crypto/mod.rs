//! Cryptographic primitives for winner attestations.
//!
//! This module provides:
//! - Address (20-byte account identifier with EIP-55 rendering)
//! - Nonce for making otherwise identical claims distinct
//! - keccak-256 and the EIP-191 personal-message wrapper
//! - SigningIdentity and recoverable signature handling

mod address;
mod hash;
mod identity;
mod nonce;
mod signature;

use thiserror::Error;

pub use address::Address;
pub use hash::{keccak256, personal_message_hash};
pub use identity::SigningIdentity;
pub use nonce::{Nonce, NONCE_LEN};
pub use signature::{recover_signer, SignatureError, SIGNATURE_LEN};

/// Errors from decoding hex-encoded values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("Invalid hex encoding for {0}")]
    InvalidHex(&'static str),

    #[error("Invalid length for {what}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid secret key scalar")]
    InvalidSecretKey,
}

/// Decode a hex string with an optional `0x` prefix into a fixed-size array
pub(crate) fn decode_fixed<const N: usize>(
    what: &'static str,
    s: &str,
) -> Result<[u8; N], EncodingError> {
    let bytes = decode_prefixed(what, s)?;
    if bytes.len() != N {
        return Err(EncodingError::InvalidLength {
            what,
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// Decode a hex string with an optional `0x` prefix
pub(crate) fn decode_prefixed(what: &'static str, s: &str) -> Result<Vec<u8>, EncodingError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|_| EncodingError::InvalidHex(what))
}

/// Serde helper for variable-length `0x`-prefixed hex byte strings
pub(crate) mod hex_bytes_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        format!("0x{}", hex::encode(bytes)).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let hex_str = String::deserialize(d)?;
        super::decode_prefixed("bytes", &hex_str).map_err(serde::de::Error::custom)
    }
}
