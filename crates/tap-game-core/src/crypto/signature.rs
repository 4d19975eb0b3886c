//! Recoverable ECDSA signatures in `r || s || v` layout.

use super::Address;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId, Signature};
use secp256k1::{Message, SECP256K1};
use thiserror::Error;

/// Length of an encoded signature: 32-byte r, 32-byte s, 1-byte v
pub const SIGNATURE_LEN: usize = 65;

/// Offset added to the recovery id in the `v` byte
const V_OFFSET: u8 = 27;

/// Structural problems that prevent signer recovery
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Invalid signature length: expected 65 bytes, got {0}")]
    InvalidLength(usize),

    #[error("Invalid recovery byte: {0}")]
    InvalidRecoveryId(u8),

    #[error("Non-canonical signature: s is in the upper half of the curve order")]
    HighS,

    #[error("Invalid signature encoding")]
    InvalidEncoding,

    #[error("Public key recovery failed")]
    RecoveryFailed,
}

pub(crate) fn encode_recoverable(signature: &RecoverableSignature) -> [u8; SIGNATURE_LEN] {
    let (recovery_id, compact) = signature.serialize_compact();
    let mut out = [0u8; SIGNATURE_LEN];
    out[..64].copy_from_slice(&compact);
    // recovery ids produced by signing are always 0 or 1
    out[64] = V_OFFSET + recovery_id.to_i32() as u8;
    out
}

/// Recover the address that signed `digest`
///
/// Accepts `v` as 27/28 or as a raw 0/1 recovery id. Signatures with a high
/// `s` value are rejected so that each signed digest has one valid encoding.
pub fn recover_signer(digest: &[u8; 32], signature: &[u8]) -> Result<Address, SignatureError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(SignatureError::InvalidLength(signature.len()));
    }

    let v = signature[64];
    let recovery_id = match v {
        0 | 1 => v,
        27 | 28 => v - V_OFFSET,
        other => return Err(SignatureError::InvalidRecoveryId(other)),
    };
    let recovery_id = RecoveryId::from_i32(i32::from(recovery_id))
        .map_err(|_| SignatureError::InvalidRecoveryId(v))?;

    let standard =
        Signature::from_compact(&signature[..64]).map_err(|_| SignatureError::InvalidEncoding)?;
    let mut normalized = standard;
    normalized.normalize_s();
    if normalized != standard {
        return Err(SignatureError::HighS);
    }

    let recoverable = RecoverableSignature::from_compact(&signature[..64], recovery_id)
        .map_err(|_| SignatureError::InvalidEncoding)?;
    let public_key = SECP256K1
        .recover_ecdsa(&Message::from_digest(*digest), &recoverable)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(Address::from_public_key(&public_key))
}
