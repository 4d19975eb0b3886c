//! keccak-256 and the EIP-191 personal-message hash.

use sha3::{Digest, Keccak256};

/// Prefix of the EIP-191 version 0x45 ("personal_sign") envelope
const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// keccak-256 of arbitrary bytes
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
    Keccak256::digest(data.as_ref()).into()
}

/// keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)
///
/// The length is rendered as a decimal ASCII string. Attestations always
/// wrap a 32-byte message hash, so the envelope reads `...:\n32`.
pub fn personal_message_hash(message: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX);
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}
