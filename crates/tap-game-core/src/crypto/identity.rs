//! Long-lived signing identity of the attestor.

use super::signature::encode_recoverable;
use super::{decode_fixed, Address, EncodingError, SIGNATURE_LEN};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};
use std::fmt;

/// secp256k1 key pair used to sign winner attestations
///
/// Loaded once at process start and never mutated. The secret half is not
/// serializable and is redacted from `Debug` output.
pub struct SigningIdentity {
    secret_key: SecretKey,
    address: Address,
}

impl SigningIdentity {
    /// Wrap an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key = PublicKey::from_secret_key(SECP256K1, &secret_key);
        Self {
            secret_key,
            address: Address::from_public_key(&public_key),
        }
    }

    /// Parse a hex-encoded 32-byte scalar, with or without `0x`
    ///
    /// Errors never include the input text.
    pub fn from_hex(s: &str) -> Result<Self, EncodingError> {
        let bytes = decode_fixed::<32>("secret key", s)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| EncodingError::InvalidSecretKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Generate a fresh random identity
    pub fn random() -> Self {
        Self::from_secret_key(SecretKey::new(&mut rand::thread_rng()))
    }

    /// Address controlled by this identity
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a 32-byte digest, returning `r || s || v` with `v` in {27, 28}
    pub fn sign_digest(&self, digest: &[u8; 32]) -> [u8; SIGNATURE_LEN] {
        let message = Message::from_digest(*digest);
        let signature = SECP256K1.sign_ecdsa_recoverable(&message, &self.secret_key);
        encode_recoverable(&signature)
    }
}

impl Drop for SigningIdentity {
    fn drop(&mut self) {
        self.secret_key.non_secure_erase();
    }
}

impl fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
