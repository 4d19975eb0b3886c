//! Attestation error types.

use crate::crypto::{Address, EncodingError, SignatureError};
use thiserror::Error;

/// Errors surfaced by the attestor
///
/// Internal causes are logged where they happen and collapsed to
/// `SigningFailed` so callers never see key material or low-level detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttestError {
    #[error("Signing identity not configured")]
    Configuration,

    #[error("Failed to generate signature")]
    SigningFailed,
}

/// Why an attestation was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("Trusted signer address not configured")]
    Configuration,

    #[error("Malformed attestation field: {0}")]
    Encoding(#[from] EncodingError),

    /// `age_secs` is negative when the timestamp lies in the future
    #[error("Attestation outside freshness window: age {age_secs}s")]
    Stale { age_secs: i64 },

    #[error("Signer mismatch: expected {expected}, recovered {recovered}")]
    SignatureInvalid { expected: Address, recovered: Address },

    #[error("Malformed signature: {0}")]
    MalformedSignature(#[from] SignatureError),
}

impl VerifyError {
    /// Short machine-readable tag for logs
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyError::Configuration => "configuration",
            VerifyError::Encoding(_) => "encoding",
            VerifyError::Stale { .. } => "stale",
            VerifyError::SignatureInvalid { .. } => "signature_invalid",
            VerifyError::MalformedSignature(_) => "malformed_signature",
        }
    }
}
