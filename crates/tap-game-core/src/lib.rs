//! Tap Game Core Library
//!
//! This crate provides the winner-attestation protocol for the Tap Game:
//! the packed message layout shared by signer and verifier, EIP-191 signing
//! with secp256k1 key recovery, freshness checks, and a once-only settlement
//! ledger for consumers that release funds.

pub mod attestation;
pub mod crypto;
pub mod protocol;
pub mod settlement;

pub use attestation::{
    AttestError, Attestation, Attestor, Clock, ManualClock, SystemClock, VerifyError, Verifier,
};
pub use crypto::{Address, EncodingError, Nonce, SigningIdentity};
pub use protocol::{GameId, WinnerClaim};
pub use settlement::{Settlement, SettlementError, SettlementLedger};
