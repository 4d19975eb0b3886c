//! Winner attestations: issuing, verifying, and the clock both sides read.

mod attestor;
mod clock;
mod error;
mod types;
mod verifier;

pub use attestor::{Attestor, DEFAULT_VALIDITY_SECS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AttestError, VerifyError};
pub use types::Attestation;
pub use verifier::{Verifier, DEFAULT_FRESHNESS_WINDOW_SECS};
