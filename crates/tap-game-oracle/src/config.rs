//! Process-wide configuration, read once from the environment at startup.

use std::sync::Arc;
use tap_game_core::attestation::{DEFAULT_FRESHNESS_WINDOW_SECS, DEFAULT_VALIDITY_SECS};
use tap_game_core::{Address, EncodingError, SigningIdentity};
use thiserror::Error;

use crate::auth::ApiToken;

pub const SIGNER_PRIVATE_KEY: &str = "SIGNER_PRIVATE_KEY";
pub const SIGNER_ADDRESS: &str = "SIGNER_ADDRESS";
pub const ATTESTATION_WINDOW_SECS: &str = "ATTESTATION_WINDOW_SECS";
pub const ATTESTATION_VALIDITY_SECS: &str = "ATTESTATION_VALIDITY_SECS";
pub const ATTESTATION_MAX_CLOCK_SKEW_SECS: &str = "ATTESTATION_MAX_CLOCK_SKEW_SECS";
pub const ORACLE_API_TOKEN: &str = "ORACLE_API_TOKEN";
pub const PORT: &str = "PORT";

const DEFAULT_PORT: u16 = 3000;

/// Errors from reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is malformed: {source}")]
    Malformed {
        var: &'static str,
        #[source]
        source: EncodingError,
    },

    #[error("{var} must be a non-negative integer")]
    InvalidNumber { var: &'static str },
}

/// Oracle configuration
///
/// A missing signing key, trusted signer or API token is not an error here:
/// issuing then fails with a configuration error and verification fails
/// closed.
#[derive(Debug)]
pub struct OracleConfig {
    pub signing_identity: Option<Arc<SigningIdentity>>,
    pub trusted_signer: Option<Address>,
    pub api_token: Option<ApiToken>,
    pub freshness_window_secs: u64,
    pub default_validity_secs: u64,
    pub max_clock_skew_secs: u64,
    pub port: u16,
}

impl OracleConfig {
    /// Read from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let signing_identity = get(SIGNER_PRIVATE_KEY)
            .map(|key| {
                SigningIdentity::from_hex(&key).map_err(|source| ConfigError::Malformed {
                    var: SIGNER_PRIVATE_KEY,
                    source,
                })
            })
            .transpose()?
            .map(Arc::new);

        let trusted_signer = get(SIGNER_ADDRESS)
            .map(|address| {
                address.parse::<Address>().map_err(|source| ConfigError::Malformed {
                    var: SIGNER_ADDRESS,
                    source,
                })
            })
            .transpose()?;

        let api_token = get(ORACLE_API_TOKEN).map(|token| ApiToken::new(token.trim()));

        let number = |var: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(var) {
                Some(v) => v
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber { var }),
                None => Ok(default),
            }
        };

        let port = match get(PORT) {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var: PORT })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            signing_identity,
            trusted_signer,
            api_token,
            freshness_window_secs: number(ATTESTATION_WINDOW_SECS, DEFAULT_FRESHNESS_WINDOW_SECS)?,
            default_validity_secs: number(ATTESTATION_VALIDITY_SECS, DEFAULT_VALIDITY_SECS)?,
            max_clock_skew_secs: number(ATTESTATION_MAX_CLOCK_SKEW_SECS, 0)?,
            port,
        })
    }
}
