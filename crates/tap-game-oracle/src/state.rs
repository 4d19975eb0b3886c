//! Oracle state.

use crate::auth::ApiToken;
use crate::config::OracleConfig;
use std::sync::Arc;
use tap_game_core::{Attestor, Clock, SettlementLedger, SystemClock, Verifier};

/// Shared oracle state; immutable apart from the settlement ledger
pub struct OracleState {
    pub attestor: Attestor,
    pub verifier: Verifier,
    pub ledger: SettlementLedger,
    /// Required on the issuance route; `None` disables issuance over HTTP
    pub api_token: Option<ApiToken>,
}

impl OracleState {
    /// Build from configuration using the system clock
    pub fn from_config(config: &OracleConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build from configuration reading time from `clock`
    pub fn with_clock(config: &OracleConfig, clock: Arc<dyn Clock>) -> Self {
        let attestor = Attestor::new(config.signing_identity.clone())
            .with_clock(clock.clone())
            .with_default_validity(config.default_validity_secs);

        let verifier = Verifier::new(config.trusted_signer)
            .with_clock(clock.clone())
            .with_window(config.freshness_window_secs)
            .with_max_clock_skew(config.max_clock_skew_secs);

        Self {
            attestor,
            verifier,
            ledger: SettlementLedger::new().with_clock(clock),
            api_token: config.api_token.clone(),
        }
    }
}
