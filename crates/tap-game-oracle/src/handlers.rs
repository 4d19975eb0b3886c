//! HTTP API handlers.
//!
//! Rejection reasons are logged by the core but never returned to callers;
//! responses only say accepted or rejected.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tap_game_core::{Address, AttestError, Attestation, GameId, Settlement, SettlementError};
use tracing::warn;

use crate::state::OracleState;

/// Application error type
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
}

impl AppError {
    pub(crate) fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<AttestError> for AppError {
    fn from(e: AttestError) -> Self {
        match e {
            AttestError::Configuration => {
                AppError::new(StatusCode::SERVICE_UNAVAILABLE, "Signer not configured")
            }
            AttestError::SigningFailed => {
                AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate signature")
            }
        }
    }
}

// ============ Request/Response types ============

#[derive(Serialize, Deserialize)]
pub struct SignerResponse {
    pub address: Address,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttestationRequest {
    pub game_id: u64,
    pub winner_address: String,
    pub validity_secs: Option<u64>,
}

/// Attestation fields as submitted by a client, still hex-encoded
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAttestation {
    pub signature: String,
    pub game_id: u64,
    pub winner_address: String,
    pub timestamp: u64,
    pub nonce: String,
    /// Informational only; freshness is derived from `timestamp`
    pub expiry: Option<u64>,
}

#[derive(Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementStatusResponse {
    pub game_id: GameId,
    pub settled: bool,
    pub settlement: Option<Settlement>,
}

// ============ Handlers ============

pub async fn health() -> &'static str {
    "ok"
}

pub async fn get_signer(
    State(state): State<Arc<OracleState>>,
) -> Result<Json<SignerResponse>, AppError> {
    let address = state.attestor.identity()?;
    Ok(Json(SignerResponse { address }))
}

pub async fn create_attestation(
    State(state): State<Arc<OracleState>>,
    Json(req): Json<CreateAttestationRequest>,
) -> Result<Json<Attestation>, AppError> {
    let winner: Address = req.winner_address.parse().map_err(|e| {
        warn!(game_id = req.game_id, error = %e, "Attestation request with malformed winner");
        AppError::new(StatusCode::BAD_REQUEST, "Invalid winner address")
    })?;

    let validity = req
        .validity_secs
        .unwrap_or_else(|| state.attestor.default_validity_secs());
    let attestation =
        state
            .attestor
            .issue_with_validity(GameId::new(req.game_id), winner, validity)?;

    Ok(Json(attestation))
}

pub async fn verify_attestation(
    State(state): State<Arc<OracleState>>,
    Json(req): Json<SubmittedAttestation>,
) -> Json<VerifyResponse> {
    let valid = state.verifier.check_encoded(
        &req.signature,
        req.game_id,
        &req.winner_address,
        req.timestamp,
        &req.nonce,
    );
    Json(VerifyResponse { valid })
}

pub async fn settle(
    State(state): State<Arc<OracleState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Settlement>, AppError> {
    let rejected = || AppError::new(StatusCode::BAD_REQUEST, "Attestation rejected");

    let attestation: Attestation = serde_json::from_value(body).map_err(|e| {
        warn!(error = %e, "Rejected settlement: malformed attestation");
        rejected()
    })?;

    match state.ledger.settle(&attestation, &state.verifier) {
        Ok(settlement) => Ok(Json(settlement)),
        Err(SettlementError::AlreadySettled(_)) => {
            Err(AppError::new(StatusCode::CONFLICT, "Game already settled"))
        }
        Err(SettlementError::Rejected(_)) => Err(rejected()),
    }
}

pub async fn get_settlement(
    State(state): State<Arc<OracleState>>,
    Path(game_id): Path<GameId>,
) -> Json<SettlementStatusResponse> {
    let settlement = state.ledger.get(game_id);
    Json(SettlementStatusResponse {
        game_id,
        settled: settlement.is_some(),
        settlement,
    })
}
