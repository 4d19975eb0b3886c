//! Tap Game Oracle entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use tap_game_oracle::{create_router, OracleConfig, OracleState};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match OracleConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    match &config.signing_identity {
        Some(identity) => info!("Signer address: {}", identity.address()),
        None => warn!("SIGNER_PRIVATE_KEY not set; attestation requests will fail"),
    }
    if config.api_token.is_none() {
        warn!("ORACLE_API_TOKEN not set; attestation requests will be refused");
    }
    match config.trusted_signer {
        Some(address) => info!("Trusted signer: {}", address),
        None => warn!("SIGNER_ADDRESS not set; every verification will be rejected"),
    }
    if let (Some(identity), Some(trusted)) = (&config.signing_identity, config.trusted_signer) {
        if identity.address() != trusted {
            warn!(
                signer = %identity.address(),
                %trusted,
                "Signing key does not match trusted signer; issued attestations will not verify here"
            );
        }
    }
    info!(
        window_secs = config.freshness_window_secs,
        validity_secs = config.default_validity_secs,
        max_clock_skew_secs = config.max_clock_skew_secs,
        "Attestation timing"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(OracleState::from_config(&config));
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("Oracle service listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
