//! Server action: wire the broker and serve the API.

use crate::{
    api,
    broker::{BrokerConfig, SessionRegistry},
    login::{sim::SimulatedDriver, LoginService, MemoryFingerprintStore},
};
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

/// Validated arguments for the server action.
#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub session_ttl_seconds: u64,
    pub sweep_interval_seconds: u64,
    pub start_debounce_seconds: u64,
    pub answer_timeout_seconds: u64,
}

/// Handle the server action.
///
/// The binary wires the simulated driver; embedders using the library supply
/// their own [`crate::login::LoginDriver`] implementation to [`api::serve`].
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn handle(args: Args) -> Result<()> {
    let config = BrokerConfig::new()
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_sweep_interval_seconds(args.sweep_interval_seconds)
        .with_start_debounce_seconds(args.start_debounce_seconds)
        .with_answer_timeout_seconds(args.answer_timeout_seconds)
        .normalize();

    warn!("no protocol backend compiled in; serving the simulated login driver");

    let service = Arc::new(LoginService::new(
        Arc::new(SessionRegistry::new()),
        Arc::new(SimulatedDriver::new()),
        Arc::new(MemoryFingerprintStore::new()),
        config,
    ));

    api::serve(args.port, service).await
}
