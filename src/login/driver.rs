//! Seam to the underlying authentication protocol.

use crate::challenge::ChallengeSolver;
use anyhow::Result;
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;

/// Credential material for one login attempt.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub account_id: String,
    pub password: SecretString,
}

/// Caller-supplied options for a new attempt.
#[derive(Clone, Debug, Default)]
pub struct StartOptions {
    /// Protocol/device profile hint, passed through to the driver untouched.
    pub protocol: Option<String>,
}

/// Everything a driver needs to run one attempt.
#[derive(Debug)]
pub struct LoginContext {
    pub account_id: String,
    pub password: SecretString,
    pub protocol: Option<String>,
    /// Opaque device fingerprint from a previous successful login, if any.
    pub fingerprint: Option<String>,
}

/// The underlying login protocol.
///
/// A driver runs one attempt to completion, calling back into `solver`
/// whenever the upstream demands interactive verification. It must release
/// any network resources it opened before returning, on success and on every
/// error path, so a caller observing the terminal phase can assume cleanup is
/// complete. The returned error is logged as the failure cause and never
/// re-exposed to external callers.
#[async_trait]
pub trait LoginDriver: Send + Sync {
    async fn login(&self, ctx: LoginContext, solver: Arc<dyn ChallengeSolver>) -> Result<()>;
}
