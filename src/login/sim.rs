//! Scripted login driver for local development and tests.
//!
//! The simulator walks a fixed list of challenge steps through the real
//! bridge instead of talking to an upstream, the same way the service would
//! run against a real protocol driver. External verification operations are
//! logged instead of performed.

use super::driver::{LoginContext, LoginDriver};
use crate::challenge::{
    ChallengeSolver, DeviceVerification, FallbackOffer, SmsOffer, VerifyTransport,
};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// One scripted challenge step.
#[derive(Clone, Debug)]
pub enum SimStep {
    /// Ask for a slider captcha solution.
    Slider { url: String },
    /// Device verification offering the SMS branch, optionally with a
    /// web-link fallback.
    DeviceSms {
        phone_number: Option<String>,
        fallback_url: Option<String>,
    },
    /// Device verification offering only the web-link branch.
    DeviceFallback { url: String },
    /// Fail the attempt as the upstream would.
    Fail { reason: String },
}

/// Driver that walks a fixed challenge script instead of a real protocol.
///
/// The default script mirrors a common first login: one slider captcha
/// followed by device verification with both branches offered.
pub struct SimulatedDriver {
    steps: Vec<SimStep>,
}

impl SimulatedDriver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: vec![
                SimStep::Slider {
                    url: "https://sim.manpremo.dev/slider/1".to_string(),
                },
                SimStep::DeviceSms {
                    phone_number: Some("+1 555 0100".to_string()),
                    fallback_url: Some("https://sim.manpremo.dev/verify/1".to_string()),
                },
            ],
        }
    }

    #[must_use]
    pub fn with_steps(mut self, steps: Vec<SimStep>) -> Self {
        self.steps = steps;
        self
    }
}

impl Default for SimulatedDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs the external verification operations instead of performing them.
struct LogVerifyTransport;

#[async_trait]
impl VerifyTransport for LogVerifyTransport {
    async fn request_sms_code(&self) -> Result<()> {
        info!("sms code requested (simulated)");
        Ok(())
    }

    async fn submit_sms_code(&self, code: &str) -> Result<()> {
        info!(code, "sms code submitted (simulated)");
        Ok(())
    }

    async fn submit_fallback_ack(&self, ack: &str) -> Result<()> {
        info!(ack, "fallback verification submitted (simulated)");
        Ok(())
    }
}

#[async_trait]
impl LoginDriver for SimulatedDriver {
    async fn login(&self, ctx: LoginContext, solver: Arc<dyn ChallengeSolver>) -> Result<()> {
        info!(
            account_id = %ctx.account_id,
            has_fingerprint = ctx.fingerprint.is_some(),
            "simulated login started"
        );
        for step in &self.steps {
            match step {
                SimStep::Slider { url } => {
                    let code = solver.slider_captcha(url).await?;
                    info!(code = %code, "slider code received");
                }
                SimStep::DeviceSms {
                    phone_number,
                    fallback_url,
                } => {
                    let offer = DeviceVerification {
                        sms: Some(SmsOffer {
                            phone_number: phone_number.clone(),
                        }),
                        fallback: fallback_url
                            .clone()
                            .map(|url| FallbackOffer { url }),
                    };
                    solver.device_verification(offer, &LogVerifyTransport).await?;
                }
                SimStep::DeviceFallback { url } => {
                    let offer = DeviceVerification {
                        sms: None,
                        fallback: Some(FallbackOffer { url: url.clone() }),
                    };
                    solver.device_verification(offer, &LogVerifyTransport).await?;
                }
                SimStep::Fail { reason } => bail!("simulated upstream failure: {reason}"),
            }
        }
        Ok(())
    }
}
