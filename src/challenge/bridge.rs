//! Maps protocol challenge callbacks onto session state transitions.

use super::{ChallengeError, ChallengeSolver, DeviceVerification, VerifyTransport};
use crate::broker::{BrokerConfig, Phase, Session};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Bridges one worker's challenge callbacks to its session.
///
/// Each callback records the challenge payload, advances the phase, wakes the
/// caller side through the response channel, and parks the worker on the
/// request channel until the caller supplies an answer. The zero-capacity
/// channels keep the two sides in lockstep: one challenge round in flight,
/// ever.
pub struct ChallengeBridge {
    session: Arc<Session>,
    config: BrokerConfig,
}

impl ChallengeBridge {
    #[must_use]
    pub fn new(session: Arc<Session>, config: BrokerConfig) -> Self {
        Self { session, config }
    }

    /// Publish `phase` to the caller side and wait for its answer.
    async fn round(&self, phase: Phase) -> Result<String, ChallengeError> {
        self.session.set_phase(phase);
        self.session
            .send_response(self.config.handoff_timeout())
            .await?;
        let answer = self
            .session
            .await_request(self.config.answer_timeout())
            .await?;
        Ok(answer)
    }
}

#[async_trait]
impl ChallengeSolver for ChallengeBridge {
    async fn picture_captcha(&self, _image: &[u8]) -> Result<String, ChallengeError> {
        // Only slider and device verification can be relayed to a human
        // through this flow.
        Err(ChallengeError::Unsupported("picture captcha"))
    }

    async fn slider_captcha(&self, url: &str) -> Result<String, ChallengeError> {
        info!(url, "slider captcha requested");
        self.session.set_slide_url(url);
        self.round(Phase::NeedSlideCode).await
    }

    async fn device_verification(
        &self,
        offer: DeviceVerification,
        transport: &dyn VerifyTransport,
    ) -> Result<(), ChallengeError> {
        if let Some(sms) = &offer.sms {
            if let Some(phone_number) = &sms.phone_number {
                self.session.set_phone_number(phone_number.clone());
            }
            let consent = self.round(Phase::NeedSendPhoneCode).await?;
            if consent.eq_ignore_ascii_case("yes") {
                transport.request_sms_code().await?;
                let code = self.round(Phase::NeedPhoneCode).await?;
                transport.submit_sms_code(&code).await?;
                return Ok(());
            }
            debug!("sms verification declined");
            if offer.fallback.is_none() {
                return Err(ChallengeError::Rejected);
            }
        }

        if let Some(fallback) = &offer.fallback {
            self.session.set_verify_url(fallback.url.clone());
            let ack = self.round(Phase::NeedJumpVerify).await?;
            transport.submit_fallback_ack(&ack).await?;
            return Ok(());
        }

        // The upstream offered no branch this flow can relay.
        Err(ChallengeError::Rejected)
    }
}
