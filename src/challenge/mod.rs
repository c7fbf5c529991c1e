//! Interactive verification challenges requested by the login protocol.
//!
//! The protocol calls back into a [`ChallengeSolver`] whenever it needs human
//! help: a slider captcha to solve, or a device verification with an SMS
//! and/or a web-link branch. The closed set of challenge kinds lives here;
//! [`ChallengeBridge`] maps each kind onto session state transitions.

mod bridge;

pub use bridge::ChallengeBridge;

use crate::broker::HandoffTimeout;
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// Capability set the login protocol drives during interactive verification.
#[async_trait]
pub trait ChallengeSolver: Send + Sync {
    /// Solve a picture captcha, returning the recognized text.
    async fn picture_captcha(&self, image: &[u8]) -> Result<String, ChallengeError>;

    /// Solve a slider captcha hosted at `url`, returning the ticket.
    async fn slider_captcha(&self, url: &str) -> Result<String, ChallengeError>;

    /// Complete a device/account verification through one of the offered
    /// branches, submitting proofs through `transport`.
    async fn device_verification(
        &self,
        offer: DeviceVerification,
        transport: &dyn VerifyTransport,
    ) -> Result<(), ChallengeError>;
}

/// Branches the protocol offers for device/account verification.
#[derive(Clone, Debug, Default)]
pub struct DeviceVerification {
    pub sms: Option<SmsOffer>,
    pub fallback: Option<FallbackOffer>,
}

/// SMS one-time-code branch. The phone number is masked by the upstream and
/// may be absent entirely.
#[derive(Clone, Debug, Default)]
pub struct SmsOffer {
    pub phone_number: Option<String>,
}

/// Web-link branch: the user completes verification in a browser and reports
/// back.
#[derive(Clone, Debug)]
pub struct FallbackOffer {
    pub url: String,
}

/// Opaque external operations the verification flow drives. Failures here
/// surface to the worker as a login failure.
#[async_trait]
pub trait VerifyTransport: Send + Sync {
    /// Ask the upstream to send the SMS one-time code.
    async fn request_sms_code(&self) -> Result<()>;

    /// Submit the user-entered SMS code.
    async fn submit_sms_code(&self, code: &str) -> Result<()>;

    /// Submit the user's proof of completing the web-link verification.
    async fn submit_fallback_ack(&self, ack: &str) -> Result<()>;
}

#[derive(Debug, Error)]
pub enum ChallengeError {
    /// The protocol asked for a challenge kind this flow cannot relay.
    #[error("{0} is not supported by this login flow")]
    Unsupported(&'static str),

    /// A rendezvous timed out; the attempt is abandoned.
    #[error("attempt abandoned: {0}")]
    Abandoned(#[from] HandoffTimeout),

    /// The user declined verification and no other branch is offered.
    #[error("user declined verification and no other branch is offered")]
    Rejected,

    /// An external verification operation failed.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}
