//! Request and response payloads for the login endpoints.

use crate::login::LoginReport;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct StartRequest {
    /// Principal identifier (the account being logged in).
    pub account_id: String,
    pub password: String,
    /// Protocol/device profile hint, forwarded to the driver untouched.
    #[serde(default)]
    pub protocol: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnswerRequest {
    pub account_id: String,
    /// Slider code, SMS consent, SMS code or fallback acknowledgment,
    /// depending on the current phase.
    pub answer: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginStateResponse {
    /// Current phase, e.g. `NEED_SLIDE_CODE` or `SUCCESS`.
    pub phase: String,
    pub slide_url: String,
    pub phone_number: String,
    pub verify_url: String,
}

impl From<LoginReport> for LoginStateResponse {
    fn from(report: LoginReport) -> Self {
        Self {
            phase: report.phase.as_str().to_string(),
            slide_url: report.slide_url,
            phone_number: report.phone_number,
            verify_url: report.verify_url,
        }
    }
}
