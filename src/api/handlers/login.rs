//! Login flow endpoints.

use super::types::{AnswerRequest, LoginStateResponse, StartRequest};
use crate::login::{Credentials, LoginService, StartOptions};
use axum::{
    extract::{Extension, Path},
    response::Json,
};
use secrecy::SecretString;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/v1/login",
    request_body = StartRequest,
    responses(
        (status = 200, description = "State of the attempt after the first challenge or completion", body = LoginStateResponse)
    ),
    tag = "login"
)]
pub async fn start(
    service: Extension<Arc<LoginService>>,
    Json(request): Json<StartRequest>,
) -> Json<LoginStateResponse> {
    let credentials = Credentials {
        account_id: request.account_id,
        password: SecretString::from(request.password),
    };
    let options = StartOptions {
        protocol: request.protocol,
    };
    let report = service.start(credentials, options).await;
    Json(LoginStateResponse::from(report))
}

#[utoipa::path(
    post,
    path = "/v1/login/answer",
    request_body = AnswerRequest,
    responses(
        (status = 200, description = "State of the attempt after the answer was processed", body = LoginStateResponse)
    ),
    tag = "login"
)]
pub async fn answer(
    service: Extension<Arc<LoginService>>,
    Json(request): Json<AnswerRequest>,
) -> Json<LoginStateResponse> {
    let report = service
        .submit_answer(&request.account_id, request.answer)
        .await;
    Json(LoginStateResponse::from(report))
}

#[utoipa::path(
    get,
    path = "/v1/login/{account_id}",
    params(
        ("account_id" = String, Path, description = "Principal identifier of the attempt")
    ),
    responses(
        (status = 200, description = "Current state of the attempt, without blocking", body = LoginStateResponse)
    ),
    tag = "login"
)]
pub async fn state(
    service: Extension<Arc<LoginService>>,
    Path(account_id): Path<String>,
) -> Json<LoginStateResponse> {
    let report = service.query(&account_id).await;
    Json(LoginStateResponse::from(report))
}
