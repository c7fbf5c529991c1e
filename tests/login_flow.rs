//! End-to-end flows through the orchestrator with the simulated driver.
//!
//! These tests play the external caller: one short-lived call per step, with
//! the worker suspended in between, exactly as an HTTP client would drive the
//! broker.

use manpremo::{
    broker::{BrokerConfig, Phase, SessionRegistry},
    login::{
        sim::{SimStep, SimulatedDriver},
        Credentials, LoginService, MemoryFingerprintStore, StartOptions,
    },
};
use secrecy::SecretString;
use std::sync::Arc;
use tokio::time::Duration;

fn service_with(steps: Vec<SimStep>) -> LoginService {
    LoginService::new(
        Arc::new(SessionRegistry::new()),
        Arc::new(SimulatedDriver::new().with_steps(steps)),
        Arc::new(MemoryFingerprintStore::new()),
        BrokerConfig::new(),
    )
}

fn credentials(account_id: &str) -> Credentials {
    Credentials {
        account_id: account_id.to_string(),
        password: SecretString::from("correct horse".to_string()),
    }
}

fn slider_then_device() -> Vec<SimStep> {
    vec![
        SimStep::Slider {
            url: "https://captcha.example/slider/9".to_string(),
        },
        SimStep::DeviceSms {
            phone_number: Some("+1 555".to_string()),
            fallback_url: Some("https://verify.example/jump".to_string()),
        },
    ]
}

#[tokio::test(start_paused = true)]
async fn slider_then_sms_flow_reaches_success() {
    let service = service_with(slider_then_device());

    let report = service
        .start(credentials("123456"), StartOptions::default())
        .await;
    assert_eq!(report.phase, Phase::NeedSlideCode);
    assert_eq!(report.slide_url, "https://captcha.example/slider/9");

    let report = service.submit_answer("123456", "ticket-1".to_string()).await;
    assert_eq!(report.phase, Phase::NeedSendPhoneCode);
    assert_eq!(report.phone_number, "+1 555");

    let report = service.submit_answer("123456", "yes".to_string()).await;
    assert_eq!(report.phase, Phase::NeedPhoneCode);

    let report = service.submit_answer("123456", "123456".to_string()).await;
    assert_eq!(report.phase, Phase::Success);

    // The finished session stays queryable until the sweeper reclaims it.
    let report = service.query("123456").await;
    assert_eq!(report.phase, Phase::Success);
}

#[tokio::test(start_paused = true)]
async fn declined_sms_completes_through_the_link_branch() {
    let service = service_with(slider_then_device());

    service
        .start(credentials("123456"), StartOptions::default())
        .await;
    service.submit_answer("123456", "ticket-1".to_string()).await;

    let report = service.submit_answer("123456", "no".to_string()).await;
    assert_eq!(report.phase, Phase::NeedJumpVerify);
    assert_eq!(report.verify_url, "https://verify.example/jump");
    // The slider URL from the first round is stale but still visible.
    assert_eq!(report.slide_url, "https://captcha.example/slider/9");

    let report = service.submit_answer("123456", "done".to_string()).await;
    assert_eq!(report.phase, Phase::Success);
}

#[tokio::test(start_paused = true)]
async fn upstream_failure_surfaces_as_failure_phase() {
    let service = service_with(vec![SimStep::Fail {
        reason: "wrong password".to_string(),
    }]);

    let report = service
        .start(credentials("123456"), StartOptions::default())
        .await;
    assert_eq!(report.phase, Phase::Failure);

    let report = service.query("123456").await;
    assert_eq!(report.phase, Phase::Failure);
}

#[tokio::test(start_paused = true)]
async fn duplicate_start_is_debounced() {
    let service = service_with(slider_then_device());

    let report = service
        .start(credentials("123456"), StartOptions::default())
        .await;
    assert_eq!(report.phase, Phase::NeedSlideCode);

    let report = service
        .start(credentials("123456"), StartOptions::default())
        .await;
    assert_eq!(report.phase, Phase::ExistSession);

    // A different principal is unaffected by the debounce.
    let report = service
        .start(credentials("654321"), StartOptions::default())
        .await;
    assert_eq!(report.phase, Phase::NeedSlideCode);
}

#[tokio::test(start_paused = true)]
async fn unanswered_attempt_fails_and_stays_failed() {
    let service = service_with(slider_then_device());

    let report = service
        .start(credentials("123456"), StartOptions::default())
        .await;
    assert_eq!(report.phase, Phase::NeedSlideCode);

    // Nobody ever answers; the worker abandons the attempt after its wait.
    tokio::time::sleep(Duration::from_secs(610)).await;
    let report = service.query("123456").await;
    assert_eq!(report.phase, Phase::Failure);

    // A late answer cannot resurrect the attempt.
    let report = service.submit_answer("123456", "late".to_string()).await;
    assert_eq!(report.phase, Phase::Failure);
}

#[tokio::test(start_paused = true)]
async fn answers_for_unknown_accounts_never_block() {
    let service = service_with(slider_then_device());

    let report = service.submit_answer("999999", "abcd".to_string()).await;
    assert_eq!(report.phase, Phase::NoSession);

    let report = service.query("999999").await;
    assert_eq!(report.phase, Phase::NoSession);
}
