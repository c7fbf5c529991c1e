//! Flow orchestrator: the three externally-facing operations.

use super::{
    driver::{Credentials, LoginContext, LoginDriver, StartOptions},
    fingerprint::FingerprintStore,
};
use crate::{
    broker::{BrokerConfig, Phase, Session, SessionRegistry, Snapshot},
    challenge::{ChallengeBridge, ChallengeSolver},
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// State of one attempt as reported to external callers.
#[derive(Clone, Debug)]
pub struct LoginReport {
    pub phase: Phase,
    pub slide_url: String,
    pub phone_number: String,
    pub verify_url: String,
}

impl LoginReport {
    /// Synthesize a marker report (`NO_SESSION` / `EXIST_SESSION`).
    #[must_use]
    pub fn marker(phase: Phase) -> Self {
        Self {
            phase,
            slide_url: String::new(),
            phone_number: String::new(),
            verify_url: String::new(),
        }
    }
}

impl From<Snapshot> for LoginReport {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            phase: snapshot.phase,
            slide_url: snapshot.slide_url,
            phone_number: snapshot.phone_number,
            verify_url: snapshot.verify_url,
        }
    }
}

/// Orchestrates login attempts: starts workers, relays answers into sessions,
/// reports snapshots.
pub struct LoginService {
    registry: Arc<SessionRegistry>,
    driver: Arc<dyn LoginDriver>,
    fingerprints: Arc<dyn FingerprintStore>,
    config: BrokerConfig,
}

impl LoginService {
    #[must_use]
    pub fn new(
        registry: Arc<SessionRegistry>,
        driver: Arc<dyn LoginDriver>,
        fingerprints: Arc<dyn FingerprintStore>,
        config: BrokerConfig,
    ) -> Self {
        Self {
            registry,
            driver,
            fingerprints,
            config: config.normalize(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> BrokerConfig {
        self.config
    }

    /// Start a new attempt, or report the one already in flight.
    ///
    /// A session fresher than the debounce window means a duplicate
    /// submission: `EXIST_SESSION` is reported and no worker is started. A
    /// staler session is superseded; its worker, if still running, is left to
    /// time out on its own rendezvous.
    pub async fn start(&self, credentials: Credentials, options: StartOptions) -> LoginReport {
        let account_id = credentials.account_id.clone();
        if let Some(existing) = self.registry.find(&account_id).await {
            if existing.idle_for() < self.config.start_debounce() {
                debug!(account_id = %account_id, "attempt already in flight");
                return LoginReport::marker(Phase::ExistSession);
            }
        }
        let session = self.registry.create(&account_id).await;

        let fingerprint = match self.fingerprints.load(&account_id).await {
            Ok(fingerprint) => fingerprint,
            Err(err) => {
                warn!(account_id = %account_id, error = %err, "failed to load device fingerprint");
                None
            }
        };

        let ctx = LoginContext {
            account_id,
            password: credentials.password,
            protocol: options.protocol,
            fingerprint,
        };
        self.spawn_worker(Arc::clone(&session), ctx);
        self.wait_and_report(&session).await
    }

    /// Relay a user-entered answer into the session and report the next
    /// state. The same path serves slider codes, SMS consent, SMS codes and
    /// fallback acknowledgments.
    pub async fn submit_answer(&self, account_id: &str, answer: String) -> LoginReport {
        let Some(session) = self.registry.find(account_id).await else {
            return LoginReport::marker(Phase::NoSession);
        };
        if session
            .send_request(answer, self.config.handoff_timeout())
            .await
            .is_err()
        {
            // No worker took the answer: the previous round is still being
            // processed, or the attempt already ended.
            warn!(account_id, "answer was not consumed in time");
            return session.snapshot().into();
        }
        self.wait_and_report(&session).await
    }

    /// Report the current state without blocking.
    pub async fn query(&self, account_id: &str) -> LoginReport {
        match self.registry.find(account_id).await {
            Some(session) => session.snapshot().into(),
            None => LoginReport::marker(Phase::NoSession),
        }
    }

    fn spawn_worker(&self, session: Arc<Session>, ctx: LoginContext) {
        let driver = Arc::clone(&self.driver);
        let config = self.config;
        let account_id = ctx.account_id.clone();
        tokio::spawn(async move {
            let solver: Arc<dyn ChallengeSolver> =
                Arc::new(ChallengeBridge::new(Arc::clone(&session), config));
            let phase = match driver.login(ctx, solver).await {
                Ok(()) => {
                    info!(account_id = %account_id, "login attempt succeeded");
                    Phase::Success
                }
                Err(err) => {
                    error!(account_id = %account_id, error = %err, "login attempt failed");
                    Phase::Failure
                }
            };
            session.set_phase(phase);
            if session.send_response(config.handoff_timeout()).await.is_err() {
                // Nobody was blocked on this attempt; the terminal phase is
                // picked up by a later query.
                debug!(account_id = %account_id, "final signal not picked up");
            }
        });
    }

    async fn wait_and_report(&self, session: &Arc<Session>) -> LoginReport {
        if session
            .await_response(self.config.signal_timeout())
            .await
            .is_err()
        {
            debug!("no state change yet; caller should poll again");
        }
        session.snapshot().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::MemoryFingerprintStore;
    use anyhow::{ensure, Result};
    use async_trait::async_trait;
    use secrecy::SecretString;
    use tokio::time::{advance, Duration};

    /// Driver that asks for one slider code and accepts only "abcd".
    struct SliderDriver;

    #[async_trait]
    impl LoginDriver for SliderDriver {
        async fn login(&self, _ctx: LoginContext, solver: Arc<dyn ChallengeSolver>) -> Result<()> {
            let code = solver
                .slider_captcha("https://captcha.example/start")
                .await?;
            ensure!(code == "abcd", "wrong slider code: {code}");
            Ok(())
        }
    }

    /// Driver that fails before any challenge.
    struct FailingDriver;

    #[async_trait]
    impl LoginDriver for FailingDriver {
        async fn login(&self, _ctx: LoginContext, _solver: Arc<dyn ChallengeSolver>) -> Result<()> {
            anyhow::bail!("upstream said no")
        }
    }

    fn service(driver: impl LoginDriver + 'static) -> LoginService {
        LoginService::new(
            Arc::new(SessionRegistry::new()),
            Arc::new(driver),
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

    #[tokio::test(start_paused = true)]
    async fn slider_flow_reaches_success() {
        let service = service(SliderDriver);

        let report = service
            .start(credentials("123456"), StartOptions::default())
            .await;
        assert_eq!(report.phase, Phase::NeedSlideCode);
        assert_eq!(report.slide_url, "https://captcha.example/start");

        let report = service.submit_answer("123456", "abcd".to_string()).await;
        assert_eq!(report.phase, Phase::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_answer_fails_the_attempt() {
        let service = service(SliderDriver);
        service
            .start(credentials("123456"), StartOptions::default())
            .await;
        let report = service.submit_answer("123456", "nope".to_string()).await;
        assert_eq!(report.phase, Phase::Failure);
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_inside_the_debounce_window_is_rejected() {
        let service = service(SliderDriver);
        service
            .start(credentials("123456"), StartOptions::default())
            .await;
        let first_session = service.registry().find("123456").await.unwrap();

        let report = service
            .start(credentials("123456"), StartOptions::default())
            .await;
        assert_eq!(report.phase, Phase::ExistSession);

        // The original session is untouched; no second worker was started.
        let session = service.registry().find("123456").await.unwrap();
        assert!(Arc::ptr_eq(&first_session, &session));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_session_is_superseded_by_a_new_start() {
        let service = service(FailingDriver);
        let report = service
            .start(credentials("123456"), StartOptions::default())
            .await;
        assert_eq!(report.phase, Phase::Failure);
        let first_session = service.registry().find("123456").await.unwrap();

        advance(Duration::from_secs(16)).await;
        let report = service
            .start(credentials("123456"), StartOptions::default())
            .await;
        assert_eq!(report.phase, Phase::Failure);
        let second_session = service.registry().find("123456").await.unwrap();
        assert!(!Arc::ptr_eq(&first_session, &second_session));
    }

    #[tokio::test(start_paused = true)]
    async fn answer_for_unknown_account_reports_no_session() {
        let service = service(SliderDriver);
        let report = service.submit_answer("999999", "abcd".to_string()).await;
        assert_eq!(report.phase, Phase::NoSession);
    }

    #[tokio::test(start_paused = true)]
    async fn query_for_unknown_account_reports_no_session() {
        let service = service(SliderDriver);
        let report = service.query("999999").await;
        assert_eq!(report.phase, Phase::NoSession);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_failure_is_sticky() {
        let service = service(FailingDriver);
        let report = service
            .start(credentials("123456"), StartOptions::default())
            .await;
        assert_eq!(report.phase, Phase::Failure);

        // A late answer finds no worker and cannot move the phase.
        let report = service.submit_answer("123456", "abcd".to_string()).await;
        assert_eq!(report.phase, Phase::Failure);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_attempt_times_out_into_failure() {
        let service = service(SliderDriver);
        let report = service
            .start(credentials("123456"), StartOptions::default())
            .await;
        assert_eq!(report.phase, Phase::NeedSlideCode);

        // Nobody answers; the worker gives up after its 600s wait.
        tokio::time::sleep(Duration::from_secs(601 + 6)).await;
        let report = service.query("123456").await;
        assert_eq!(report.phase, Phase::Failure);
    }
}
