use std::time::Duration;

const DEFAULT_HANDOFF_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_ANSWER_TIMEOUT: Duration = Duration::from_secs(600);
const DEFAULT_SIGNAL_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);
const DEFAULT_START_DEBOUNCE: Duration = Duration::from_secs(15);

/// Timeouts and housekeeping intervals for the handshake broker.
///
/// The two blocking waits are deliberately asymmetric: a worker may wait ten
/// minutes (`answer_timeout`) for a human to supply an answer, while external
/// callers block for thirty seconds (`signal_timeout`) and are expected to
/// poll again on timeout.
#[derive(Clone, Copy, Debug)]
pub struct BrokerConfig {
    handoff_timeout: Duration,
    answer_timeout: Duration,
    signal_timeout: Duration,
    sweep_interval: Duration,
    session_ttl: Duration,
    start_debounce: Duration,
}

impl BrokerConfig {
    /// Default config: 5s hand-off sends, 600s worker answer wait, 30s caller
    /// signal wait, 10s sweep interval, 1h session TTL, 15s start debounce.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handoff_timeout: DEFAULT_HANDOFF_TIMEOUT,
            answer_timeout: DEFAULT_ANSWER_TIMEOUT,
            signal_timeout: DEFAULT_SIGNAL_TIMEOUT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            session_ttl: DEFAULT_SESSION_TTL,
            start_debounce: DEFAULT_START_DEBOUNCE,
        }
    }

    #[must_use]
    pub fn with_handoff_timeout_seconds(mut self, seconds: u64) -> Self {
        self.handoff_timeout = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_answer_timeout_seconds(mut self, seconds: u64) -> Self {
        self.answer_timeout = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_signal_timeout_seconds(mut self, seconds: u64) -> Self {
        self.signal_timeout = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_sweep_interval_seconds(mut self, seconds: u64) -> Self {
        self.sweep_interval = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl = Duration::from_secs(seconds);
        self
    }

    #[must_use]
    pub fn with_start_debounce_seconds(mut self, seconds: u64) -> Self {
        self.start_debounce = Duration::from_secs(seconds);
        self
    }

    /// Clamp degenerate values. The session TTL is kept at or above the
    /// answer timeout so a worker parked on a rendezvous always times out
    /// before its session can be swept mid-wait.
    #[must_use]
    pub fn normalize(self) -> Self {
        let handoff_timeout = non_zero(self.handoff_timeout);
        let answer_timeout = non_zero(self.answer_timeout);
        let signal_timeout = non_zero(self.signal_timeout);
        let sweep_interval = non_zero(self.sweep_interval);
        let session_ttl = if self.session_ttl < answer_timeout {
            answer_timeout
        } else {
            self.session_ttl
        };
        Self {
            handoff_timeout,
            answer_timeout,
            signal_timeout,
            sweep_interval,
            session_ttl,
            start_debounce: self.start_debounce,
        }
    }

    #[must_use]
    pub fn handoff_timeout(&self) -> Duration {
        self.handoff_timeout
    }

    #[must_use]
    pub fn answer_timeout(&self) -> Duration {
        self.answer_timeout
    }

    #[must_use]
    pub fn signal_timeout(&self) -> Duration {
        self.signal_timeout
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    #[must_use]
    pub fn start_debounce(&self) -> Duration {
        self.start_debounce
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn non_zero(duration: Duration) -> Duration {
    if duration.is_zero() {
        Duration::from_secs(1)
    } else {
        duration
    }
}
