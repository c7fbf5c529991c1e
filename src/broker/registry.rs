//! Process-wide session registry and its eviction sweeper.

use super::{config::BrokerConfig, session::Session};
use std::{collections::HashMap, sync::Arc};
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
    time::interval,
};
use tracing::{debug, info};

/// Keyed store of live sessions, one per principal identifier.
///
/// All map mutations go through the mutex, so `create`, `find` and the
/// sweeper's `sweep` are atomic with respect to each other and can never
/// observe a partially constructed session.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Arc<Session>>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create and store a fresh session, overwriting any prior entry for
    /// `account_id`. Deciding whether an overwrite is appropriate is the flow
    /// orchestrator's job.
    pub async fn create(&self, account_id: &str) -> Arc<Session> {
        let session = Arc::new(Session::new());
        self.sessions
            .lock()
            .await
            .insert(account_id.to_string(), Arc::clone(&session));
        session
    }

    pub async fn find(&self, account_id: &str) -> Option<Arc<Session>> {
        self.sessions.lock().await.get(account_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Remove every session idle beyond `ttl`; returns how many were evicted.
    ///
    /// A worker still holding its `Arc<Session>` keeps its rendezvous working
    /// after eviction; only lookups stop finding the session.
    pub async fn sweep(&self, ttl: tokio::time::Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() <= ttl);
        before - sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the background eviction task.
pub struct Sweeper {
    shutdown: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl Sweeper {
    /// Stop the sweeper and wait for its task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(()).await;
        let _ = self.task.await;
    }
}

/// Spawn the periodic sweep over `registry`.
#[must_use]
pub fn spawn_sweeper(registry: Arc<SessionRegistry>, config: &BrokerConfig) -> Sweeper {
    let (shutdown, mut rx) = mpsc::channel(1);
    let sweep_interval = config.sweep_interval();
    let session_ttl = config.session_ttl();

    let task = tokio::spawn(async move {
        let mut ticker = interval(sweep_interval);
        // interval's first tick completes immediately; consume it so sweeps
        // start one full period in.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = rx.recv() => break,
                _ = ticker.tick() => {
                    let evicted = registry.sweep(session_ttl).await;
                    if evicted > 0 {
                        info!(evicted, "evicted idle login sessions");
                    }
                }
            }
        }
        debug!("session sweeper stopped");
    });

    Sweeper { shutdown, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::Phase;
    use tokio::time::{advance, Duration};

    #[tokio::test]
    async fn create_then_find_returns_the_same_session() {
        let registry = SessionRegistry::new();
        let created = registry.create("123456").await;
        let found = registry.find("123456").await.unwrap();
        assert!(Arc::ptr_eq(&created, &found));
        assert!(registry.find("654321").await.is_none());
    }

    #[tokio::test]
    async fn create_overwrites_prior_entry() {
        let registry = SessionRegistry::new();
        let first = registry.create("123456").await;
        let second = registry.create("123456").await;
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len().await, 1);
        let found = registry.find("123456").await.unwrap();
        assert!(Arc::ptr_eq(&second, &found));
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_evicts_only_sessions_past_the_ttl() {
        let registry = SessionRegistry::new();
        registry.create("stale").await;
        advance(Duration::from_secs(1800)).await;
        let fresh = registry.create("fresh").await;
        advance(Duration::from_secs(1801)).await;
        // "stale" has been idle 3601s, "fresh" only 1801s.
        let evicted = registry.sweep(Duration::from_secs(3600)).await;
        assert_eq!(evicted, 1);
        assert!(registry.find("stale").await.is_none());
        assert!(registry.find("fresh").await.is_some());
        drop(fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn phase_transitions_reset_the_eviction_clock() {
        let registry = SessionRegistry::new();
        let session = registry.create("123456").await;
        advance(Duration::from_secs(3599)).await;
        session.set_phase(Phase::NeedSlideCode);
        advance(Duration::from_secs(3599)).await;
        assert_eq!(registry.sweep(Duration::from_secs(3600)).await, 0);
        assert!(registry.find("123456").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_task_evicts_idle_sessions() {
        let registry = Arc::new(SessionRegistry::new());
        registry.create("stale").await;
        let sweeper = spawn_sweeper(Arc::clone(&registry), &BrokerConfig::new());

        tokio::time::sleep(Duration::from_secs(3600 + 11)).await;
        assert!(registry.is_empty().await);

        sweeper.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_keeps_sessions_inside_the_ttl() {
        let registry = Arc::new(SessionRegistry::new());
        registry.create("active").await;
        let sweeper = spawn_sweeper(Arc::clone(&registry), &BrokerConfig::new());

        tokio::time::sleep(Duration::from_secs(1800)).await;
        assert_eq!(registry.len().await, 1);

        sweeper.shutdown().await;
    }
}
