//! # Manpremo (Challenge-based Login Handshake Broker)
//!
//! `manpremo` brokers a multi-step, challenge-based login flow between two
//! independently scheduled parties: a long-running login worker that may
//! suspend mid-flow waiting for a human answer, and repeated short-lived
//! external calls that deliver those answers and poll for progress.
//!
//! ## Rendezvous protocol
//!
//! Every in-flight attempt owns one [`broker::Session`] with two zero-capacity
//! hand-off channels. A send on either channel only completes once the other
//! party has taken the value out, so exactly one challenge round is ever in
//! flight: a caller cannot queue a second answer before the worker consumed
//! the first, and the worker cannot post a new challenge before the previous
//! signal was read. The two waits are deliberately asymmetric — the worker may
//! wait ten minutes for a human, while callers block for seconds and poll.
//!
//! ## Sessions & eviction
//!
//! Sessions live in an in-memory [`broker::SessionRegistry`] keyed by the
//! principal (account) identifier. A background sweeper evicts sessions idle
//! beyond a TTL; finished attempts stay queryable until then so callers can
//! fetch the final result. Nothing survives a process restart.
//!
//! ## Collaborator seams
//!
//! The actual authentication protocol ([`login::LoginDriver`]), SMS/link
//! verification submission ([`challenge::VerifyTransport`]), and device
//! fingerprint persistence ([`login::FingerprintStore`]) are consumed through
//! narrow traits. The shipped binary wires the simulated driver for local
//! development; embedders plug in a real protocol implementation.

pub mod api;
pub mod broker;
pub mod challenge;
pub mod cli;
pub mod login;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
