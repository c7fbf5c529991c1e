//! Map validated CLI matches to an action.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::broker;
use anyhow::Result;

/// Map validated CLI matches to the server action.
///
/// # Errors
///
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let session_ttl_seconds = matches
        .get_one::<u64>(broker::ARG_SESSION_TTL)
        .copied()
        .unwrap_or(3600);
    let sweep_interval_seconds = matches
        .get_one::<u64>(broker::ARG_SWEEP_INTERVAL)
        .copied()
        .unwrap_or(10);
    let start_debounce_seconds = matches
        .get_one::<u64>(broker::ARG_START_DEBOUNCE)
        .copied()
        .unwrap_or(15);
    let answer_timeout_seconds = matches
        .get_one::<u64>(broker::ARG_ANSWER_TIMEOUT)
        .copied()
        .unwrap_or(600);

    Ok(Action::Server(Args {
        port,
        session_ttl_seconds,
        sweep_interval_seconds,
        start_debounce_seconds,
        answer_timeout_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_builds_server_args_from_env() {
        temp_env::with_vars(
            [
                ("MANPREMO_PORT", Some("9443")),
                ("MANPREMO_SESSION_TTL", Some("1800")),
                ("MANPREMO_ANSWER_TIMEOUT", Some("300")),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["manpremo"]);
                let Action::Server(args) = handler(&matches).unwrap();
                assert_eq!(args.port, 9443);
                assert_eq!(args.session_ttl_seconds, 1800);
                assert_eq!(args.answer_timeout_seconds, 300);
                assert_eq!(args.sweep_interval_seconds, 10);
            },
        );
    }
}
