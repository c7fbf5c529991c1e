use clap::{Arg, Command};

pub const ARG_SESSION_TTL: &str = "session-ttl";
pub const ARG_SWEEP_INTERVAL: &str = "sweep-interval";
pub const ARG_START_DEBOUNCE: &str = "start-debounce";
pub const ARG_ANSWER_TIMEOUT: &str = "answer-timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_TTL)
                .long(ARG_SESSION_TTL)
                .help("Seconds an idle session survives before eviction")
                .default_value("3600")
                .env("MANPREMO_SESSION_TTL")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_SWEEP_INTERVAL)
                .long(ARG_SWEEP_INTERVAL)
                .help("Seconds between eviction sweeps")
                .default_value("10")
                .env("MANPREMO_SWEEP_INTERVAL")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_START_DEBOUNCE)
                .long(ARG_START_DEBOUNCE)
                .help("Seconds during which a duplicate start is reported as EXIST_SESSION")
                .default_value("15")
                .env("MANPREMO_START_DEBOUNCE")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_ANSWER_TIMEOUT)
                .long(ARG_ANSWER_TIMEOUT)
                .help("Seconds the login worker waits for a human answer")
                .default_value("600")
                .env("MANPREMO_ANSWER_TIMEOUT")
                .value_parser(clap::value_parser!(u64)),
        )
}
