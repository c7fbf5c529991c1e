use anyhow::Result;
use manpremo::cli::{self, actions::server, actions::Action};

#[tokio::main]
async fn main() -> Result<()> {
    let action = cli::start()?;

    match action {
        Action::Server(args) => server::handle(args).await?,
    }

    cli::telemetry::shutdown_tracer();

    Ok(())
}
