//! wlsbeat - WebLogic domain metrics poller
//!
//! This binary polls the management REST API of a WebLogic domain on a fixed
//! interval and writes normalized events as JSON lines.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use wlsbeat::cli::Cli;
use wlsbeat::config::Config;
use wlsbeat::error::AppResult;
use wlsbeat::event::{EventSink, JsonLinesSink};
use wlsbeat::poller::{shutdown_signal, Poller};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    wlsbeat::init_logging(&cli.log_level.to_string(), cli.log_format)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting wlsbeat");

    run(&cli).await?;

    Ok(())
}

async fn run(cli: &Cli) -> AppResult<()> {
    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    if cli.validate {
        let targets = config.target_set();
        println!("Configuration is valid");
        println!("  host: {}", config.weblogic.host);
        println!(
            "  server version: {} ({})",
            targets.version_tag,
            targets.server_version()
        );
        println!(
            "  targets: {} servers, {} datasources, {} applications",
            targets.servers.len(),
            targets.datasources.len(),
            targets.applications.len()
        );
        return Ok(());
    }

    let poller = Poller::from_config(&config)?;

    let mut sink: Box<dyn EventSink + Send> = match &config.output.path {
        Some(path) => {
            info!(path = %path.display(), "Appending events to file");
            Box::new(JsonLinesSink::append_file(path)?)
        }
        None => Box::new(JsonLinesSink::stdout()),
    };

    if cli.once {
        let summary = poller.run_cycle(&mut sink).await;
        info!(events = summary.events(), "Single cycle finished");
        return Ok(());
    }

    poller.run(&mut sink, shutdown_signal()).await;

    Ok(())
}
