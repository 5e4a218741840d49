//! gethosts - Print the host list from a remote inventory
//!
//! Serves the list from a local cache while it is fresh and downloads it
//! otherwise. An optional pattern narrows the output to matching hosts.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gethosts::cli::{Cli, StartupConfig};
use gethosts::filter::write_hosts;
use gethosts::HostGetter;

/// Initialize logging to stderr
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(filter) = &config.filter {
        debug!(
            pattern = %filter.pattern,
            prefix = %filter.display_prefix,
            "Requesting pattern"
        );
    }

    let getter = HostGetter::from_config(&config.fetch);

    let hosts = match getter.get_hosts().await {
        Ok(hosts) => hosts,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    if let Err(e) = write_hosts(&mut stdout.lock(), &hosts, config.filter.as_ref()) {
        // A closed pipe (e.g. `| head`) is not a failure
        if e.kind() != io::ErrorKind::BrokenPipe {
            error!("Could not write hosts: {}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
