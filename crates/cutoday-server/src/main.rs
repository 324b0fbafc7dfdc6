//! cutoday server entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use cutoday_core::{TracingConfig, init_tracing};
use cutoday_providers::google::GoogleProvider;
use cutoday_providers::mobilize::MobilizeProvider;
use cutoday_server::cli::{Cli, Command, ConfigAction};
use cutoday_server::{CutodayConfig, ServerError, ServerResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ServerResult<()> {
    let mut config = CutodayConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => dump(&config),
            ConfigAction::Validate => validate(&config),
            ConfigAction::Path => {
                println!("{}", CutodayConfig::default_path().display());
                Ok(())
            }
        },
        Some(Command::Serve) | None => {
            let tracing = if cli.debug {
                TracingConfig::debug()
            } else {
                TracingConfig::server().with_format(config.server.log_format()?)
            };
            init_tracing(tracing)?;
            cutoday_server::serve(config).await
        }
    }
}

fn dump(config: &CutodayConfig) -> ServerResult<()> {
    let text = toml::to_string_pretty(config)
        .map_err(|e| ServerError::config(format!("failed to serialize config: {}", e)))?;
    print!("{}", text);
    Ok(())
}

/// Builds every enabled provider without serving, so secret references and
/// URLs are checked up front.
fn validate(config: &CutodayConfig) -> ServerResult<()> {
    let timeout = Duration::from_secs(config.server.source_timeout_secs);
    config.server.log_format()?;

    if config.google.enabled {
        let provider = GoogleProvider::new(config.google.to_provider_config(timeout)?)?;
        if !provider.config().has_api_key() {
            println!("warning: google.api_key is not set; the calendar source will be empty");
        }
    }
    if config.mobilize.enabled {
        MobilizeProvider::new(config.mobilize.to_provider_config(timeout))?;
    }

    println!("configuration OK");
    Ok(())
}
