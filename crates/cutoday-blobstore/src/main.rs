//! cutoday-blobstore entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use cutoday_blobstore::cli::Cli;
use cutoday_blobstore::{FsBlobStore, serve};
use cutoday_core::{TracingConfig, TracingOutputFormat, init_tracing};

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

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let tracing = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::server().with_format(cli.log_format.parse::<TracingOutputFormat>()?)
    };
    init_tracing(tracing)?;

    let dir = cli.storage_dir();
    let store = FsBlobStore::open(&dir).await?;
    tracing::info!(storage = %dir.display(), "opened blob storage");

    serve(
        cli.socket_addr(),
        Arc::new(store),
        cli.public_url(),
        cli.max_upload_bytes(),
    )
    .await?;
    Ok(())
}
