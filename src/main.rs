mod api;
mod cli;
mod config;
mod download;
mod dump;
mod error;
mod pipeline;
mod selection;
mod tagging;
mod ui;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --debug
    let default_filter = if cli.debug {
        "warn,muclic=debug"
    } else {
        "warn,muclic=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let summary = cli::commands::run(cli).await?;

    if !summary.is_success() {
        tracing::error!("{} item(s) failed", summary.failed);
        std::process::exit(1);
    }

    Ok(())
}
