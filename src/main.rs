use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ai_llm_service::telemetry::{ChronoRfc3339Utc, env_filter_with_level};

mod cli;
mod commands;
mod formatting;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real env vars win.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(env_filter_with_level("info", Level::INFO))
        .with(
            fmt::layer()
                .with_target(false)
                .with_timer(ChronoRfc3339Utc),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli.command).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
