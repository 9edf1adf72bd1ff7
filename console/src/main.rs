//! Depot console binary
//!
//! Usage: `depot [path] [argument]`
//!
//! The path defaults to the session's landing route. The argument is the
//! search keyword on `/shop` and the tracking number on `/track`.

use anyhow::Context;
use depot_access::landing_route;
use depot_console::{Console, ConsoleConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "depot_console=info,depot_api=warn,depot_state=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ConsoleConfig::from_env().context("invalid configuration")?;
    tracing::info!(base_url = %config.api.base_url, "starting console");

    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => landing_route(&config.session()).to_string(),
    };
    let arg = args.next();

    let console = Console::new(&config).await.context("failed to start console")?;
    let page = console
        .visit(&path, arg.as_deref())
        .await
        .with_context(|| format!("failed to render {path}"))?;
    print!("{page}");

    Ok(())
}
