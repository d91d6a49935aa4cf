use std::io;

use clap::Parser;
use eyre::Result;
use pump_listener::{Config, Listener};
use tracing::{debug, level_filters::LevelFilter, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let env_log = EnvFilter::try_from_default_env();

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .event_format(
            tracing_subscriber::fmt::format()
                .with_file(true)
                .with_line_number(true),
        );

    if let Ok(filter) = env_log {
        tracing_subscriber::registry()
            .with(fmt_layer.with_filter(filter))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt_layer.with_filter(LevelFilter::WARN))
            .init();
    }

    let config = Config::parse();
    let mut listener = Listener::new(
        config.url.as_str(),
        config.listener_options(),
        io::stdout(),
        io::stderr(),
    );

    let outcome = listener.run(interrupt()).await?;
    debug!("Listener finished: {outcome:?}");

    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed the listener just
/// runs until the connection ends.
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
