use anyhow::Result;
use lsup::commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging is only wired up when a debug environment is
    // detected; otherwise messages go straight to the console.
    if std::env::var("LSUP_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
            .init();
    }

    Cli::menu().await
}
