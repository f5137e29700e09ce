use clap::Parser;
use rawhttpd::config::{CliArgs, Config};
use rawhttpd::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::from_args(&args)?;

    tracing::info!(
        listen = %cfg.server.listen_addr,
        directory = ?cfg.files.directory,
        read_timeout_secs = ?cfg.server.read_timeout_secs,
        "Starting rawhttpd"
    );

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
