use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::fs::FileStore;
use crate::http::connection::Connection;
use crate::http::router::Router;

/// Binds the configured address and serves it until an accept fails.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", cfg.server.listen_addr))?;
    info!("Listening on {}", cfg.server.listen_addr);

    serve(listener, cfg).await
}

/// Accepts connections on `listener`, one task per connection.
///
/// Errors on an established connection stay inside its task. An accept error
/// ends the loop and is returned to the caller.
pub async fn serve(listener: TcpListener, cfg: &Config) -> anyhow::Result<()> {
    let router = Arc::new(Router::new(FileStore::new(cfg.files.directory.clone())));

    loop {
        let (socket, peer) = listener
            .accept()
            .await
            .context("Error accepting connection")?;
        info!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        let server_cfg = cfg.server.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, router, &server_cfg);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
