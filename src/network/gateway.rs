//! The accept loop.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::handlers::Registry;
use crate::state::Core;

use super::Connection;

/// Owns the listening socket and spawns one [`Connection`] task per client.
pub struct Gateway {
    listener: TcpListener,
    core: Arc<Core>,
    registry: Arc<Registry>,
}

impl Gateway {
    /// Bind the listener.
    pub async fn bind(addr: SocketAddr, core: Arc<Core>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!(%addr, "Listener bound");
        Ok(Self {
            listener,
            core,
            registry: Arc::new(Registry::new()),
        })
    }

    /// The bound address, useful when binding port 0.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("listener has no local address")
    }

    /// Accept connections until the task is dropped. Accept errors are
    /// transient (fd exhaustion, aborted handshakes); log and keep serving.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    info!(%peer, "Client connected");
                    let core = Arc::clone(&self.core);
                    let registry = Arc::clone(&self.registry);
                    tokio::spawn(async move {
                        Connection::new(stream, peer, core, registry).run().await;
                    });
                }
                Err(err) => {
                    error!(%err, "Failed to accept connection");
                }
            }
        }
    }
}
