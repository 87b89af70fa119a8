//! Per-connection task: framed reads, dispatch, and outbound delivery.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use picoirc_proto::{LineCodec, Request};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{info, warn};

use crate::error::HandlerError;
use crate::handlers::{Context, Registry};
use crate::state::Core;

/// One client connection.
///
/// Inbound lines are parsed and dispatched while outbound lines queued by
/// any handler (including handlers running on behalf of other sessions)
/// drain through the session's channel. Handlers run under the state lock
/// and never block on the socket; this task is the only writer.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    core: Arc<Core>,
    registry: Arc<Registry>,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        core: Arc<Core>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            stream,
            peer,
            core,
            registry,
        }
    }

    pub async fn run(self) {
        let framed = Framed::new(self.stream, LineCodec::new());
        let (mut writer, mut reader) = framed.split();

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let id = self.core.attach(self.peer, tx);

        loop {
            tokio::select! {
                inbound = reader.next() => {
                    match inbound {
                        Some(Ok(line)) => {
                            let Some(req) = Request::parse(&line) else {
                                continue;
                            };
                            let mut ctx = Context { id, core: &self.core };
                            match self.registry.dispatch(&mut ctx, &req).await {
                                Ok(()) => {}
                                Err(HandlerError::Quit) => {
                                    info!(peer = %self.peer, id, "Client quit");
                                    break;
                                }
                                Err(HandlerError::SessionGone) => break,
                            }
                        }
                        Some(Err(err)) => {
                            warn!(peer = %self.peer, id, %err, "Read error, closing connection");
                            break;
                        }
                        None => break,
                    }
                }
                outbound = rx.recv() => {
                    match outbound {
                        Some(line) => {
                            if writer.send(line).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        // Flush lines queued before the loop ended, then tear down.
        while let Ok(line) = rx.try_recv() {
            if writer.send(line).await.is_err() {
                break;
            }
        }
        self.core.detach(id);
        info!(peer = %self.peer, id, "Client disconnected");
    }
}
