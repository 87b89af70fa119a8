//! Per-connection session state.

use std::net::SocketAddr;
use tokio::sync::mpsc;

/// Stable identity of one live connection.
pub type SessionId = u64;

/// Registration phases, in order. A session advances by sending the correct
/// PASS (authenticated) and then setting both a nickname and a username
/// (registered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegistrationPhase {
    Unregistered,
    Authenticated,
    Registered,
}

/// Server-side state for one live client connection.
///
/// Every per-client attribute lives here; the registries hold only the
/// session id, so there are no parallel maps to drift out of sync.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub addr: SocketAddr,
    pub authenticated: bool,
    pub nick: Option<String>,
    pub username: Option<String>,
    sender: mpsc::UnboundedSender<String>,
}

impl Session {
    pub fn new(id: SessionId, addr: SocketAddr, sender: mpsc::UnboundedSender<String>) -> Self {
        Self {
            id,
            addr,
            authenticated: false,
            nick: None,
            username: None,
            sender,
        }
    }

    /// Current registration phase, derived from the identity fields.
    pub fn phase(&self) -> RegistrationPhase {
        if !self.authenticated {
            RegistrationPhase::Unregistered
        } else if self.nick.is_none() || self.username.is_none() {
            RegistrationPhase::Authenticated
        } else {
            RegistrationPhase::Registered
        }
    }

    /// Queue a line for delivery to this client. Best-effort: a peer whose
    /// connection task already exited simply misses the line.
    pub fn send(&self, line: impl Into<String>) {
        let _ = self.sender.send(line.into());
    }
}
