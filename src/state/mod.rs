//! Shared server state.
//!
//! [`Core`] is the single owner of all mutable state: every live session,
//! every channel, and the nickname index, guarded by one mutex. Connection
//! tasks and handlers lock, mutate, queue outbound lines on the per-session
//! unbounded senders, and unlock; no lock is ever held across an await
//! point. That serializes all mutation, which the moderation logic relies
//! on.

mod channel;
mod session;

pub use channel::{Channel, ChannelModes, MemberModes, Topic};
pub use session::{RegistrationPhase, Session, SessionId};

use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

/// The global registry: sessions, channels, and the nickname index.
///
/// `nicks` is derived data; the NICK handler and
/// [`ServerState::remove_session`] are the only writers, keeping it
/// consistent with `Session::nick` at all times.
#[derive(Debug, Default)]
pub struct ServerState {
    pub sessions: HashMap<SessionId, Session>,
    pub channels: HashMap<String, Channel>,
    pub nicks: HashMap<String, SessionId>,
}

impl ServerState {
    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Look up a session by exact nickname.
    pub fn resolve_nick(&self, nick: &str) -> Option<SessionId> {
        self.nicks.get(nick).copied()
    }

    /// The session's nickname, or the empty string when unset.
    pub fn nick_of(&self, id: SessionId) -> String {
        self.sessions
            .get(&id)
            .and_then(|s| s.nick.clone())
            .unwrap_or_default()
    }

    /// Queue a line for one session. Silently dropped when the session is
    /// gone; writes are best-effort.
    pub fn send_to(&self, id: SessionId, line: impl Into<String>) {
        if let Some(session) = self.sessions.get(&id) {
            session.send(line);
        }
    }

    /// Queue a line for every member of a channel, optionally excluding one
    /// session (usually the actor).
    pub fn broadcast(&self, channel: &str, line: &str, exclude: Option<SessionId>) {
        if let Some(chan) = self.channels.get(channel) {
            for id in chan.member_ids() {
                if exclude == Some(id) {
                    continue;
                }
                self.send_to(id, line);
            }
        }
    }

    /// Remove a session from every registry: the session map, the nickname
    /// index, and the membership (and therefore operator) set of every
    /// channel.
    pub fn remove_session(&mut self, id: SessionId) -> Option<Session> {
        let session = self.sessions.remove(&id)?;

        if let Some(nick) = &session.nick {
            if self.nicks.get(nick) == Some(&id) {
                self.nicks.remove(nick);
            }
        }

        for channel in self.channels.values_mut() {
            channel.remove_member(id);
        }

        Some(session)
    }
}

/// Shared server core: the configured password plus the mutex-guarded
/// registry and the session id generator.
pub struct Core {
    password: String,
    state: Mutex<ServerState>,
    next_id: AtomicU64,
}

impl Core {
    pub fn new(password: String) -> Self {
        Self {
            password,
            state: Mutex::new(ServerState::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// The server password PASS is checked against.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Lock the registry for one event's worth of reads and mutations.
    pub fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock()
    }

    /// Create a session for a freshly accepted connection and register it.
    pub fn attach(&self, addr: SocketAddr, sender: mpsc::UnboundedSender<String>) -> SessionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Session::new(id, addr, sender);
        self.lock().sessions.insert(id, session);
        id
    }

    /// Tear down a session on disconnect or QUIT.
    pub fn detach(&self, id: SessionId) {
        if let Some(session) = self.lock().remove_session(id) {
            debug!(id, nick = session.nick.as_deref().unwrap_or("*"), "Session removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attach_session(core: &Core) -> (SessionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = core.attach("127.0.0.1:50000".parse().unwrap(), tx);
        (id, rx)
    }

    #[test]
    fn attach_assigns_unique_ids() {
        let core = Core::new("pw".into());
        let (a, _rx_a) = attach_session(&core);
        let (b, _rx_b) = attach_session(&core);
        assert_ne!(a, b);
        assert_eq!(core.lock().sessions.len(), 2);
    }

    #[test]
    fn remove_session_clears_nick_and_memberships() {
        let core = Core::new("pw".into());
        let (id, _rx) = attach_session(&core);

        {
            let mut state = core.lock();
            if let Some(session) = state.sessions.get_mut(&id) {
                session.nick = Some("alice".into());
            }
            state.nicks.insert("alice".into(), id);

            let mut channel = Channel::new("#lobby".into());
            channel.add_member(id, MemberModes { op: true });
            state.channels.insert("#lobby".into(), channel);
        }

        core.detach(id);

        let state = core.lock();
        assert!(state.sessions.is_empty());
        assert_eq!(state.resolve_nick("alice"), None);
        let channel = state.channels.get("#lobby").unwrap();
        assert!(!channel.is_member(id));
        assert!(!channel.is_op(id));
    }

    #[test]
    fn empty_channel_keeps_mode_state() {
        let core = Core::new("pw".into());
        let (id, _rx) = attach_session(&core);

        {
            let mut state = core.lock();
            let mut channel = Channel::new("#keep".into());
            channel.add_member(id, MemberModes { op: true });
            channel.modes.key = Some("sesame".into());
            channel.modes.invite_only = true;
            state.channels.insert("#keep".into(), channel);
        }

        core.detach(id);

        let state = core.lock();
        let channel = state.channels.get("#keep").unwrap();
        assert_eq!(channel.member_count(), 0);
        assert_eq!(channel.modes.key.as_deref(), Some("sesame"));
        assert!(channel.modes.invite_only);
    }

    #[test]
    fn broadcast_respects_exclusion() {
        let core = Core::new("pw".into());
        let (a, mut rx_a) = attach_session(&core);
        let (b, mut rx_b) = attach_session(&core);

        {
            let mut state = core.lock();
            let mut channel = Channel::new("#lobby".into());
            channel.add_member(a, MemberModes::default());
            channel.add_member(b, MemberModes::default());
            state.channels.insert("#lobby".into(), channel);
            state.broadcast("#lobby", "hello", Some(a));
        }

        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().unwrap(), "hello");
    }
}
