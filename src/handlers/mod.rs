//! Command handlers.
//!
//! Incoming lines are dispatched through a [`Registry`] that maps the verb
//! (case-sensitive) to a handler. Each handler declares the minimum
//! registration phase it requires; the registry enforces that precondition
//! once, so individual handlers never repeat the gating checks.

mod channel;
mod connection;
mod messaging;

pub use channel::{InviteHandler, JoinHandler, KickHandler, ModeHandler, TopicHandler};
pub use connection::{NickHandler, PassHandler, QuitHandler, UserHandler};
pub use messaging::PrivmsgHandler;

use crate::error::{HandlerError, HandlerResult};
use crate::state::{Core, RegistrationPhase, SessionId};
use async_trait::async_trait;
use picoirc_proto::Request;
use std::collections::HashMap;
use std::sync::Arc;

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The issuing session.
    pub id: SessionId,
    /// Shared server state.
    pub core: &'a Arc<Core>,
}

/// Trait implemented by all command handlers.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Minimum registration phase required before `handle` runs.
    fn required_phase(&self) -> RegistrationPhase {
        RegistrationPhase::Registered
    }

    /// Handle one parsed request.
    async fn handle(&self, ctx: &mut Context<'_>, req: &Request<'_>) -> HandlerResult;
}

/// Registry of command handlers, keyed by verb.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Connection/registration handlers
        handlers.insert("PASS", Box::new(PassHandler));
        handlers.insert("NICK", Box::new(NickHandler));
        handlers.insert("USER", Box::new(UserHandler));
        handlers.insert("QUIT", Box::new(QuitHandler));

        // Channel handlers
        handlers.insert("JOIN", Box::new(JoinHandler));
        handlers.insert("MODE", Box::new(ModeHandler));
        handlers.insert("KICK", Box::new(KickHandler));
        handlers.insert("INVITE", Box::new(InviteHandler));
        handlers.insert("TOPIC", Box::new(TopicHandler));

        // Messaging handlers
        handlers.insert("PRIVMSG", Box::new(PrivmsgHandler));

        Self { handlers }
    }

    /// Dispatch a request to the matching handler, enforcing its
    /// registration precondition first.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, req: &Request<'_>) -> HandlerResult {
        let Some(handler) = self.handlers.get(req.verb()) else {
            ctx.core.lock().send_to(ctx.id, "Unknown command");
            return Ok(());
        };

        let phase = {
            let state = ctx.core.lock();
            let Some(session) = state.session(ctx.id) else {
                return Err(HandlerError::SessionGone);
            };
            session.phase()
        };

        if phase < handler.required_phase() {
            let line = if phase == RegistrationPhase::Unregistered {
                "You must authenticate first with PASS."
            } else {
                "You must set a name with USER and a nickname with NICK first."
            };
            ctx.core.lock().send_to(ctx.id, line);
            return Ok(());
        }

        handler.handle(ctx, req).await
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
