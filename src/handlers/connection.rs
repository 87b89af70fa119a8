//! Registration handlers: PASS, NICK, USER, QUIT.

use async_trait::async_trait;
use picoirc_proto::Request;
use tracing::debug;

use crate::error::{HandlerError, HandlerResult};
use crate::state::RegistrationPhase;

use super::{Context, Handler};

/// `PASS <secret>` — authenticate against the server password.
pub struct PassHandler;

#[async_trait]
impl Handler for PassHandler {
    fn required_phase(&self) -> RegistrationPhase {
        RegistrationPhase::Unregistered
    }

    async fn handle(&self, ctx: &mut Context<'_>, req: &Request<'_>) -> HandlerResult {
        let mut state = ctx.core.lock();

        if req.arg(1).is_some() {
            state.send_to(ctx.id, "Multiple passwords were given!");
            return Ok(());
        }

        let Some(session) = state.sessions.get_mut(&ctx.id) else {
            return Err(HandlerError::SessionGone);
        };

        if session.authenticated {
            state.send_to(ctx.id, "You are already authenticated");
            return Ok(());
        }

        // A missing argument is just a wrong password; the client stays
        // connected and may retry.
        if req.arg(0) != Some(ctx.core.password()) {
            state.send_to(ctx.id, "Wrong password");
            return Ok(());
        }

        session.authenticated = true;
        debug!(id = ctx.id, "Session authenticated");
        state.send_to(ctx.id, "Welcome to IRC server!");
        Ok(())
    }
}

/// `NICK <name>` — set or change the nickname.
pub struct NickHandler;

#[async_trait]
impl Handler for NickHandler {
    fn required_phase(&self) -> RegistrationPhase {
        RegistrationPhase::Unregistered
    }

    async fn handle(&self, ctx: &mut Context<'_>, req: &Request<'_>) -> HandlerResult {
        let mut state = ctx.core.lock();

        let Some(nick) = req.arg(0) else {
            state.send_to(ctx.id, "Invalid nickname");
            return Ok(());
        };

        // Exact-match uniqueness; re-asserting one's own nick is fine.
        if state.resolve_nick(nick).is_some_and(|held_by| held_by != ctx.id) {
            state.send_to(ctx.id, "Nickname is already taken");
            return Ok(());
        }

        let nick = nick.to_string();
        let Some(session) = state.sessions.get_mut(&ctx.id) else {
            return Err(HandlerError::SessionGone);
        };
        let previous = session.nick.replace(nick.clone());

        if let Some(old) = previous {
            if state.nicks.get(&old) == Some(&ctx.id) {
                state.nicks.remove(&old);
            }
        }
        state.nicks.insert(nick.clone(), ctx.id);

        state.send_to(ctx.id, format!("Nickname set to {nick}"));
        Ok(())
    }
}

/// `USER <username> <hostname> <servername> :<realname>` — set the username.
///
/// Only the username is retained; the remaining fields are validated for
/// presence and discarded.
pub struct UserHandler;

#[async_trait]
impl Handler for UserHandler {
    fn required_phase(&self) -> RegistrationPhase {
        RegistrationPhase::Unregistered
    }

    async fn handle(&self, ctx: &mut Context<'_>, req: &Request<'_>) -> HandlerResult {
        let mut state = ctx.core.lock();

        let Some(username) = req.arg(0) else {
            state.send_to(ctx.id, "Invalid username");
            return Ok(());
        };

        if req.arg(1).is_none() || req.arg(2).is_none() {
            state.send_to(ctx.id, "Invalid USER command format");
            return Ok(());
        }
        let _realname = req.trailing(3);

        let username = username.to_string();
        let Some(session) = state.sessions.get_mut(&ctx.id) else {
            return Err(HandlerError::SessionGone);
        };
        session.username = Some(username.clone());

        state.send_to(ctx.id, format!("User information set. Welcome {username}!"));
        Ok(())
    }
}

/// `QUIT` — disconnect. Teardown happens in the connection task.
pub struct QuitHandler;

#[async_trait]
impl Handler for QuitHandler {
    fn required_phase(&self) -> RegistrationPhase {
        RegistrationPhase::Unregistered
    }

    async fn handle(&self, _ctx: &mut Context<'_>, _req: &Request<'_>) -> HandlerResult {
        Err(HandlerError::Quit)
    }
}
