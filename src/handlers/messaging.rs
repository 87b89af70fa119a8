//! Messaging handlers: PRIVMSG.

use async_trait::async_trait;
use picoirc_proto::Request;

use crate::error::HandlerResult;

use super::{Context, Handler};

/// `PRIVMSG <target> <text>` — deliver text to a channel or a nickname.
pub struct PrivmsgHandler;

#[async_trait]
impl Handler for PrivmsgHandler {
    async fn handle(&self, ctx: &mut Context<'_>, req: &Request<'_>) -> HandlerResult {
        let state = ctx.core.lock();

        let (Some(target), Some(text)) = (req.arg(0), req.trailing(1)) else {
            state.send_to(ctx.id, "No message to send");
            return Ok(());
        };

        let nick = state.nick_of(ctx.id);

        if target.starts_with('#') {
            // Membership gates channel delivery; a missing channel reads the
            // same as not being in it.
            let is_member = state
                .channels
                .get(target)
                .is_some_and(|chan| chan.is_member(ctx.id));
            if !is_member {
                state.send_to(ctx.id, format!("You are not in the channel: {target}"));
                return Ok(());
            }

            state.broadcast(target, &format!("{nick}: {text}"), Some(ctx.id));
            state.send_to(ctx.id, format!("You: {text}"));
        } else {
            match state.resolve_nick(target) {
                Some(peer) => state.send_to(peer, format!("{nick} (private): {text}")),
                None => state.send_to(ctx.id, format!("No such user: {target}")),
            }
        }
        Ok(())
    }
}
