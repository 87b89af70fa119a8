//! Channel handlers: JOIN, MODE, KICK, INVITE, TOPIC.

use async_trait::async_trait;
use picoirc_proto::Request;
use tracing::debug;

use crate::error::HandlerResult;
use crate::state::{Channel, MemberModes, Topic};

use super::{Context, Handler};

/// `JOIN <#channel> [key]` — join a channel, creating it on first join.
pub struct JoinHandler;

#[async_trait]
impl Handler for JoinHandler {
    async fn handle(&self, ctx: &mut Context<'_>, req: &Request<'_>) -> HandlerResult {
        let mut state = ctx.core.lock();

        let Some(name) = req.arg(0).filter(|n| n.starts_with('#')) else {
            state.send_to(ctx.id, "Invalid channel name");
            return Ok(());
        };

        let nick = state.nick_of(ctx.id);
        let is_new = !state.channels.contains_key(name);
        if is_new {
            state
                .channels
                .insert(name.to_string(), Channel::new(name.to_string()));
            debug!(channel = name, "Channel created");
        }

        if state.channels.get(name).is_some_and(|c| c.is_member(ctx.id)) {
            state.send_to(ctx.id, format!("Joined channel: {name}"));
            return Ok(());
        }

        if let Some(chan) = state.channels.get(name) {
            if chan.modes.invite_only {
                state.send_to(ctx.id, "Channel is invite-only");
                return Ok(());
            }
            if let Some(key) = &chan.modes.key {
                if req.arg(1) != Some(key.as_str()) {
                    state.send_to(ctx.id, "Incorrect channel key");
                    return Ok(());
                }
            }
            if chan.at_limit() {
                state.send_to(ctx.id, "Channel is full");
                return Ok(());
            }
        }

        if let Some(chan) = state.channels.get_mut(name) {
            chan.add_member(ctx.id, MemberModes { op: is_new });
        }

        // The creator becomes the channel's first operator.
        if is_new {
            state.send_to(ctx.id, format!("You are now an operator of channel: {name}"));
        }
        state.send_to(ctx.id, format!("Joined channel: {name}"));
        state.broadcast(name, &format!("{nick} has joined the channel"), Some(ctx.id));
        Ok(())
    }
}

/// `MODE <#channel> <±flags> [args…]` — toggle channel moderation modes.
///
/// Flags are scanned left to right; `+`/`-` flip the adding sense for the
/// rest of the string. `k`, `o`, and `l` consume positional arguments in
/// scan order. Limit errors abort the remainder of the line.
pub struct ModeHandler;

#[async_trait]
impl Handler for ModeHandler {
    async fn handle(&self, ctx: &mut Context<'_>, req: &Request<'_>) -> HandlerResult {
        let mut state = ctx.core.lock();

        let name = req.arg(0).unwrap_or("");
        if !state.channels.contains_key(name) {
            state.send_to(ctx.id, format!("No such channel: {name}"));
            return Ok(());
        }
        if !state.channels.get(name).is_some_and(|c| c.is_op(ctx.id)) {
            state.send_to(ctx.id, format!("You are not an operator of channel: {name}!"));
            return Ok(());
        }

        let nick = state.nick_of(ctx.id);
        let flags = req.arg(1).unwrap_or("");
        let mut adding = true;
        let mut next_arg = 2;

        for flag in flags.chars() {
            match flag {
                '+' => adding = true,
                '-' => adding = false,
                'i' => {
                    if let Some(chan) = state.channels.get_mut(name) {
                        chan.modes.invite_only = adding;
                    }
                    state.send_to(
                        ctx.id,
                        if adding {
                            "Channel is invite-only!"
                        } else {
                            "Channel is not invite-only!"
                        },
                    );
                }
                't' => {
                    if let Some(chan) = state.channels.get_mut(name) {
                        chan.modes.topic_restricted = adding;
                    }
                    state.send_to(
                        ctx.id,
                        if adding {
                            "Channel is topic-restricted!"
                        } else {
                            "Channel is not topic-restricted!"
                        },
                    );
                }
                'k' => {
                    if adding {
                        let key = req.arg(next_arg).map(String::from);
                        next_arg += 1;
                        if let Some(chan) = state.channels.get_mut(name) {
                            chan.modes.key = key;
                        }
                        state.send_to(ctx.id, "Channel password set!");
                    } else {
                        if let Some(chan) = state.channels.get_mut(name) {
                            chan.modes.key = None;
                        }
                        state.send_to(ctx.id, "No password for this channel!");
                    }
                }
                'o' => {
                    let target_nick = req.arg(next_arg).unwrap_or("");
                    next_arg += 1;

                    let Some(target) = state.resolve_nick(target_nick) else {
                        state.send_to(ctx.id, format!("No such user: {target_nick}"));
                        continue;
                    };
                    // Operator status only exists on members.
                    let applied = state
                        .channels
                        .get_mut(name)
                        .is_some_and(|c| c.set_op(target, adding));
                    if !applied {
                        state.send_to(ctx.id, format!("{target_nick} is not in channel {name}"));
                        continue;
                    }
                    let notice = if adding {
                        format!("{nick} added you as an operator of channel: {name}")
                    } else {
                        format!("{nick} removed you from the operators of channel: {name}")
                    };
                    state.send_to(target, notice);
                }
                'l' => {
                    if adding {
                        let Some(raw) = req.arg(next_arg) else {
                            state.send_to(ctx.id, "Error: No limit given.");
                            return Ok(());
                        };
                        next_arg += 1;

                        let limit = raw.parse::<u32>().unwrap_or(0);
                        if !(1..=100).contains(&limit) {
                            state.send_to(ctx.id, "Error: User limit not in range [1-100].");
                            return Ok(());
                        }
                        let member_count =
                            state.channels.get(name).map_or(0, |c| c.member_count());
                        if (limit as usize) < member_count {
                            state.send_to(
                                ctx.id,
                                "Error: User limit cannot be less than the current number of members.",
                            );
                            return Ok(());
                        }
                        if let Some(chan) = state.channels.get_mut(name) {
                            chan.modes.limit = Some(limit);
                        }
                        state.broadcast(
                            name,
                            &format!("User limit for channel {name} set to {limit}"),
                            Some(ctx.id),
                        );
                    } else {
                        if let Some(chan) = state.channels.get_mut(name) {
                            chan.modes.limit = None;
                        }
                        state.broadcast(
                            name,
                            &format!("User limit for channel {name} removed"),
                            Some(ctx.id),
                        );
                    }
                }
                other => {
                    state.send_to(ctx.id, format!("Unknown mode: {other}"));
                }
            }
        }
        Ok(())
    }
}

/// `KICK <#channel> <nickname>` — remove a member from a channel.
pub struct KickHandler;

#[async_trait]
impl Handler for KickHandler {
    async fn handle(&self, ctx: &mut Context<'_>, req: &Request<'_>) -> HandlerResult {
        let mut state = ctx.core.lock();

        let name = req.arg(0).unwrap_or("");
        if !state.channels.contains_key(name) {
            state.send_to(ctx.id, format!("No such channel: {name}"));
            return Ok(());
        }
        if !state.channels.get(name).is_some_and(|c| c.is_op(ctx.id)) {
            state.send_to(ctx.id, "You are not an operator in this channel.");
            return Ok(());
        }

        let target_nick = req.arg(1).unwrap_or("");
        let Some(target) = state.resolve_nick(target_nick) else {
            state.send_to(ctx.id, format!("No such user: {target_nick}"));
            return Ok(());
        };
        if !state.channels.get(name).is_some_and(|c| c.is_member(target)) {
            state.send_to(ctx.id, format!("{target_nick} is not in channel {name}"));
            return Ok(());
        }
        if target == ctx.id {
            state.send_to(ctx.id, "You cannot remove yourself from operators list!");
            return Ok(());
        }

        let nick = state.nick_of(ctx.id);
        if let Some(chan) = state.channels.get_mut(name) {
            chan.remove_member(target);
        }
        state.broadcast(
            name,
            &format!("{target_nick} has been kicked by {nick}"),
            Some(ctx.id),
        );
        state.send_to(target, format!("You have been kicked from channel {name}"));
        Ok(())
    }
}

/// `INVITE <nickname> <#channel>` — invite a user to an invite-only channel.
///
/// An accepted invite grants membership directly; there is no pending
/// invite list.
pub struct InviteHandler;

#[async_trait]
impl Handler for InviteHandler {
    async fn handle(&self, ctx: &mut Context<'_>, req: &Request<'_>) -> HandlerResult {
        let mut state = ctx.core.lock();

        let target_nick = req.arg(0).unwrap_or("");
        let name = req.arg(1).unwrap_or("");

        if !state.channels.contains_key(name) {
            state.send_to(ctx.id, format!("No such channel: {name}"));
            return Ok(());
        }
        if state.channels.get(name).is_some_and(|c| c.at_limit()) {
            state.send_to(ctx.id, "Cannot invite anyone as channel is full");
            return Ok(());
        }
        if !state.channels.get(name).is_some_and(|c| c.is_op(ctx.id)) {
            state.send_to(ctx.id, "You are not an operator in this channel.");
            return Ok(());
        }
        let Some(target) = state.resolve_nick(target_nick) else {
            state.send_to(ctx.id, format!("No such user: {target_nick}"));
            return Ok(());
        };

        if !state.channels.get(name).is_some_and(|c| c.modes.invite_only) {
            state.send_to(ctx.id, format!("Channel {name} is not invite-only."));
            return Ok(());
        }

        let nick = state.nick_of(ctx.id);
        state.broadcast(
            name,
            &format!("{target_nick} has been invited to the channel by {nick}"),
            Some(ctx.id),
        );
        if let Some(chan) = state.channels.get_mut(name) {
            if !chan.is_member(target) {
                chan.add_member(target, MemberModes::default());
            }
        }
        state.send_to(
            target,
            format!("You have been invited to channel {name} by {nick}"),
        );
        Ok(())
    }
}

/// `TOPIC <#channel> [text]` — set the channel topic.
pub struct TopicHandler;

#[async_trait]
impl Handler for TopicHandler {
    async fn handle(&self, ctx: &mut Context<'_>, req: &Request<'_>) -> HandlerResult {
        let mut state = ctx.core.lock();

        let name = req.arg(0).unwrap_or("");
        if !state.channels.contains_key(name) {
            state.send_to(ctx.id, format!("No such channel: {name}"));
            return Ok(());
        }

        let restricted = state
            .channels
            .get(name)
            .is_some_and(|c| c.modes.topic_restricted);
        if restricted && !state.channels.get(name).is_some_and(|c| c.is_op(ctx.id)) {
            state.send_to(ctx.id, "You're not allowed to set the topic");
            return Ok(());
        }

        let nick = state.nick_of(ctx.id);
        let text = req.trailing(1).unwrap_or("").to_string();
        if let Some(chan) = state.channels.get_mut(name) {
            chan.topic = Some(Topic {
                text: text.clone(),
                set_by: nick,
                set_at: chrono::Utc::now().timestamp(),
            });
        }
        state.broadcast(
            name,
            &format!("Topic for channel {name} set to: {text}"),
            Some(ctx.id),
        );
        Ok(())
    }
}
