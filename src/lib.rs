//! picoircd - a small IRC-subset chat server.
//!
//! The server speaks a plain-text, newline-delimited protocol over TCP:
//! password authentication (PASS), identity registration (NICK, USER),
//! channels with moderation modes (JOIN, MODE, KICK, INVITE, TOPIC), and
//! public/private messaging (PRIVMSG). The binary in `main.rs` is thin glue;
//! everything else is library code so integration tests can run the server
//! in-process.

pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod state;
