//! Wire protocol support for picoircd.
//!
//! The protocol is plain newline-delimited text: one line is one command,
//! a command is a verb followed by whitespace-separated arguments, and some
//! commands treat the remainder of the line as free text. This crate provides
//! the two pieces every transport needs:
//!
//! - [`LineCodec`], a tokio codec that reassembles complete lines out of the
//!   raw byte stream, buffering partial reads between wake-ups.
//! - [`Request`], a borrowed view over one complete line with accessors for
//!   the verb, positional arguments, and the trailing free-text remainder.

pub mod error;
pub mod line;
pub mod request;

pub use error::ProtocolError;
pub use line::LineCodec;
pub use request::Request;
