//! Server-side error types.

use thiserror::Error;

/// Errors surfaced by command handlers.
///
/// Protocol and authorization violations are not errors: they become reply
/// lines sent to the offending session and the handler returns `Ok`. Only
/// conditions that end the connection travel this way.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The client asked to disconnect (QUIT).
    #[error("client quit")]
    Quit,

    /// The session disappeared mid-command (disconnected concurrently).
    #[error("session is gone")]
    SessionGone,
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;
