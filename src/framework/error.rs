//! # Framework Errors
//!
//! Transport-level failures shared by every actor in the registry. Domain
//! outcomes (`AlreadyExists`, `NotFound`, ...) never travel through this type;
//! they are part of each response payload.

/// Errors raised while talking to an actor task.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameworkError {
    /// The actor's mailbox is closed; its task has exited.
    #[error("Actor closed")]
    ActorClosed,
    /// The actor accepted the request but dropped the response channel.
    #[error("Actor dropped response channel")]
    ActorDropped,
}
