//! # Generic Handle
//!
//! The client half of an actor: a cloneable sender plus the request/response
//! round-trip every typed client builds on.

use crate::framework::error::FrameworkError;
use tokio::sync::{mpsc, oneshot};

/// One-shot reply channel carried inside each request.
pub type Response<T> = oneshot::Sender<T>;

/// A cloneable, type-safe sender for an actor's requests.
///
/// Cloning only clones the underlying `mpsc::Sender`. The actor keeps running
/// until every handle has been dropped.
pub struct ActorHandle<M> {
    sender: mpsc::Sender<M>,
}

impl<M> Clone for ActorHandle<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<M: Send + 'static> ActorHandle<M> {
    pub fn new(sender: mpsc::Sender<M>) -> Self {
        Self { sender }
    }

    /// Sends a request built around a fresh reply channel and waits for the answer.
    ///
    /// ```rust,ignore
    /// let binding = handle
    ///     .ask(|respond_to| StoreRequest::Resolve { namespace, name, respond_to })
    ///     .await?;
    /// ```
    pub async fn ask<T>(
        &self,
        build: impl FnOnce(Response<T>) -> M,
    ) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }

    /// Returns true once the actor task has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
