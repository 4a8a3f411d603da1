//! # Mock Actors & Testing Guide
//!
//! Test doubles for any [`ActorHandle`]. They let the Registry Front be
//! exercised against a scripted Store or Tracker without spawning the real
//! actors.
//!
//! | Feature | Mock | Real Actor |
//! |---------|------|------------|
//! | **State** | None (scripted replies) | Real binding table / liveness |
//! | **Error Injection** | Easy (reply with any error) | Hard |
//! | **Use Case** | Logic *around* a client | The actor itself or the full system |
//!
//! ## Pattern 0: Raw Receiver
//!
//! [`create_mock_handle`] hands back the receiver so the test decides, request
//! by request, what to answer:
//!
//! ```rust
//! use named_actor_registry::framework::mock::{create_mock_handle, expect_next};
//! use named_actor_registry::framework::Response;
//!
//! #[derive(Debug)]
//! enum Ping { Ping { respond_to: Response<&'static str> } }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (handle, mut receiver) = create_mock_handle::<Ping>(4);
//!     let call = tokio::spawn(async move {
//!         handle.ask(|respond_to| Ping::Ping { respond_to }).await
//!     });
//!     match expect_next(&mut receiver).await {
//!         Some(Ping::Ping { respond_to }) => respond_to.send("pong").unwrap(),
//!         None => panic!("expected a request"),
//!     }
//!     assert_eq!(call.await.unwrap(), Ok("pong"));
//! }
//! ```
//!
//! ## Pattern 1: Scripted Responder
//!
//! [`MockActor`] answers every request with a closure and counts calls. See
//! `tests/front_with_mock_store.rs` for the Front tested this way.

use crate::framework::client::ActorHandle;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Creates a handle and the receiver that backs it.
///
/// Nothing answers requests on its own; the test pulls them off `receiver`.
pub fn create_mock_handle<M: Send + 'static>(
    buffer_size: usize,
) -> (ActorHandle<M>, mpsc::Receiver<M>) {
    let (sender, receiver) = mpsc::channel(buffer_size.max(1));
    (ActorHandle::new(sender), receiver)
}

/// Waits for the next request. `None` means every handle was dropped.
pub async fn expect_next<M>(receiver: &mut mpsc::Receiver<M>) -> Option<M> {
    receiver.recv().await
}

/// A mock actor that answers each request with a user-supplied closure.
///
/// # Example
/// ```ignore
/// let store = MockActor::new(|request| match request {
///     StoreRequest::Register { respond_to, .. } => {
///         let _ = respond_to.send(Err(RegistryError::Unavailable("down".into())));
///     }
///     other => panic!("unexpected {other:?}"),
/// });
/// let client = StoreClient::new(store.handle());
/// ```
pub struct MockActor<M> {
    handle: ActorHandle<M>,
    calls: Arc<AtomicUsize>,
    _task: tokio::task::JoinHandle<()>,
}

impl<M: Send + 'static> MockActor<M> {
    /// Spawns the responder task.
    pub fn new(mut respond: impl FnMut(M) + Send + 'static) -> Self {
        let (handle, mut receiver) = create_mock_handle::<M>(64);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let task = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                counter.fetch_add(1, Ordering::SeqCst);
                respond(request);
            }
        });

        Self {
            handle,
            calls,
            _task: task,
        }
    }

    /// Returns a handle for the code under test.
    pub fn handle(&self) -> ActorHandle<M> {
        self.handle.clone()
    }

    /// Number of requests answered so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{FrameworkError, Response};

    #[derive(Debug)]
    enum Echo {
        Say {
            text: String,
            respond_to: Response<String>,
        },
    }

    #[tokio::test]
    async fn test_mock_actor_counts_and_replies() {
        let mock = MockActor::new(|request: Echo| match request {
            Echo::Say { text, respond_to } => {
                let _ = respond_to.send(text.to_uppercase());
            }
        });
        let handle = mock.handle();

        let reply = handle
            .ask(|respond_to| Echo::Say {
                text: "hi".into(),
                respond_to,
            })
            .await
            .unwrap();

        assert_eq!(reply, "HI");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_dropped_reply_is_actor_dropped() {
        let (handle, mut receiver) = create_mock_handle::<Echo>(4);
        let call = tokio::spawn(async move {
            handle
                .ask(|respond_to| Echo::Say {
                    text: "lost".into(),
                    respond_to,
                })
                .await
        });

        // Take the request and drop it without answering.
        let request = expect_next(&mut receiver).await;
        assert!(request.is_some());
        drop(request);

        assert_eq!(call.await.unwrap(), Err(FrameworkError::ActorDropped));
    }

    #[tokio::test]
    async fn test_closed_mailbox_is_actor_closed() {
        let (handle, receiver) = create_mock_handle::<Echo>(4);
        drop(receiver);

        let result = handle
            .ask(|respond_to| Echo::Say {
                text: "nobody".into(),
                respond_to,
            })
            .await;

        assert_eq!(result, Err(FrameworkError::ActorClosed));
        assert!(handle.is_closed());
    }
}
