//! # Generic Actor Server
//!
//! [`ActorRunner`] is the "server" half of every component in the registry. It
//! owns a piece of state plus the receiving end of a bounded channel and
//! processes requests strictly one at a time. That loop is the serialization
//! point: no `Mutex` guards the state because nothing else can reach it.
//!
//! # Usage Pattern
//!
//! 1. **Create**: `ActorRunner::new(state, buffer)` returns the runner and an
//!    [`ActorHandle`].
//! 2. **Wire**: pass dependencies into `runner.run(context)`.
//! 3. **Run**: spawn the returned future on Tokio.
//!
//! ```rust
//! use async_trait::async_trait;
//! use named_actor_registry::framework::{Actor, ActorRunner, Response};
//!
//! #[derive(Debug)]
//! enum CounterRequest {
//!     Bump { respond_to: Response<u64> },
//! }
//!
//! #[derive(Default)]
//! struct Counter(u64);
//!
//! #[async_trait]
//! impl Actor for Counter {
//!     type Request = CounterRequest;
//!     type Context = ();
//!     const NAME: &'static str = "Counter";
//!
//!     async fn handle(&mut self, request: CounterRequest, _ctx: &()) {
//!         match request {
//!             CounterRequest::Bump { respond_to } => {
//!                 self.0 += 1;
//!                 let _ = respond_to.send(self.0);
//!             }
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (runner, handle) = ActorRunner::new(Counter::default(), 8);
//!     tokio::spawn(runner.run(()));
//!     let n = handle.ask(|respond_to| CounterRequest::Bump { respond_to }).await.unwrap();
//!     assert_eq!(n, 1);
//! }
//! ```

use crate::framework::client::ActorHandle;
use async_trait::async_trait;
use std::fmt::Debug;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// State that can be driven by an [`ActorRunner`].
///
/// # Context Injection
/// `Context` holds dependencies that only exist once the surrounding system is
/// wired (for example the channel the tracker publishes lifetime events on).
/// It is handed to `run()` rather than to the constructor.
#[async_trait]
pub trait Actor: Send + 'static {
    /// The request enum accepted by this actor.
    type Request: Send + Debug + 'static;

    /// Dependencies injected at `run()` time. Use `()` when there are none.
    type Context: Send + Sync + 'static;

    /// Short name used in log fields.
    const NAME: &'static str;

    /// Handles one request. Replies travel through the request's own
    /// `respond_to` channel, so this never returns a value.
    async fn handle(&mut self, request: Self::Request, ctx: &Self::Context);

    /// Number of entries held, reported at shutdown.
    fn size(&self) -> usize {
        0
    }
}

/// Runs an [`Actor`]'s event loop.
pub struct ActorRunner<A: Actor> {
    receiver: mpsc::Receiver<A::Request>,
    state: A,
}

impl<A: Actor> ActorRunner<A> {
    /// Creates the runner and its handle.
    ///
    /// `buffer_size` is the mailbox capacity; callers wait for space when it
    /// is full.
    pub fn new(state: A, buffer_size: usize) -> (Self, ActorHandle<A::Request>) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        (Self { receiver, state }, ActorHandle::new(sender))
    }

    /// Processes requests until every handle has been dropped, then returns
    /// the final state.
    pub async fn run(mut self, context: A::Context) -> A {
        let actor = A::NAME;
        info!(actor, "Actor started");

        while let Some(request) = self.receiver.recv().await {
            debug!(actor, ?request, "Request");
            self.state.handle(request, &context).await;
        }

        info!(actor, size = self.state.size(), "Shutdown");
        self.state
    }
}
