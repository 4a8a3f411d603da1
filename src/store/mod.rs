//! # Name Registry Store
//!
//! The authoritative mapping from `(namespace, name)` to actor identity.
//!
//! ## Structure
//!
//! - [`table`] - [`NameStore`], the binding table and its request handler
//! - [`message`] - [`StoreRequest`] and [`EvictScope`]
//! - [`new()`] - Factory that creates the actor and its [`StoreClient`]
//!
//! ## Guarantees
//!
//! - **Uniqueness**: at most one live binding per `(namespace, name)`.
//!   Register never overwrites; the loser of a race gets `AlreadyExists`.
//! - **Linearizable resolve**: reads go through the same sequential loop as
//!   writes, so they observe every write that completed before them.
//! - **Isolation**: namespaces partition the keyspace; there is no global
//!   fallback.
//! - **Single writer**: only this actor mutates the table. The Lifetime
//!   Tracker never touches it; evictions arrive as requests like any other.
//!
//! ## Usage
//!
//! ```rust
//! use named_actor_registry::model::{ActorId, ActorName, BindingRequest, JobId, LifetimeMode};
//! use named_actor_registry::namespace::NamespaceContext;
//! use named_actor_registry::store;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = store::new(32);
//!     tokio::spawn(actor.run(()));
//!
//!     let namespace = NamespaceContext::new("colors").effective(None);
//!     let name = ActorName::new("orange")?;
//!     client
//!         .register(BindingRequest {
//!             namespace: namespace.clone(),
//!             name: name.clone(),
//!             actor_id: ActorId(1),
//!             lifetime: LifetimeMode::Detached,
//!             creating_job: JobId(1),
//!         })
//!         .await?;
//!     assert_eq!(client.resolve(namespace, name).await?.actor_id, ActorId(1));
//!     Ok(())
//! }
//! ```

pub mod message;
pub mod table;

pub use message::*;
pub use table::*;

use crate::clients::StoreClient;
use crate::framework::ActorRunner;

/// Creates the Store actor and its client.
pub fn new(buffer_size: usize) -> (ActorRunner<NameStore>, StoreClient) {
    let (actor, handle) = ActorRunner::new(NameStore::new(), buffer_size);
    (actor, StoreClient::new(handle))
}
