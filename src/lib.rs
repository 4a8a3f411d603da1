//! # Named Actor Registry
//!
//! > **Find long-lived actors by name, scoped to a namespace.**
//!
//! Actors are registered under a `(namespace, name)` key and resolved back to
//! their [`ActorId`](model::ActorId) from any job. Each binding carries a
//! [`LifetimeMode`](model::LifetimeMode): an **Owned** binding goes away when
//! its creating job ends, a **Detached** one outlives it until it is removed
//! or the actor dies.
//!
//! ## Design
//!
//! Every piece of state is owned by one actor running in its own Tokio task
//! and is reached only through a typed client. There are no locks.
//!
//! - The **Store** is the single sequencer for bindings: register, resolve
//!   and remove are linearizable, and a name is never overwritten.
//! - The **Lifetime Tracker** watches ownership, handles and job
//!   termination and decides when an actor is unreachable. It never touches
//!   the Store; it emits [`LifetimeEvent`](model::LifetimeEvent)s.
//! - The **Evictor** applies those events to the Store and publishes
//!   [`RegistryEvent::NameFreed`](model::RegistryEvent). The Front runs it
//!   before a feed returns, so evictions are visible to the next resolve.
//! - The **Front** ([`RegistryService`](service::RegistryService)) resolves
//!   the caller's namespace, validates names and composes the above.
//!
//! Dependencies are injected at `run()` time rather than construction, so
//! the Tracker's event sink is wired only once the Evictor exists.
//!
//! ## Module Tour
//!
//! - [`framework`] - the actor loop, typed handles and test mocks
//! - [`model`] - identifiers, bindings and events
//! - [`namespace`] - effective-namespace resolution
//! - [`store`] - the binding table actor
//! - [`tracker`] - the lifetime tracker actor
//! - [`clients`] - typed clients for both actors
//! - [`service`] - the Front and the Evictor
//! - [`config`] - [`RegistryConfig`](config::RegistryConfig)
//! - [`lifecycle`] - [`RegistrySystem`](lifecycle::RegistrySystem) and tracing setup
//!
//! ## Quick Start
//!
//! ```rust
//! use named_actor_registry::config::RegistryConfig;
//! use named_actor_registry::lifecycle::RegistrySystem;
//! use named_actor_registry::model::{ActorId, LifetimeMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let system = RegistrySystem::new(RegistryConfig::default());
//!     let colors = system.service.for_job(system.service.job(), Some("colors"));
//!
//!     colors.register(None, "orange", ActorId(0xa1), LifetimeMode::Detached).await?;
//!     assert_eq!(colors.resolve(None, "orange").await?, ActorId(0xa1));
//!     assert!(colors.resolve(Some("fruit"), "orange").await.is_err());
//!
//!     drop(colors);
//!     system.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! Run the demo with `RUST_LOG=info cargo run`.

pub mod clients;
pub mod config;
pub mod error;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod namespace;
pub mod service;
pub mod store;
pub mod tracker;

pub use error::RegistryError;
