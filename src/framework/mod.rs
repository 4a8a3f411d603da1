//! Actor plumbing shared by the Store, the Tracker and the Front.
//!
//! # Main Components
//!
//! - [`Actor`] - Trait implemented by every stateful component
//! - [`ActorRunner`] - Sequential event loop that owns the state
//! - [`ActorHandle`] - Cloneable, type-safe sender with request/response round-trips
//! - [`FrameworkError`] - Transport failures (closed mailbox, dropped reply)
//!
//! # Testing
//!
//! See the [`mock`] module for handles that are answered by the test itself.

pub mod actor;
pub mod client;
pub mod error;
pub mod mock;

pub use actor::{Actor, ActorRunner};
pub use client::{ActorHandle, Response};
pub use error::FrameworkError;
