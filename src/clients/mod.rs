//! Type-safe wrappers around [`ActorHandle`](crate::framework::ActorHandle).

pub mod store_client;
pub mod tracker_client;

pub use store_client::*;
pub use tracker_client::*;
