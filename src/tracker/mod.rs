//! # Actor Lifetime Tracker
//!
//! Keeps, per actor, a handle count, the owning job and the lifetime mode, and
//! turns collaborator feeds (actor created, handle acquired/released, job
//! terminated, actor destroyed) into [`LifetimeEvent`](crate::model::LifetimeEvent)s.
//!
//! The tracker never mutates the binding table. It only publishes events on
//! the [`LifetimeSink`] injected into `run()`; the Front's evictor applies
//! them to the Store. No lock spans both components.
//!
//! ## Rules
//!
//! - An **Owned** actor becomes unreachable when its job terminates, or when
//!   its last handle is released while it holds no name.
//! - A **Detached** actor is never reported unreachable. Only its destruction
//!   (`ActorDied`) or an explicit Remove frees its name.
//! - A registration that reaches the tracker after its Owned job already
//!   terminated is unreachable at once, through the same cleanup path.
//! - Every feed is idempotent: repeated terminations and destructions are
//!   no-ops.
//! - An unreachable event names the newest binding seen for the actor. A
//!   release of an older binding (the tail of a rename) is ignored.
//!
//! ## Retention
//!
//! Terminated jobs and destroyed actors are remembered for a fixed window
//! ([`DEFAULT_RETENTION`] unless configured). The late-registration rules
//! above only hold within it.

pub mod liveness;
pub mod message;
pub mod tombstones;

pub use liveness::*;
pub use message::*;
pub use tombstones::*;

use crate::clients::TrackerClient;
use crate::framework::ActorRunner;
use std::time::Duration;

/// Creates the Tracker actor and its client.
pub fn new(buffer_size: usize, retention: Duration) -> (ActorRunner<LifetimeTracker>, TrackerClient) {
    let (actor, handle) = ActorRunner::new(LifetimeTracker::with_retention(retention), buffer_size);
    (actor, TrackerClient::new(handle))
}
