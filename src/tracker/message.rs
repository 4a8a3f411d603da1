//! Requests accepted by the Lifetime Tracker.
//!
//! Each one is acknowledged once the tracker has sequenced it. Feeds reply
//! with the [`LifetimeEvent`]s they caused, which are also published on the
//! sink.

use crate::framework::Response;
use crate::model::{ActorId, BindingId, JobId, LifetimeEvent, LifetimeMode};
use crate::tracker::ActorLiveness;

#[derive(Debug)]
pub enum TrackerRequest {
    ActorCreated {
        actor_id: ActorId,
        owner: JobId,
        lifetime: LifetimeMode,
        /// Set when the creation is reported because a binding was committed.
        binding: Option<BindingId>,
        respond_to: Response<Option<LifetimeEvent>>,
    },
    /// Replies with the handle count after the change.
    HandleAcquired {
        actor_id: ActorId,
        respond_to: Response<u32>,
    },
    HandleReleased {
        actor_id: ActorId,
        respond_to: Response<(u32, Option<LifetimeEvent>)>,
    },
    /// `binding` was explicitly removed.
    BindingReleased {
        actor_id: ActorId,
        binding: BindingId,
        respond_to: Response<Option<LifetimeEvent>>,
    },
    /// Replies with the events this termination caused (empty on repeats).
    JobTerminated {
        job: JobId,
        respond_to: Response<Vec<LifetimeEvent>>,
    },
    /// Replies `None` when the destruction was already known.
    ActorDestroyed {
        actor_id: ActorId,
        respond_to: Response<Option<LifetimeEvent>>,
    },
    Inspect {
        actor_id: ActorId,
        respond_to: Response<Option<ActorLiveness>>,
    },
}
