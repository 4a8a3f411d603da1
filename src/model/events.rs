//! Notifications flowing between components and out to subscribers.

use crate::model::{ActorId, ActorName, BindingId, Namespace};
use serde::{Deserialize, Serialize};

/// Why a binding went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreeReason {
    /// An explicit Remove.
    Removed,
    /// The actor was Owned and became unreachable (job ended or last handle dropped).
    OwnerExited,
    /// The actor itself was destroyed; applies to Detached bindings too.
    ActorDied,
}

/// Events published by the Registry Front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    NameBound {
        namespace: Namespace,
        name: ActorName,
        actor_id: ActorId,
        binding: BindingId,
    },
    NameFreed {
        namespace: Namespace,
        name: ActorName,
        actor_id: ActorId,
        binding: BindingId,
        reason: FreeReason,
    },
}

/// Liveness signals from the Lifetime Tracker to the Front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifetimeEvent {
    /// An Owned actor can no longer be reached. `binding` is the newest
    /// binding the tracker had seen for it; only Owned bindings up to that one
    /// are evicted, so a binding committed afterwards survives.
    ActorUnreachable {
        actor_id: ActorId,
        binding: Option<BindingId>,
    },
    /// The actor is gone for good; its binding is evicted whatever its mode.
    ActorDied(ActorId),
}

impl LifetimeEvent {
    pub fn actor_id(&self) -> ActorId {
        match self {
            LifetimeEvent::ActorUnreachable { actor_id, .. } | LifetimeEvent::ActorDied(actor_id) => {
                *actor_id
            }
        }
    }
}
