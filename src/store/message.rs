//! Requests accepted by the Name Registry Store.

use crate::error::RegistryError;
use crate::framework::Response;
use crate::model::{ActorId, ActorName, Binding, BindingId, BindingRequest, Namespace, Registration};

/// Which bindings an eviction may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictScope {
    /// Only an Owned binding committed no later than the given one. Detached
    /// bindings and newer bindings survive.
    OwnedThrough(BindingId),
    /// Any binding of the actor.
    Any,
}

/// Every request is answered through its own `respond_to` channel.
#[derive(Debug)]
pub enum StoreRequest {
    Register {
        request: BindingRequest,
        respond_to: Response<Result<Binding, RegistryError>>,
    },
    RegisterOrResolve {
        request: BindingRequest,
        respond_to: Response<Result<Registration, RegistryError>>,
    },
    Resolve {
        namespace: Namespace,
        name: ActorName,
        respond_to: Response<Result<Binding, RegistryError>>,
    },
    Remove {
        namespace: Namespace,
        name: ActorName,
        respond_to: Response<Result<Binding, RegistryError>>,
    },
    ListNames {
        namespace: Namespace,
        respond_to: Response<Vec<ActorName>>,
    },
    ListAll {
        respond_to: Response<Vec<(Namespace, ActorName)>>,
    },
    BindingOf {
        actor_id: ActorId,
        respond_to: Response<Option<Binding>>,
    },
    EvictActor {
        actor_id: ActorId,
        scope: EvictScope,
        respond_to: Response<Vec<Binding>>,
    },
}
