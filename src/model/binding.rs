//! Bindings and lifetime modes.

use crate::model::{ActorId, ActorName, JobId, Namespace};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::SystemTime;

/// Sequence number assigned by the Store when a binding commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BindingId(pub u64);

impl Display for BindingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "binding_{}", self.0)
    }
}

/// Whether an actor's existence is tied to the job that created it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifetimeMode {
    /// Destroyed when the creating job ends or no handles remain.
    #[default]
    Owned,
    /// Persists after the creating job exits, until explicitly removed.
    Detached,
}

impl Display for LifetimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifetimeMode::Owned => f.write_str("owned"),
            LifetimeMode::Detached => f.write_str("detached"),
        }
    }
}

/// An immutable record mapping a namespaced name to an actor.
///
/// Bindings are never mutated. Renaming is Remove + Register, which commits a
/// new record with a fresh [`BindingId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub id: BindingId,
    pub namespace: Namespace,
    pub name: ActorName,
    pub actor_id: ActorId,
    pub lifetime: LifetimeMode,
    pub creating_job: JobId,
    pub created_at: SystemTime,
}

/// Everything the caller supplies for a Register; the Store adds the id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRequest {
    pub namespace: Namespace,
    pub name: ActorName,
    pub actor_id: ActorId,
    pub lifetime: LifetimeMode,
    pub creating_job: JobId,
}

impl BindingRequest {
    pub(crate) fn commit(self, id: BindingId) -> Binding {
        Binding {
            id,
            namespace: self.namespace,
            name: self.name,
            actor_id: self.actor_id,
            lifetime: self.lifetime,
            creating_job: self.creating_job,
            created_at: SystemTime::now(),
        }
    }
}

/// Outcome of a get-if-exists registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// No binding existed; this one was committed.
    Created(Binding),
    /// A live binding already held the name; it is returned untouched.
    Existing(Binding),
}

impl Registration {
    pub fn binding(&self) -> &Binding {
        match self {
            Registration::Created(binding) | Registration::Existing(binding) => binding,
        }
    }

    pub fn actor_id(&self) -> ActorId {
        self.binding().actor_id
    }
}
