//! Error types for registry operations.
//!
//! The Store and the Front share [`RegistryError`], so Store outcomes reach
//! the caller verbatim.

use crate::framework::FrameworkError;
use crate::model::{ActorId, ActorName, Namespace};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The name is already bound in this namespace. Recoverable: remove the
    /// old binding first or pick another name.
    #[error("Name '{name}' already exists in namespace '{namespace}' (bound to {existing})")]
    AlreadyExists {
        namespace: Namespace,
        name: ActorName,
        existing: ActorId,
    },

    /// No live binding for the key. A normal outcome, not a failure.
    #[error("Name '{name}' not found in namespace '{namespace}'")]
    NotFound { namespace: Namespace, name: ActorName },

    /// The actor already holds a name; it must be removed before renaming.
    #[error("Actor {actor_id} is already named '{name}' in namespace '{namespace}'")]
    ActorAlreadyNamed {
        actor_id: ActorId,
        namespace: Namespace,
        name: ActorName,
    },

    /// A lookup crossed a namespace boundary. This is a defect, never an
    /// expected outcome.
    #[error("Namespace mismatch: requested '{requested}', binding lives in '{found}'")]
    NamespaceMismatch { requested: Namespace, found: Namespace },

    /// The caller supplied an unusable name.
    #[error("Invalid actor name: {0}")]
    InvalidName(String),

    /// The registry could not be reached. Retryable.
    #[error("Registry unavailable: {0}")]
    Unavailable(String),
}

impl RegistryError {
    /// True when retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RegistryError::Unavailable(_))
    }
}

impl From<FrameworkError> for RegistryError {
    fn from(e: FrameworkError) -> Self {
        RegistryError::Unavailable(e.to_string())
    }
}
