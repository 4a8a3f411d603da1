//! # Registry Service Front
//!
//! Composes the Namespace Resolver, the Store and the Tracker.
//!
//! ```text
//! caller ──► RegistryService ──► StoreClient ──► NameStore (sequencer)
//!                 │                                   ▲
//!                 └──► TrackerClient ──► LifetimeTracker
//!                                             │ LifetimeEvent
//!                                             ▼
//!                                          Evictor ──► NameFreed
//! ```
//!
//! Per binding: `Unbound -> Bound -> {Removed, AutoFreed}`. Both end states
//! are terminal; a later Register commits a new binding with a new id.

pub mod evictor;
pub mod front;

pub use evictor::*;
pub use front::*;

use crate::model::RegistryEvent;
use tokio::sync::broadcast;
use tracing::trace;

/// Broadcasts an event; having no subscribers is fine.
pub(crate) fn publish(events: &broadcast::Sender<RegistryEvent>, event: RegistryEvent) {
    if events.send(event).is_err() {
        trace!("No event subscribers");
    }
}
