//! Applies [`LifetimeEvent`]s to the Store.
//!
//! The Front applies the events each feed returns before replying, and a
//! task fed by the Tracker's sink applies them again. Eviction is idempotent:
//! a redelivered event finds nothing to remove and publishes nothing.

use crate::clients::StoreClient;
use crate::error::RegistryError;
use crate::model::{Binding, FreeReason, LifetimeEvent, RegistryEvent};
use crate::service::publish;
use crate::store::EvictScope;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct Evictor {
    store: StoreClient,
    events: broadcast::Sender<RegistryEvent>,
}

impl Evictor {
    pub fn new(store: StoreClient, events: broadcast::Sender<RegistryEvent>) -> Self {
        Self { store, events }
    }

    /// Evicts whatever `event` makes stale and publishes `NameFreed` for each
    /// removed binding.
    ///
    /// - `ActorUnreachable` only touches Owned bindings no newer than the one
    ///   it names.
    /// - `ActorDied` touches any binding of the actor.
    pub async fn apply(&self, event: LifetimeEvent) -> Result<Vec<Binding>, RegistryError> {
        let (scope, reason) = match event {
            LifetimeEvent::ActorUnreachable { binding: None, .. } => return Ok(Vec::new()),
            LifetimeEvent::ActorUnreachable { binding: Some(through), .. } => {
                (EvictScope::OwnedThrough(through), FreeReason::OwnerExited)
            }
            LifetimeEvent::ActorDied(_) => (EvictScope::Any, FreeReason::ActorDied),
        };

        let evicted = self.store.evict_actor(event.actor_id(), scope).await?;
        if evicted.is_empty() {
            debug!(?event, "Nothing to evict");
        }
        for binding in &evicted {
            info!(namespace = %binding.namespace, name = %binding.name, actor_id = %binding.actor_id, ?reason, "Name freed");
            publish(
                &self.events,
                RegistryEvent::NameFreed {
                    namespace: binding.namespace.clone(),
                    name: binding.name.clone(),
                    actor_id: binding.actor_id,
                    binding: binding.id,
                    reason,
                },
            );
        }
        Ok(evicted)
    }

    /// Consumes lifetime events until the Tracker drops its sink.
    pub async fn run(self, mut lifetime: mpsc::UnboundedReceiver<LifetimeEvent>) {
        info!("Evictor started");
        while let Some(event) = lifetime.recv().await {
            if let Err(e) = self.apply(event).await {
                warn!(?event, error = %e, "Eviction failed");
            }
        }
        info!("Evictor stopped");
    }
}
