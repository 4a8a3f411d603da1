use crate::clients::{StoreClient, TrackerClient};
use crate::config::RegistryConfig;
use crate::service::{Evictor, RegistryService};
use crate::{store, tracker};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Runs the registry: the Store, the Lifetime Tracker and the Evictor, each in
/// its own task.
///
/// # Wiring
///
/// ```text
/// NameStore        <- StoreClient   (service, evictor)
/// LifetimeTracker  <- TrackerClient (service)
///        │ LifetimeSink
///        ▼
/// Evictor ──► NameFreed on the broadcast channel
/// ```
///
/// The Evictor holds a Store client but no Tracker client, so the chain
/// shuts down in one direction: Tracker stops, its sink drops, the Evictor
/// drains and stops, and the last Store client goes with it.
///
/// # Example
///
/// ```ignore
/// let system = RegistrySystem::new(RegistryConfig::default());
/// system.service.register(None, "orange", ActorId(1), LifetimeMode::Detached).await?;
/// system.shutdown().await?;
/// ```
pub struct RegistrySystem {
    /// Front for the configured job and namespace. Clone it, or call
    /// [`RegistryService::for_job`] for other jobs.
    pub service: RegistryService,

    /// Direct Store access for diagnostics.
    pub store: StoreClient,

    /// Direct Tracker access for diagnostics.
    pub tracker: TrackerClient,

    handles: Vec<JoinHandle<()>>,
}

impl RegistrySystem {
    /// Spawns every task and wires them. Must be called inside a Tokio
    /// runtime.
    pub fn new(config: RegistryConfig) -> Self {
        let (store_actor, store) = store::new(config.store_buffer);
        let (tracker_actor, tracker) = tracker::new(config.tracker_buffer, config.tombstone_retention());
        let (sink, lifetime_events) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(config.event_capacity);

        let store_handle = tokio::spawn(async move {
            store_actor.run(()).await;
        });
        // The Tracker's context is the sink feeding the Evictor.
        let tracker_handle = tokio::spawn(async move {
            tracker_actor.run(sink).await;
        });
        let evictor = Evictor::new(store.clone(), events.clone());
        let evictor_handle = tokio::spawn(evictor.run(lifetime_events));

        let service = RegistryService::new(
            config.job,
            config.namespace_context(),
            store.clone(),
            tracker.clone(),
            events,
        );
        info!(job = %config.job, namespace = %service.namespace(), "Registry started");

        Self {
            service,
            store,
            tracker,
            handles: vec![tracker_handle, evictor_handle, store_handle],
        }
    }

    /// Drops the system's clients and waits for every task to exit.
    ///
    /// Clones of the service or clients held elsewhere keep their actors
    /// alive; drop them first or this waits on them.
    ///
    /// Returns `Err` if any task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down registry...");

        drop(self.service);
        drop(self.tracker);
        drop(self.store);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Registry task failed: {:?}", e);
                return Err(format!("Registry task failed: {:?}", e));
            }
        }

        info!("Registry shutdown complete.");
        Ok(())
    }
}
