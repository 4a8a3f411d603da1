//! # Registry Service Front
//!
//! The entry point callers use. Each call resolves the caller's effective
//! namespace, validates the name, delegates to the Store and returns the
//! Store's outcome verbatim. Successful writes are reported to the Tracker and
//! published to subscribers.
//!
//! Collaborator feeds return only after the evictions they cause are
//! committed, so a resolve issued after `job_terminated` returns never sees
//! a binding that job's exit freed.

use crate::clients::{StoreClient, TrackerClient};
use crate::error::RegistryError;
use crate::model::{
    ActorId, ActorName, Binding, BindingRequest, FreeReason, JobId, LifetimeEvent, LifetimeMode,
    Namespace, Registration, RegistryEvent,
};
use crate::namespace::NamespaceContext;
use crate::service::{publish, Evictor};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// Cloneable front for one caller.
///
/// The caller's job and namespace context are part of the value. Use
/// [`RegistryService::for_job`] to get a view for another job sharing the
/// same Store and Tracker.
#[derive(Clone)]
pub struct RegistryService {
    job: JobId,
    namespaces: NamespaceContext,
    store: StoreClient,
    tracker: TrackerClient,
    evictor: Evictor,
    events: broadcast::Sender<RegistryEvent>,
}

impl RegistryService {
    pub fn new(
        job: JobId,
        namespaces: NamespaceContext,
        store: StoreClient,
        tracker: TrackerClient,
        events: broadcast::Sender<RegistryEvent>,
    ) -> Self {
        Self {
            job,
            namespaces,
            evictor: Evictor::new(store.clone(), events.clone()),
            store,
            tracker,
            events,
        }
    }

    /// A view for `job`, joined to `namespace` (or its anonymous namespace).
    pub fn for_job(&self, job: JobId, namespace: Option<&str>) -> Self {
        Self {
            job,
            namespaces: NamespaceContext::for_job(job, namespace),
            ..self.clone()
        }
    }

    pub fn job(&self) -> JobId {
        self.job
    }

    /// The namespace this caller joined.
    pub fn namespace(&self) -> &Namespace {
        self.namespaces.default_namespace()
    }

    /// Subscribes to `NameBound` / `NameFreed` events.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    /// Binds `name` to `actor_id`. Fails with `AlreadyExists` rather than
    /// overwriting, and with `ActorAlreadyNamed` if the actor holds a name.
    #[instrument(skip(self), fields(job = %self.job))]
    pub async fn register(
        &self,
        namespace: Option<&str>,
        name: &str,
        actor_id: ActorId,
        lifetime: LifetimeMode,
    ) -> Result<Binding, RegistryError> {
        let request = self.binding_request(namespace, name, actor_id, lifetime)?;
        let binding = self.store.register(request).await?;
        self.bound(&binding).await;
        Ok(binding)
    }

    /// Get-if-exists: returns the live binding for the name when there is
    /// one, otherwise registers.
    #[instrument(skip(self), fields(job = %self.job))]
    pub async fn register_or_resolve(
        &self,
        namespace: Option<&str>,
        name: &str,
        actor_id: ActorId,
        lifetime: LifetimeMode,
    ) -> Result<Registration, RegistryError> {
        let request = self.binding_request(namespace, name, actor_id, lifetime)?;
        let registration = self.store.register_or_resolve(request).await?;
        if let Registration::Created(binding) = &registration {
            self.bound(binding).await;
        }
        Ok(registration)
    }

    /// Resolves a name to its actor. `NotFound` is a normal outcome.
    pub async fn resolve(&self, namespace: Option<&str>, name: &str) -> Result<ActorId, RegistryError> {
        self.resolve_binding(namespace, name).await.map(|b| b.actor_id)
    }

    #[instrument(skip(self), fields(job = %self.job))]
    pub async fn resolve_binding(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Binding, RegistryError> {
        let namespace = self.namespaces.effective(namespace);
        let name = ActorName::new(name)?;
        let result = self.store.resolve(namespace, name).await;
        if let Err(RegistryError::NotFound { namespace, name }) = &result {
            debug!(%namespace, %name, "Not found");
        }
        result
    }

    /// Removes the binding. Removing an absent name is `NotFound`, which
    /// callers can treat as already done.
    #[instrument(skip(self), fields(job = %self.job))]
    pub async fn remove(&self, namespace: Option<&str>, name: &str) -> Result<Binding, RegistryError> {
        let namespace = self.namespaces.effective(namespace);
        let name = ActorName::new(name)?;
        let binding = self.store.remove(namespace, name).await?;

        publish(
            &self.events,
            RegistryEvent::NameFreed {
                namespace: binding.namespace.clone(),
                name: binding.name.clone(),
                actor_id: binding.actor_id,
                binding: binding.id,
                reason: FreeReason::Removed,
            },
        );
        let released = self
            .tracker
            .binding_released(binding.actor_id, binding.id)
            .await
            .map(|event| event.into_iter().collect());
        if let Err(e) = self.settle_committed(released).await {
            warn!(actor_id = %binding.actor_id, error = %e, "Removal not fully settled");
        }
        Ok(binding)
    }

    /// Names bound in the effective namespace, as a snapshot.
    pub async fn list_names(&self, namespace: Option<&str>) -> Result<Vec<ActorName>, RegistryError> {
        let namespace = self.namespaces.effective(namespace);
        self.store.list_names(namespace).await
    }

    /// Every `(namespace, name)` pair in the registry, as a snapshot.
    pub async fn list_all(&self) -> Result<Vec<(Namespace, ActorName)>, RegistryError> {
        self.store.list_all().await
    }

    // --- Collaborator feeds ---

    /// The actor-creation subsystem reports an actor owned by this caller's job.
    pub async fn actor_created(&self, actor_id: ActorId, lifetime: LifetimeMode) -> Result<(), RegistryError> {
        let event = self.tracker.actor_created(actor_id, self.job, lifetime).await?;
        self.settle(event).await
    }

    pub async fn handle_acquired(&self, actor_id: ActorId) -> Result<u32, RegistryError> {
        self.tracker.handle_acquired(actor_id).await
    }

    /// Returns the remaining handle count.
    pub async fn handle_released(&self, actor_id: ActorId) -> Result<u32, RegistryError> {
        let (handles, event) = self.tracker.handle_released(actor_id).await?;
        self.settle(event).await?;
        Ok(handles)
    }

    /// Job supervision reports a terminated job. Returns the actors made
    /// unreachable, once their Owned bindings are gone.
    #[instrument(skip(self))]
    pub async fn job_terminated(&self, job: JobId) -> Result<Vec<ActorId>, RegistryError> {
        let events = self.tracker.job_terminated(job).await?;
        let released = events.iter().map(LifetimeEvent::actor_id).collect();
        self.settle(events).await?;
        Ok(released)
    }

    /// Returns `false` when the destruction was already known.
    pub async fn actor_destroyed(&self, actor_id: ActorId) -> Result<bool, RegistryError> {
        let event = self.tracker.actor_destroyed(actor_id).await?;
        let first = event.is_some();
        self.settle(event).await?;
        Ok(first)
    }

    /// Applies the evictions a feed caused before the feed returns.
    async fn settle(&self, events: impl IntoIterator<Item = LifetimeEvent>) -> Result<(), RegistryError> {
        for event in events {
            self.evictor.apply(event).await?;
        }
        Ok(())
    }

    /// For feeds following a committed write: the caller still gets `Ok`.
    async fn settle_committed(
        &self,
        events: Result<Vec<LifetimeEvent>, RegistryError>,
    ) -> Result<(), RegistryError> {
        self.settle(events?).await
    }

    fn binding_request(
        &self,
        namespace: Option<&str>,
        name: &str,
        actor_id: ActorId,
        lifetime: LifetimeMode,
    ) -> Result<BindingRequest, RegistryError> {
        Ok(BindingRequest {
            namespace: self.namespaces.effective(namespace),
            name: ActorName::new(name)?,
            actor_id,
            lifetime,
            creating_job: self.job,
        })
    }

    /// Publishes `NameBound` and reports the named actor to the Tracker. A
    /// registration the Tracker already knows to be stale is evicted here.
    /// The binding is committed either way; a Tracker failure is only logged.
    async fn bound(&self, binding: &Binding) {
        info!(namespace = %binding.namespace, name = %binding.name, actor_id = %binding.actor_id, "Name bound");
        publish(
            &self.events,
            RegistryEvent::NameBound {
                namespace: binding.namespace.clone(),
                name: binding.name.clone(),
                actor_id: binding.actor_id,
                binding: binding.id,
            },
        );
        let named = self
            .tracker
            .actor_named(binding.actor_id, binding.creating_job, binding.lifetime, binding.id)
            .await
            .map(|event| event.into_iter().collect());
        if let Err(e) = self.settle_committed(named).await {
            warn!(actor_id = %binding.actor_id, error = %e, "Binding not fully settled");
        }
    }
}
