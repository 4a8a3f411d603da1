//! # Tracker Client
//!
//! Typed API over the Lifetime Tracker's mailbox. Each call returns once the
//! tracker has sequenced the feed, with the lifetime events it caused.

use crate::error::RegistryError;
use crate::framework::ActorHandle;
use crate::model::{ActorId, BindingId, JobId, LifetimeEvent, LifetimeMode};
use crate::tracker::{ActorLiveness, TrackerRequest};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct TrackerClient {
    inner: ActorHandle<TrackerRequest>,
}

impl TrackerClient {
    pub fn new(inner: ActorHandle<TrackerRequest>) -> Self {
        Self { inner }
    }

    /// Reports an actor created by the actor-creation subsystem (unnamed).
    #[instrument(skip(self))]
    pub async fn actor_created(
        &self,
        actor_id: ActorId,
        owner: JobId,
        lifetime: LifetimeMode,
    ) -> Result<Option<LifetimeEvent>, RegistryError> {
        debug!("Sending request");
        self.created(actor_id, owner, lifetime, None).await
    }

    /// Reports an actor whose binding was just committed.
    #[instrument(skip(self))]
    pub async fn actor_named(
        &self,
        actor_id: ActorId,
        owner: JobId,
        lifetime: LifetimeMode,
        binding: BindingId,
    ) -> Result<Option<LifetimeEvent>, RegistryError> {
        debug!("Sending request");
        self.created(actor_id, owner, lifetime, Some(binding)).await
    }

    pub async fn handle_acquired(&self, actor_id: ActorId) -> Result<u32, RegistryError> {
        Ok(self
            .inner
            .ask(|respond_to| TrackerRequest::HandleAcquired { actor_id, respond_to })
            .await?)
    }

    /// Returns the remaining handle count.
    pub async fn handle_released(
        &self,
        actor_id: ActorId,
    ) -> Result<(u32, Option<LifetimeEvent>), RegistryError> {
        Ok(self
            .inner
            .ask(|respond_to| TrackerRequest::HandleReleased { actor_id, respond_to })
            .await?)
    }

    pub async fn binding_released(
        &self,
        actor_id: ActorId,
        binding: BindingId,
    ) -> Result<Option<LifetimeEvent>, RegistryError> {
        Ok(self
            .inner
            .ask(|respond_to| TrackerRequest::BindingReleased {
                actor_id,
                binding,
                respond_to,
            })
            .await?)
    }

    /// Empty on repeats.
    #[instrument(skip(self))]
    pub async fn job_terminated(&self, job: JobId) -> Result<Vec<LifetimeEvent>, RegistryError> {
        debug!("Sending request");
        Ok(self
            .inner
            .ask(|respond_to| TrackerRequest::JobTerminated { job, respond_to })
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn actor_destroyed(
        &self,
        actor_id: ActorId,
    ) -> Result<Option<LifetimeEvent>, RegistryError> {
        debug!("Sending request");
        Ok(self
            .inner
            .ask(|respond_to| TrackerRequest::ActorDestroyed { actor_id, respond_to })
            .await?)
    }

    pub async fn inspect(&self, actor_id: ActorId) -> Result<Option<ActorLiveness>, RegistryError> {
        Ok(self
            .inner
            .ask(|respond_to| TrackerRequest::Inspect { actor_id, respond_to })
            .await?)
    }

    async fn created(
        &self,
        actor_id: ActorId,
        owner: JobId,
        lifetime: LifetimeMode,
        binding: Option<BindingId>,
    ) -> Result<Option<LifetimeEvent>, RegistryError> {
        Ok(self
            .inner
            .ask(|respond_to| TrackerRequest::ActorCreated {
                actor_id,
                owner,
                lifetime,
                binding,
                respond_to,
            })
            .await?)
    }
}
