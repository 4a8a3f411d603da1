//! # Store Client
//!
//! Typed API over the Name Registry Store's mailbox. Every call is a
//! round-trip through the Store's sequencer; transport failures come back as
//! [`RegistryError::Unavailable`].

use crate::error::RegistryError;
use crate::framework::ActorHandle;
use crate::model::{ActorId, ActorName, Binding, BindingRequest, Namespace, Registration};
use crate::store::{EvictScope, StoreRequest};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct StoreClient {
    inner: ActorHandle<StoreRequest>,
}

impl StoreClient {
    pub fn new(inner: ActorHandle<StoreRequest>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn register(&self, request: BindingRequest) -> Result<Binding, RegistryError> {
        debug!("Sending request");
        self.inner
            .ask(|respond_to| StoreRequest::Register { request, respond_to })
            .await?
    }

    #[instrument(skip(self))]
    pub async fn register_or_resolve(
        &self,
        request: BindingRequest,
    ) -> Result<Registration, RegistryError> {
        debug!("Sending request");
        self.inner
            .ask(|respond_to| StoreRequest::RegisterOrResolve { request, respond_to })
            .await?
    }

    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        namespace: Namespace,
        name: ActorName,
    ) -> Result<Binding, RegistryError> {
        debug!("Sending request");
        self.inner
            .ask(|respond_to| StoreRequest::Resolve {
                namespace,
                name,
                respond_to,
            })
            .await?
    }

    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        namespace: Namespace,
        name: ActorName,
    ) -> Result<Binding, RegistryError> {
        debug!("Sending request");
        self.inner
            .ask(|respond_to| StoreRequest::Remove {
                namespace,
                name,
                respond_to,
            })
            .await?
    }

    pub async fn list_names(&self, namespace: Namespace) -> Result<Vec<ActorName>, RegistryError> {
        Ok(self
            .inner
            .ask(|respond_to| StoreRequest::ListNames { namespace, respond_to })
            .await?)
    }

    pub async fn list_all(&self) -> Result<Vec<(Namespace, ActorName)>, RegistryError> {
        Ok(self
            .inner
            .ask(|respond_to| StoreRequest::ListAll { respond_to })
            .await?)
    }

    pub async fn binding_of(&self, actor_id: ActorId) -> Result<Option<Binding>, RegistryError> {
        Ok(self
            .inner
            .ask(|respond_to| StoreRequest::BindingOf { actor_id, respond_to })
            .await?)
    }

    /// Removes the actor's binding within `scope`; returns what was removed.
    #[instrument(skip(self))]
    pub async fn evict_actor(
        &self,
        actor_id: ActorId,
        scope: EvictScope,
    ) -> Result<Vec<Binding>, RegistryError> {
        debug!("Sending request");
        Ok(self
            .inner
            .ask(|respond_to| StoreRequest::EvictActor {
                actor_id,
                scope,
                respond_to,
            })
            .await?)
    }
}
