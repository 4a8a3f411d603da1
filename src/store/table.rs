//! The authoritative binding table.
//!
//! [`NameStore`] is plain synchronous state. Running it inside an
//! [`ActorRunner`](crate::framework::ActorRunner) makes its request loop the
//! single sequencer for every key: two racing Registers for the same
//! `(namespace, name)` are ordered by arrival in the mailbox, the first one
//! commits and the second observes `AlreadyExists`. Resolves travel through the
//! same loop, so a Resolve issued after a Register completed always sees it.

use crate::error::RegistryError;
use crate::framework::Actor;
use crate::model::{ActorId, ActorName, Binding, BindingId, BindingRequest, LifetimeMode, Namespace, Registration};
use crate::store::message::{EvictScope, StoreRequest};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error, info};

#[derive(Debug, Default)]
pub struct NameStore {
    /// namespace -> name -> binding. Namespaces partition the keyspace.
    table: HashMap<Namespace, BTreeMap<ActorName, Binding>>,
    /// Reverse index; an actor holds at most one name.
    by_actor: HashMap<ActorId, (Namespace, ActorName)>,
    sequence: u64,
}

impl NameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live bindings across all namespaces.
    pub fn len(&self) -> usize {
        self.by_actor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_actor.is_empty()
    }

    /// Commits a new binding. Never overwrites.
    pub fn register(&mut self, request: BindingRequest) -> Result<Binding, RegistryError> {
        if let Some(existing) = self.lookup(&request.namespace, &request.name) {
            return Err(RegistryError::AlreadyExists {
                namespace: request.namespace,
                name: request.name,
                existing: existing.actor_id,
            });
        }
        self.check_unnamed(request.actor_id)?;
        Ok(self.insert(request))
    }

    /// Returns the live binding for the key if there is one, otherwise commits
    /// `request`.
    pub fn register_or_resolve(
        &mut self,
        request: BindingRequest,
    ) -> Result<Registration, RegistryError> {
        if let Some(existing) = self.lookup(&request.namespace, &request.name) {
            return Ok(Registration::Existing(existing.clone()));
        }
        self.check_unnamed(request.actor_id)?;
        Ok(Registration::Created(self.insert(request)))
    }

    pub fn resolve(&self, namespace: &Namespace, name: &ActorName) -> Result<Binding, RegistryError> {
        let binding = self.lookup(namespace, name).ok_or_else(|| RegistryError::NotFound {
            namespace: namespace.clone(),
            name: name.clone(),
        })?;

        // Keyed by namespace, so this only fires if the table is corrupted.
        if &binding.namespace != namespace {
            error!(requested = %namespace, found = %binding.namespace, %name, "Namespace mismatch on resolve");
            return Err(RegistryError::NamespaceMismatch {
                requested: namespace.clone(),
                found: binding.namespace.clone(),
            });
        }
        Ok(binding.clone())
    }

    /// Removes the binding unconditionally. A second remove is `NotFound`.
    pub fn remove(&mut self, namespace: &Namespace, name: &ActorName) -> Result<Binding, RegistryError> {
        let removed = self
            .table
            .get_mut(namespace)
            .and_then(|names| names.remove(name))
            .ok_or_else(|| RegistryError::NotFound {
                namespace: namespace.clone(),
                name: name.clone(),
            })?;

        self.by_actor.remove(&removed.actor_id);
        if self.table.get(namespace).is_some_and(|names| names.is_empty()) {
            self.table.remove(namespace);
        }
        Ok(removed)
    }

    /// Snapshot of the names bound in one namespace, sorted.
    pub fn list_names(&self, namespace: &Namespace) -> Vec<ActorName> {
        self.table
            .get(namespace)
            .map(|names| names.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Snapshot of every `(namespace, name)` pair, sorted.
    pub fn list_all(&self) -> Vec<(Namespace, ActorName)> {
        let mut all: Vec<_> = self
            .table
            .iter()
            .flat_map(|(ns, names)| names.keys().map(move |name| (ns.clone(), name.clone())))
            .collect();
        all.sort();
        all
    }

    pub fn binding_of(&self, actor_id: ActorId) -> Option<Binding> {
        let (namespace, name) = self.by_actor.get(&actor_id)?;
        self.lookup(namespace, name).cloned()
    }

    /// Removes the actor's binding if `scope` allows it. Returns what was
    /// removed; an empty list when nothing matched, so redelivery is harmless.
    pub fn evict_actor(&mut self, actor_id: ActorId, scope: EvictScope) -> Vec<Binding> {
        let Some(binding) = self.binding_of(actor_id) else {
            return Vec::new();
        };
        let evictable = match scope {
            EvictScope::OwnedThrough(through) => {
                binding.lifetime == LifetimeMode::Owned && binding.id <= through
            }
            EvictScope::Any => true,
        };
        if !evictable {
            return Vec::new();
        }
        self.remove(&binding.namespace, &binding.name)
            .map(|removed| vec![removed])
            .unwrap_or_default()
    }

    fn lookup(&self, namespace: &Namespace, name: &ActorName) -> Option<&Binding> {
        self.table.get(namespace)?.get(name)
    }

    fn check_unnamed(&self, actor_id: ActorId) -> Result<(), RegistryError> {
        match self.by_actor.get(&actor_id) {
            Some((namespace, name)) => Err(RegistryError::ActorAlreadyNamed {
                actor_id,
                namespace: namespace.clone(),
                name: name.clone(),
            }),
            None => Ok(()),
        }
    }

    fn insert(&mut self, request: BindingRequest) -> Binding {
        self.sequence += 1;
        let binding = request.commit(BindingId(self.sequence));
        self.by_actor
            .insert(binding.actor_id, (binding.namespace.clone(), binding.name.clone()));
        self.table
            .entry(binding.namespace.clone())
            .or_default()
            .insert(binding.name.clone(), binding.clone());
        binding
    }
}

#[async_trait]
impl Actor for NameStore {
    type Request = StoreRequest;
    type Context = ();
    const NAME: &'static str = "NameStore";

    async fn handle(&mut self, request: StoreRequest, _ctx: &()) {
        match request {
            StoreRequest::Register { request, respond_to } => {
                let result = self.register(request);
                match &result {
                    Ok(b) => info!(namespace = %b.namespace, name = %b.name, actor_id = %b.actor_id, lifetime = %b.lifetime, binding = %b.id, size = self.len(), "Bound"),
                    Err(e) => info!(error = %e, "Register rejected"),
                }
                let _ = respond_to.send(result);
            }
            StoreRequest::RegisterOrResolve { request, respond_to } => {
                let result = self.register_or_resolve(request);
                match &result {
                    Ok(Registration::Created(b)) => info!(namespace = %b.namespace, name = %b.name, actor_id = %b.actor_id, binding = %b.id, size = self.len(), "Bound"),
                    Ok(Registration::Existing(b)) => debug!(namespace = %b.namespace, name = %b.name, actor_id = %b.actor_id, "Already bound"),
                    Err(e) => info!(error = %e, "Register rejected"),
                }
                let _ = respond_to.send(result);
            }
            StoreRequest::Resolve { namespace, name, respond_to } => {
                let result = self.resolve(&namespace, &name);
                debug!(%namespace, %name, found = result.is_ok(), "Resolve");
                let _ = respond_to.send(result);
            }
            StoreRequest::Remove { namespace, name, respond_to } => {
                let result = self.remove(&namespace, &name);
                match &result {
                    Ok(b) => info!(%namespace, %name, actor_id = %b.actor_id, size = self.len(), "Removed"),
                    Err(_) => debug!(%namespace, %name, "Remove of absent name"),
                }
                let _ = respond_to.send(result);
            }
            StoreRequest::ListNames { namespace, respond_to } => {
                let _ = respond_to.send(self.list_names(&namespace));
            }
            StoreRequest::ListAll { respond_to } => {
                let _ = respond_to.send(self.list_all());
            }
            StoreRequest::BindingOf { actor_id, respond_to } => {
                let _ = respond_to.send(self.binding_of(actor_id));
            }
            StoreRequest::EvictActor { actor_id, scope, respond_to } => {
                let evicted = self.evict_actor(actor_id, scope);
                for b in &evicted {
                    info!(namespace = %b.namespace, name = %b.name, %actor_id, ?scope, size = self.len(), "Evicted");
                }
                let _ = respond_to.send(evicted);
            }
        }
    }

    fn size(&self) -> usize {
        self.len()
    }
}
