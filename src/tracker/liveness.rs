//! Per-actor reference counts and owning-job links.

use crate::framework::Actor;
use crate::model::{ActorId, BindingId, JobId, LifetimeEvent, LifetimeMode};
use crate::tracker::message::TrackerRequest;
use crate::tracker::tombstones::{Tombstones, DEFAULT_RETENTION};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Where the tracker publishes liveness changes. Injected at `run()` time.
pub type LifetimeSink = mpsc::UnboundedSender<LifetimeEvent>;

/// Snapshot of what the tracker knows about one actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorLiveness {
    /// Unknown until the creation is reported; handles may be seen first.
    pub owner: Option<JobId>,
    pub lifetime: LifetimeMode,
    pub handles: u32,
    pub named: bool,
    /// Newest binding reported for the actor, kept after it is released.
    pub binding: Option<BindingId>,
}

impl ActorLiveness {
    fn is_collectable(&self) -> bool {
        self.handles == 0 && !self.named
    }
}

/// Tracks every actor that holds a name or a live handle.
///
/// Emits events instead of touching the binding table, so the Store keeps a
/// single writer. Unreachable events carry the newest binding id known here;
/// a binding committed after the event was issued is never evicted by it.
#[derive(Debug)]
pub struct LifetimeTracker {
    actors: HashMap<ActorId, ActorLiveness>,
    terminated_jobs: Tombstones<JobId>,
    dead_actors: Tombstones<ActorId>,
}

impl Default for LifetimeTracker {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }
}

impl LifetimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers terminated jobs and destroyed actors for `retention`.
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            actors: HashMap::new(),
            terminated_jobs: Tombstones::new(retention),
            dead_actors: Tombstones::new(retention),
        }
    }

    pub fn inspect(&self, actor_id: ActorId) -> Option<&ActorLiveness> {
        self.actors.get(&actor_id)
    }

    pub fn is_terminated(&self, job: JobId) -> bool {
        self.terminated_jobs.contains(&job)
    }

    /// Remembered `(terminated jobs, destroyed actors)`.
    pub fn tombstones(&self) -> (usize, usize) {
        (self.terminated_jobs.len(), self.dead_actors.len())
    }

    fn prune(&mut self) {
        let now = Instant::now();
        self.terminated_jobs.prune(now);
        self.dead_actors.prune(now);
    }

    /// `OnActorCreated`. A Detached report upgrades an Owned actor, never the
    /// reverse. Creation for a job already known to be dead is immediately
    /// unreachable when Owned; for a destroyed actor it is immediately dead.
    pub fn actor_created(
        &mut self,
        actor_id: ActorId,
        owner: JobId,
        lifetime: LifetimeMode,
        binding: Option<BindingId>,
    ) -> Option<LifetimeEvent> {
        self.prune();
        if self.dead_actors.contains(&actor_id) {
            return Some(LifetimeEvent::ActorDied(actor_id));
        }

        let terminated = &self.terminated_jobs;
        let entry = self.actors.entry(actor_id).or_insert(ActorLiveness {
            owner: Some(owner),
            lifetime,
            handles: 0,
            named: false,
            binding: None,
        });
        entry.owner.get_or_insert(owner);
        entry.named |= binding.is_some();
        entry.binding = entry.binding.max(binding);
        if lifetime == LifetimeMode::Detached {
            entry.lifetime = LifetimeMode::Detached;
        }

        let owner_dead = entry.owner.is_some_and(|job| terminated.contains(&job));
        if entry.lifetime == LifetimeMode::Owned && owner_dead {
            let binding = entry.binding;
            self.actors.remove(&actor_id);
            return Some(LifetimeEvent::ActorUnreachable { actor_id, binding });
        }
        None
    }

    /// `OnHandleAcquired`. Returns the new count.
    pub fn handle_acquired(&mut self, actor_id: ActorId) -> u32 {
        self.prune();
        if self.dead_actors.contains(&actor_id) {
            return 0;
        }
        let entry = self.actors.entry(actor_id).or_insert(ActorLiveness {
            owner: None,
            lifetime: LifetimeMode::Owned,
            handles: 0,
            named: false,
            binding: None,
        });
        entry.handles = entry.handles.saturating_add(1);
        entry.handles
    }

    /// `OnHandleReleased`. Returns the new count and, when the last handle of
    /// an unnamed Owned actor goes, the unreachable event.
    pub fn handle_released(&mut self, actor_id: ActorId) -> (u32, Option<LifetimeEvent>) {
        let Some(entry) = self.actors.get_mut(&actor_id) else {
            return (0, None);
        };
        entry.handles = entry.handles.saturating_sub(1);
        let handles = entry.handles;
        (handles, self.collect_if_unreachable(actor_id))
    }

    /// `binding` was explicitly removed. A release for a binding older than
    /// the newest one reported is stale and ignored.
    pub fn binding_released(&mut self, actor_id: ActorId, binding: BindingId) -> Option<LifetimeEvent> {
        let entry = self.actors.get_mut(&actor_id)?;
        if entry.binding.is_some_and(|newest| newest > binding) {
            debug!(%actor_id, %binding, "Stale binding release");
            return None;
        }
        entry.named = false;
        entry.binding = Some(binding);
        self.collect_if_unreachable(actor_id)
    }

    /// `OnJobTerminated`. Every Owned actor of the job becomes unreachable;
    /// Detached ones are untouched. A repeated termination is a no-op.
    pub fn job_terminated(&mut self, job: JobId) -> Vec<LifetimeEvent> {
        self.prune();
        if !self.terminated_jobs.insert(job, Instant::now()) {
            return Vec::new();
        }

        let mut released: Vec<(ActorId, Option<BindingId>)> = self
            .actors
            .iter()
            .filter(|(_, a)| a.owner == Some(job) && a.lifetime == LifetimeMode::Owned)
            .map(|(id, a)| (*id, a.binding))
            .collect();
        released.sort();

        released
            .into_iter()
            .map(|(actor_id, binding)| {
                self.actors.remove(&actor_id);
                LifetimeEvent::ActorUnreachable { actor_id, binding }
            })
            .collect()
    }

    /// The actor exited or was killed. Returns `None` if already known dead.
    pub fn actor_destroyed(&mut self, actor_id: ActorId) -> Option<LifetimeEvent> {
        self.prune();
        if !self.dead_actors.insert(actor_id, Instant::now()) {
            return None;
        }
        self.actors.remove(&actor_id);
        Some(LifetimeEvent::ActorDied(actor_id))
    }

    /// Drops an actor that has no handles and no name. Only Owned actors are
    /// reported; a Detached one simply stops being tracked.
    fn collect_if_unreachable(&mut self, actor_id: ActorId) -> Option<LifetimeEvent> {
        let entry = self.actors.get(&actor_id)?;
        if !entry.is_collectable() {
            return None;
        }
        let (lifetime, binding) = (entry.lifetime, entry.binding);
        self.actors.remove(&actor_id);
        match lifetime {
            LifetimeMode::Owned => Some(LifetimeEvent::ActorUnreachable { actor_id, binding }),
            LifetimeMode::Detached => None,
        }
    }

    fn publish(sink: &LifetimeSink, event: LifetimeEvent) {
        info!(?event, "Liveness changed");
        if sink.send(event).is_err() {
            warn!(?event, "No listener for lifetime events");
        }
    }
}

#[async_trait]
impl Actor for LifetimeTracker {
    type Request = TrackerRequest;
    type Context = LifetimeSink;
    const NAME: &'static str = "LifetimeTracker";

    async fn handle(&mut self, request: TrackerRequest, sink: &LifetimeSink) {
        match request {
            TrackerRequest::ActorCreated { actor_id, owner, lifetime, binding, respond_to } => {
                debug!(%actor_id, %owner, %lifetime, ?binding, "Actor created");
                let event = self.actor_created(actor_id, owner, lifetime, binding);
                if let Some(event) = event {
                    Self::publish(sink, event);
                }
                let _ = respond_to.send(event);
            }
            TrackerRequest::HandleAcquired { actor_id, respond_to } => {
                let handles = self.handle_acquired(actor_id);
                debug!(%actor_id, handles, "Handle acquired");
                let _ = respond_to.send(handles);
            }
            TrackerRequest::HandleReleased { actor_id, respond_to } => {
                let (handles, event) = self.handle_released(actor_id);
                debug!(%actor_id, handles, "Handle released");
                if let Some(event) = event {
                    Self::publish(sink, event);
                }
                let _ = respond_to.send((handles, event));
            }
            TrackerRequest::BindingReleased { actor_id, binding, respond_to } => {
                let event = self.binding_released(actor_id, binding);
                if let Some(event) = event {
                    Self::publish(sink, event);
                }
                let _ = respond_to.send(event);
            }
            TrackerRequest::JobTerminated { job, respond_to } => {
                let events = self.job_terminated(job);
                info!(%job, released = events.len(), "Job terminated");
                for event in &events {
                    Self::publish(sink, *event);
                }
                let _ = respond_to.send(events);
            }
            TrackerRequest::ActorDestroyed { actor_id, respond_to } => {
                let event = self.actor_destroyed(actor_id);
                if let Some(event) = event {
                    Self::publish(sink, event);
                }
                let _ = respond_to.send(event);
            }
            TrackerRequest::Inspect { actor_id, respond_to } => {
                let _ = respond_to.send(self.inspect(actor_id).cloned());
            }
        }
    }

    fn size(&self) -> usize {
        self.actors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: JobId = JobId(1);
    const A: ActorId = ActorId(0xa1);
    const B: ActorId = ActorId(0xb2);
    const B1: BindingId = BindingId(1);
    const B2: BindingId = BindingId(2);

    fn unreachable(actor_id: ActorId, binding: Option<BindingId>) -> LifetimeEvent {
        LifetimeEvent::ActorUnreachable { actor_id, binding }
    }

    #[test]
    fn test_owned_named_actor_dies_with_its_job() {
        let mut tracker = LifetimeTracker::new();
        assert_eq!(tracker.actor_created(A, JOB, LifetimeMode::Owned, Some(B1)), None);

        let events = tracker.job_terminated(JOB);
        assert_eq!(events, vec![unreachable(A, Some(B1))]);
        assert!(tracker.inspect(A).is_none());
    }

    #[test]
    fn test_detached_actor_outlives_its_job() {
        let mut tracker = LifetimeTracker::new();
        tracker.actor_created(A, JOB, LifetimeMode::Detached, Some(B1));

        assert!(tracker.job_terminated(JOB).is_empty());
        assert_eq!(tracker.inspect(A).unwrap().lifetime, LifetimeMode::Detached);
    }

    #[test]
    fn test_detached_report_overrides_owned() {
        let mut tracker = LifetimeTracker::new();
        tracker.actor_created(A, JOB, LifetimeMode::Owned, None);
        tracker.actor_created(A, JOB, LifetimeMode::Detached, Some(B1));
        // A later Owned report does not downgrade it.
        tracker.actor_created(A, JOB, LifetimeMode::Owned, Some(B1));

        assert!(tracker.job_terminated(JOB).is_empty());
    }

    #[test]
    fn test_duplicate_job_termination_is_noop() {
        let mut tracker = LifetimeTracker::new();
        tracker.actor_created(A, JOB, LifetimeMode::Owned, Some(B1));

        assert_eq!(tracker.job_terminated(JOB).len(), 1);
        assert!(tracker.job_terminated(JOB).is_empty());
        assert!(tracker.is_terminated(JOB));
    }

    #[test]
    fn test_registration_after_termination_is_immediately_unreachable() {
        let mut tracker = LifetimeTracker::new();
        tracker.job_terminated(JOB);

        assert_eq!(
            tracker.actor_created(A, JOB, LifetimeMode::Owned, Some(B1)),
            Some(unreachable(A, Some(B1)))
        );
        assert_eq!(tracker.actor_created(B, JOB, LifetimeMode::Detached, Some(B2)), None);
    }

    #[test]
    fn test_last_handle_of_unnamed_owned_actor() {
        let mut tracker = LifetimeTracker::new();
        tracker.actor_created(A, JOB, LifetimeMode::Owned, None);
        assert_eq!(tracker.handle_acquired(A), 1);
        assert_eq!(tracker.handle_acquired(A), 2);

        assert_eq!(tracker.handle_released(A), (1, None));
        assert_eq!(tracker.handle_released(A), (0, Some(unreachable(A, None))));
        // Releases for an actor no longer tracked are ignored.
        assert_eq!(tracker.handle_released(A), (0, None));
    }

    #[test]
    fn test_named_actor_survives_losing_all_handles() {
        let mut tracker = LifetimeTracker::new();
        tracker.actor_created(A, JOB, LifetimeMode::Owned, Some(B1));
        tracker.handle_acquired(A);

        assert_eq!(tracker.handle_released(A), (0, None));
        assert_eq!(tracker.binding_released(A, B1), Some(unreachable(A, Some(B1))));
    }

    #[test]
    fn test_release_of_older_binding_is_ignored() {
        let mut tracker = LifetimeTracker::new();
        tracker.actor_created(A, JOB, LifetimeMode::Owned, Some(B1));
        // The rename's binding reaches the tracker before the old release.
        tracker.actor_created(A, JOB, LifetimeMode::Owned, Some(B2));

        assert_eq!(tracker.binding_released(A, B1), None);
        let liveness = tracker.inspect(A).unwrap();
        assert!(liveness.named);
        assert_eq!(liveness.binding, Some(B2));
    }

    #[test]
    fn test_detached_actor_is_never_reported_unreachable() {
        let mut tracker = LifetimeTracker::new();
        tracker.actor_created(A, JOB, LifetimeMode::Detached, Some(B1));
        tracker.handle_acquired(A);

        assert_eq!(tracker.handle_released(A), (0, None));
        assert_eq!(tracker.binding_released(A, B1), None);
        assert!(tracker.inspect(A).is_none());
    }

    #[test]
    fn test_destroyed_actor_is_reported_once() {
        let mut tracker = LifetimeTracker::new();
        tracker.actor_created(A, JOB, LifetimeMode::Detached, Some(B1));

        assert_eq!(tracker.actor_destroyed(A), Some(LifetimeEvent::ActorDied(A)));
        assert_eq!(tracker.actor_destroyed(A), None);
        // A late registration for a dead actor is evicted straight away.
        assert_eq!(
            tracker.actor_created(A, JOB, LifetimeMode::Detached, Some(B2)),
            Some(LifetimeEvent::ActorDied(A))
        );
        assert_eq!(tracker.handle_acquired(A), 0);
    }

    #[test]
    fn test_tombstones_expire_after_retention() {
        let mut tracker = LifetimeTracker::with_retention(Duration::ZERO);
        for n in 0..100 {
            tracker.job_terminated(JobId(n));
        }
        // Each call prunes before inserting, so only the last job is left.
        assert_eq!(tracker.tombstones(), (1, 0));

        // Past the window a straggling Owned registration is not caught.
        assert_eq!(tracker.actor_created(A, JobId(0), LifetimeMode::Owned, Some(B1)), None);
        assert_eq!(tracker.tombstones(), (0, 0));
    }

    #[test]
    fn test_tombstones_held_within_retention() {
        let mut tracker = LifetimeTracker::new();
        for n in 0..100 {
            tracker.job_terminated(JobId(n));
        }
        assert_eq!(tracker.tombstones(), (100, 0));
        assert!(tracker.is_terminated(JobId(0)));
    }

    #[tokio::test]
    async fn test_actor_publishes_events_on_sink() {
        use crate::framework::ActorRunner;

        let (sink, mut events) = mpsc::unbounded_channel();
        let (runner, handle) = ActorRunner::new(LifetimeTracker::new(), 8);
        let task = tokio::spawn(runner.run(sink));

        handle
            .ask(|respond_to| TrackerRequest::ActorCreated {
                actor_id: A,
                owner: JOB,
                lifetime: LifetimeMode::Owned,
                binding: Some(B1),
                respond_to,
            })
            .await
            .unwrap();
        let released = handle
            .ask(|respond_to| TrackerRequest::JobTerminated { job: JOB, respond_to })
            .await
            .unwrap();

        assert_eq!(released, vec![unreachable(A, Some(B1))]);
        assert_eq!(events.recv().await, Some(unreachable(A, Some(B1))));

        drop(handle);
        let tracker = task.await.unwrap();
        assert!(tracker.is_terminated(JOB));
    }
}
