use named_actor_registry::config::RegistryConfig;
use named_actor_registry::lifecycle::{try_setup_tracing, RegistrySystem};
use named_actor_registry::model::{
    ActorId, ActorName, BindingRequest, FreeReason, JobId, LifetimeEvent, LifetimeMode,
    RegistryEvent,
};
use named_actor_registry::namespace::NamespaceContext;
use named_actor_registry::service::Evictor;
use named_actor_registry::store;
use named_actor_registry::RegistryError;
use std::time::Duration;
use tokio::sync::broadcast;

fn system() -> RegistrySystem {
    try_setup_tracing();
    RegistrySystem::new(RegistryConfig::default())
}

/// Waits for the `NameFreed` of `name`, skipping other events.
async fn wait_freed(events: &mut broadcast::Receiver<RegistryEvent>, expected: &str) -> FreeReason {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match events.recv().await.expect("event channel closed") {
                RegistryEvent::NameFreed { name, reason, .. } if name == expected => break reason,
                _ => continue,
            }
        }
    })
    .await
    .expect("Timed out waiting for NameFreed")
}

#[tokio::test]
async fn test_owned_binding_is_freed_when_job_ends() {
    let system = system();
    let mut events = system.service.subscribe();
    let job = system.service.for_job(JobId(2), None);
    let apple = ActorId(0xb2);

    job.actor_created(apple, LifetimeMode::Owned).await.unwrap();
    job.register(None, "apple", apple, LifetimeMode::Owned)
        .await
        .unwrap();

    let released = system.service.job_terminated(JobId(2)).await.unwrap();
    assert_eq!(released, vec![apple]);

    assert_eq!(wait_freed(&mut events, "apple").await, FreeReason::OwnerExited);
    assert!(matches!(
        job.resolve(None, "apple").await,
        Err(RegistryError::NotFound { .. })
    ));
    assert_eq!(system.tracker.inspect(apple).await.unwrap(), None);

    drop(job);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_owned_binding_is_freed_even_with_live_handles() {
    let system = system();
    let mut events = system.service.subscribe();
    let job = system.service.for_job(JobId(3), Some("svc"));

    job.register(None, "db", ActorId(30), LifetimeMode::Owned)
        .await
        .unwrap();
    assert_eq!(job.handle_acquired(ActorId(30)).await.unwrap(), 1);

    job.job_terminated(JobId(3)).await.unwrap();
    assert_eq!(wait_freed(&mut events, "db").await, FreeReason::OwnerExited);

    drop(job);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_detached_binding_survives_until_actor_dies() {
    let system = system();
    let mut events = system.service.subscribe();
    let job = system.service.for_job(JobId(1), Some("colors"));
    let orange = ActorId(0xa1);

    job.register(None, "orange", orange, LifetimeMode::Detached)
        .await
        .unwrap();
    // Replying to job_terminated means the tracker has sequenced it.
    assert!(job.job_terminated(JobId(1)).await.unwrap().is_empty());
    assert_eq!(job.resolve(None, "orange").await.unwrap(), orange);

    assert!(job.actor_destroyed(orange).await.unwrap());
    assert_eq!(wait_freed(&mut events, "orange").await, FreeReason::ActorDied);
    assert!(matches!(
        job.resolve(None, "orange").await,
        Err(RegistryError::NotFound { .. })
    ));

    // Reported twice: the second report is ignored.
    assert!(!job.actor_destroyed(orange).await.unwrap());

    drop(job);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_owned_registration_after_job_termination_is_freed() {
    let system = system();
    let mut events = system.service.subscribe();
    let late = system.service.for_job(JobId(4), Some("late"));

    late.job_terminated(JobId(4)).await.unwrap();

    // The Store commits the binding; the Tracker then releases it.
    late.register(None, "ghost", ActorId(40), LifetimeMode::Owned)
        .await
        .unwrap();
    assert_eq!(wait_freed(&mut events, "ghost").await, FreeReason::OwnerExited);
    assert!(matches!(
        late.resolve(None, "ghost").await,
        Err(RegistryError::NotFound { .. })
    ));

    drop(late);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_detached_registration_after_job_termination_stays() {
    let system = system();
    let late = system.service.for_job(JobId(5), Some("late"));

    late.job_terminated(JobId(5)).await.unwrap();
    late.register(None, "keeper", ActorId(50), LifetimeMode::Detached)
        .await
        .unwrap();

    assert_eq!(late.resolve(None, "keeper").await.unwrap(), ActorId(50));
    let liveness = system.tracker.inspect(ActorId(50)).await.unwrap().unwrap();
    assert!(liveness.named);
    assert_eq!(liveness.lifetime, LifetimeMode::Detached);

    drop(late);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_registration_of_destroyed_actor_is_freed() {
    let system = system();
    let mut events = system.service.subscribe();
    let job = system.service.for_job(JobId(6), Some("ns"));

    job.actor_destroyed(ActorId(60)).await.unwrap();
    job.register(None, "zombie", ActorId(60), LifetimeMode::Detached)
        .await
        .unwrap();

    assert_eq!(wait_freed(&mut events, "zombie").await, FreeReason::ActorDied);

    drop(job);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unnamed_owned_actor_is_collected_on_last_handle() {
    let system = system();
    let job = system.service.for_job(JobId(7), None);
    let actor = ActorId(70);

    job.actor_created(actor, LifetimeMode::Owned).await.unwrap();
    assert_eq!(job.handle_acquired(actor).await.unwrap(), 1);
    assert_eq!(job.handle_acquired(actor).await.unwrap(), 2);
    assert_eq!(job.handle_released(actor).await.unwrap(), 1);
    assert!(system.tracker.inspect(actor).await.unwrap().is_some());

    assert_eq!(job.handle_released(actor).await.unwrap(), 0);
    assert_eq!(system.tracker.inspect(actor).await.unwrap(), None);

    drop(job);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_repeated_job_termination_is_a_no_op() {
    let system = system();
    let job = system.service.for_job(JobId(8), Some("ns"));

    job.register(None, "once", ActorId(80), LifetimeMode::Owned)
        .await
        .unwrap();
    assert_eq!(job.job_terminated(JobId(8)).await.unwrap(), vec![ActorId(80)]);
    assert!(job.job_terminated(JobId(8)).await.unwrap().is_empty());

    drop(job);
    system.shutdown().await.unwrap();
}

/// Lifetime events may be delivered more than once; eviction must not
/// remove anything the second time.
#[tokio::test]
async fn test_evictor_is_idempotent() {
    try_setup_tracing();
    let (store_actor, store) = store::new(8);
    tokio::spawn(store_actor.run(()));
    let (events, mut rx) = broadcast::channel(16);
    let evictor = Evictor::new(store.clone(), events);

    let namespace = NamespaceContext::new("ns").effective(None);
    let owned = store
        .register(BindingRequest {
            namespace: namespace.clone(),
            name: ActorName::new("owned").unwrap(),
            actor_id: ActorId(1),
            lifetime: LifetimeMode::Owned,
            creating_job: JobId(1),
        })
        .await
        .unwrap();
    let detached = store
        .register(BindingRequest {
            namespace: namespace.clone(),
            name: ActorName::new("detached").unwrap(),
            actor_id: ActorId(2),
            lifetime: LifetimeMode::Detached,
            creating_job: JobId(1),
        })
        .await
        .unwrap();

    let event = LifetimeEvent::ActorUnreachable {
        actor_id: ActorId(1),
        binding: Some(owned.id),
    };
    assert_eq!(evictor.apply(event).await.unwrap().len(), 1);
    assert!(evictor.apply(event).await.unwrap().is_empty());

    // Unreachability never evicts a Detached binding.
    let detached = LifetimeEvent::ActorUnreachable {
        actor_id: ActorId(2),
        binding: Some(detached.id),
    };
    assert!(evictor.apply(detached).await.unwrap().is_empty());
    assert_eq!(store.list_names(namespace).await.unwrap().len(), 1);

    // Exactly one NameFreed went out.
    assert!(matches!(
        rx.try_recv(),
        Ok(RegistryEvent::NameFreed { reason: FreeReason::OwnerExited, .. })
    ));
    assert!(rx.try_recv().is_err());
}

/// An unreachable event issued before a binding was committed leaves that
/// binding alone.
#[tokio::test]
async fn test_evictor_spares_binding_newer_than_event() {
    try_setup_tracing();
    let (store_actor, store) = store::new(8);
    tokio::spawn(store_actor.run(()));
    let (events, _rx) = broadcast::channel(16);
    let evictor = Evictor::new(store.clone(), events);

    let namespace = NamespaceContext::new("ns").effective(None);
    let request = |name: &str| BindingRequest {
        namespace: namespace.clone(),
        name: ActorName::new(name).unwrap(),
        actor_id: ActorId(1),
        lifetime: LifetimeMode::Owned,
        creating_job: JobId(1),
    };
    let old = store.register(request("old")).await.unwrap();
    store.remove(namespace.clone(), old.name.clone()).await.unwrap();
    let new = store.register(request("new")).await.unwrap();

    let stale = LifetimeEvent::ActorUnreachable {
        actor_id: ActorId(1),
        binding: Some(old.id),
    };
    assert!(evictor.apply(stale).await.unwrap().is_empty());
    // An unnamed actor's event has nothing to evict.
    let unnamed = LifetimeEvent::ActorUnreachable {
        actor_id: ActorId(1),
        binding: None,
    };
    assert!(evictor.apply(unnamed).await.unwrap().is_empty());
    assert_eq!(
        store.resolve(namespace, new.name.clone()).await.unwrap(),
        new
    );
}

/// Renaming an Owned actor (Remove, then Register under a new name) keeps
/// the new name, however the eviction of the old one interleaves.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_owned_rename_keeps_new_binding() {
    let system = system();
    let job = system.service.for_job(JobId(9), Some("rename"));

    let mut tasks = Vec::new();
    for i in 0..200u64 {
        let job = job.clone();
        tasks.push(tokio::spawn(async move {
            let actor = ActorId(900 + i);
            let old = format!("old-{i}");
            let new = format!("new-{i}");
            job.register(None, &old, actor, LifetimeMode::Owned).await?;
            job.remove(None, &old).await?;
            job.register(None, &new, actor, LifetimeMode::Owned).await?;
            job.resolve(None, &new).await
        }));
    }
    for (i, task) in tasks.into_iter().enumerate() {
        let resolved = task.await.expect("task panicked").expect("renamed binding lost");
        assert_eq!(resolved, ActorId(900 + i as u64));
    }

    // Give the sink-driven evictor time to drain any stale events.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let names = job.list_names(None).await.unwrap();
    assert_eq!(names.len(), 200);
    assert!(names.iter().all(|name| name.as_str().starts_with("new-")));

    drop(job);
    system.shutdown().await.unwrap();
}

/// Once `job_terminated` returns, no resolve sees the job's Owned bindings.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_resolve_right_after_job_termination_misses() {
    let system = system();

    let mut tasks = Vec::new();
    for i in 0..200u32 {
        let job = system.service.for_job(JobId(1000 + i), Some("short-lived"));
        let reader = system.service.for_job(JobId(5000 + i), Some("short-lived"));
        tasks.push(tokio::spawn(async move {
            let name = format!("task-{i}");
            job.register(None, &name, ActorId(10_000 + u64::from(i)), LifetimeMode::Owned)
                .await?;
            job.job_terminated(job.job()).await?;
            Ok::<_, RegistryError>(reader.resolve(None, &name).await)
        }));
    }
    for task in tasks {
        let resolved = task.await.expect("task panicked").unwrap();
        assert!(
            matches!(resolved, Err(RegistryError::NotFound { .. })),
            "stale resolve: {resolved:?}"
        );
    }

    system.shutdown().await.unwrap();
}
