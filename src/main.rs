//! # Named Actor Registry demo
//!
//! Walks the colors/fruit scenario:
//! 1. Job 1 joins `colors` and registers a Detached `orange`.
//! 2. `orange` is invisible from `fruit` and visible from `colors`.
//! 3. Job 2 registers an Owned `apple` in its anonymous namespace.
//! 4. Both jobs terminate: `orange` survives, `apple` is freed.

use named_actor_registry::config::RegistryConfig;
use named_actor_registry::lifecycle::{setup_tracing, RegistrySystem};
use named_actor_registry::model::{ActorId, JobId, LifetimeMode, RegistryEvent};
use named_actor_registry::RegistryError;
use std::time::Duration;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let system = RegistrySystem::new(RegistryConfig::from_env());
    let mut events = system.service.subscribe();

    let colors = system.service.for_job(JobId(1), Some("colors"));
    let scratch = system.service.for_job(JobId(2), None);

    let orange = ActorId(0xa1);
    let apple = ActorId(0xb2);

    async {
        colors
            .register(None, "orange", orange, LifetimeMode::Detached)
            .await
            .map_err(|e| e.to_string())?;

        match colors.resolve(Some("fruit"), "orange").await {
            Err(RegistryError::NotFound { .. }) => info!("orange is not visible from fruit"),
            other => warn!(?other, "Unexpected resolve outcome"),
        }
        let found = colors.resolve(None, "orange").await.map_err(|e| e.to_string())?;
        info!(actor_id = %found, "orange resolved in colors");
        Ok::<_, String>(())
    }
    .instrument(tracing::info_span!("job_1"))
    .await?;

    async {
        scratch
            .actor_created(apple, LifetimeMode::Owned)
            .await
            .map_err(|e| e.to_string())?;
        scratch
            .register(None, "apple", apple, LifetimeMode::Owned)
            .await
            .map_err(|e| e.to_string())?;
        info!(namespace = %scratch.namespace(), "apple registered");
        Ok::<_, String>(())
    }
    .instrument(tracing::info_span!("job_2"))
    .await?;

    for job in [JobId(1), JobId(2)] {
        system
            .service
            .job_terminated(job)
            .await
            .map_err(|e| e.to_string())?;
    }

    // apple was evicted before job_terminated returned.
    let freed = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match events.recv().await {
                Ok(RegistryEvent::NameFreed { name, reason, .. }) => break Some((name, reason)),
                Ok(_) => continue,
                Err(_) => break None,
            }
        }
    })
    .await
    .ok()
    .flatten();
    match freed {
        Some((name, reason)) => info!(%name, ?reason, "Name freed"),
        None => warn!("No NameFreed event observed"),
    }

    match scratch.resolve(None, "apple").await {
        Err(RegistryError::NotFound { .. }) => info!("apple is gone with job_2"),
        other => warn!(?other, "apple still resolvable"),
    }
    let survived = colors.resolve(None, "orange").await.map_err(|e| e.to_string())?;
    info!(actor_id = %survived, "orange survived job_1");

    let all = system.service.list_all().await.map_err(|e| e.to_string())?;
    info!(?all, "Registry contents");

    drop(colors);
    drop(scratch);
    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
