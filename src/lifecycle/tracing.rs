//! # Observability & Tracing
//!
//! Structured logging for the registry with the `tracing` crate.
//!
//! The subscriber uses the compact format without module targets; spans from
//! `#[instrument]`ed client calls show inline (`register{job=job_1}: ...`).
//! Levels come from `RUST_LOG` and default to `info`.
//!
//! ```bash
//! RUST_LOG=info cargo run
//!
//! # Resolve misses, request payloads and actor loop traffic
//! RUST_LOG=debug cargo run
//!
//! RUST_LOG=named_actor_registry::tracker=debug cargo run
//! ```
//!
//! ## What gets logged
//!
//! - Actor start and shutdown, with the final table size
//! - `Bound`, `Removed`, `Evicted` in the Store, at `info`
//! - Lifetime events published by the Tracker, at `info`
//! - `NotFound` on resolve, at `debug` only; a miss is a normal outcome
//! - Namespace mismatches inside the Store, at `error`
//!
//! With `RUST_LOG=info` the example scenario reads:
//!
//! ```text
//! INFO Actor started actor="NameStore"
//! INFO register{job=job_1 ...}: Bound namespace=colors name=orange actor_id=00000000000000a1 lifetime=detached
//! INFO Liveness changed event=ActorUnreachable { actor_id: ActorId(178), binding: Some(BindingId(2)) }
//! INFO Name freed namespace=anonymous-job_2 name=apple actor_id=... reason=OwnerExited
//! ```

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Panics if one is already set; call once
/// from `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`] but tolerates an existing subscriber, for tests
/// that each try to install one.
pub fn try_setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .compact()
        .with_test_writer()
        .try_init();
}
