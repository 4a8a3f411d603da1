//! # Configuration
//!
//! [`RegistryConfig`] sizes the actor mailboxes and the event channel and
//! names the job this process runs as. It deserializes with serde (missing
//! fields take their defaults) or is read from `REGISTRY_*` environment
//! variables.

use crate::model::JobId;
use crate::namespace::NamespaceContext;
use crate::tracker::DEFAULT_RETENTION;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const ENV_JOB_ID: &str = "REGISTRY_JOB_ID";
pub const ENV_NAMESPACE: &str = "REGISTRY_NAMESPACE";
pub const ENV_STORE_BUFFER: &str = "REGISTRY_STORE_BUFFER";
pub const ENV_TRACKER_BUFFER: &str = "REGISTRY_TRACKER_BUFFER";
pub const ENV_EVENT_CAPACITY: &str = "REGISTRY_EVENT_CAPACITY";
pub const ENV_TOMBSTONE_RETENTION_SECS: &str = "REGISTRY_TOMBSTONE_RETENTION_SECS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegistryConfig {
    /// The job this process runs as.
    pub job: JobId,
    /// Namespace to join; `None` joins the job's anonymous namespace.
    pub namespace: Option<String>,
    pub store_buffer: usize,
    pub tracker_buffer: usize,
    /// Capacity of the `RegistryEvent` broadcast channel. Slow subscribers
    /// past this many events observe a lag.
    pub event_capacity: usize,
    /// How long the tracker remembers terminated jobs and destroyed actors.
    /// A registration arriving later than this is no longer evicted on sight.
    pub tombstone_retention_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            job: JobId(1),
            namespace: None,
            store_buffer: 256,
            tracker_buffer: 256,
            event_capacity: 1024,
            tombstone_retention_secs: DEFAULT_RETENTION.as_secs(),
        }
    }
}

impl RegistryConfig {
    /// Reads the `REGISTRY_*` variables over the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            job: JobId(parse_or(&lookup, ENV_JOB_ID, defaults.job.0)),
            namespace: lookup(ENV_NAMESPACE).filter(|ns| !ns.is_empty()),
            store_buffer: positive_or(&lookup, ENV_STORE_BUFFER, defaults.store_buffer),
            tracker_buffer: positive_or(&lookup, ENV_TRACKER_BUFFER, defaults.tracker_buffer),
            event_capacity: positive_or(&lookup, ENV_EVENT_CAPACITY, defaults.event_capacity),
            tombstone_retention_secs: parse_or(
                &lookup,
                ENV_TOMBSTONE_RETENTION_SECS,
                defaults.tombstone_retention_secs,
            ),
        }
    }

    pub fn tombstone_retention(&self) -> Duration {
        Duration::from_secs(self.tombstone_retention_secs)
    }

    /// The namespace context for this process's job.
    pub fn namespace_context(&self) -> NamespaceContext {
        NamespaceContext::for_job(self.job, self.namespace.as_deref())
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, %default, "Unparsable value, using default");
                default
            }
        },
    }
}

// Channel capacities must be non-zero; tokio panics otherwise.
fn positive_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    match parse_or(lookup, key, default) {
        0 => {
            warn!(key, %default, "Zero capacity, using default");
            default
        }
        n => n,
    }
}
