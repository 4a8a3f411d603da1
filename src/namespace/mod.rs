//! # Namespace Resolver
//!
//! Works out which namespace a caller's request lands in. The process-wide
//! default is fixed when the process joins the cluster and travels as an
//! explicit [`NamespaceContext`] value; there is no global state.

use crate::model::{JobId, Namespace};
use serde::{Deserialize, Serialize};

/// The namespace a process joined, threaded through every registry call.
///
/// Immutable once built: a process keeps the same default for the life of its
/// connection to the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceContext {
    default: Namespace,
}

impl NamespaceContext {
    /// Joins `default`. An empty string is not a namespace, so it falls back
    /// to the anonymous namespace of job 0.
    pub fn new(default: &str) -> Self {
        Self::for_job(JobId(0), Some(default))
    }

    /// Joins the namespace for a job: the explicit one when present and
    /// non-empty, otherwise an anonymous namespace derived from the job.
    pub fn for_job(job: JobId, explicit: Option<&str>) -> Self {
        let default = explicit
            .and_then(Namespace::parse)
            .unwrap_or_else(|| Namespace::new_unchecked(format!("anonymous-{job}")));
        Self { default }
    }

    pub fn default_namespace(&self) -> &Namespace {
        &self.default
    }

    /// `EffectiveNamespace`: the explicit override verbatim if present and
    /// non-empty, otherwise the inherited default. Never fails.
    pub fn effective(&self, explicit: Option<&str>) -> Namespace {
        explicit
            .and_then(Namespace::parse)
            .unwrap_or_else(|| self.default.clone())
    }
}
