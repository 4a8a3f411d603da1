//! Startup, wiring and shutdown of the registry's tasks, plus tracing setup.
//!
//! - [`RegistrySystem`] - spawns the Store, Tracker and Evictor and hands out
//!   the [`RegistryService`](crate::service::RegistryService)
//! - [`setup_tracing`] - installs the log subscriber

pub mod registry_system;
pub mod tracing;

pub use registry_system::*;
pub use self::tracing::*;
