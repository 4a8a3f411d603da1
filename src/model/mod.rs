//! Pure data structures shared by every component. All of them serialize with
//! `serde`, so they can cross whatever transport fronts the registry.

pub mod binding;
pub mod events;
pub mod ids;

pub use binding::*;
pub use events::*;
pub use ids::*;
