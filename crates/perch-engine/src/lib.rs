//! Controller tying log clients, witness quorum and presentation together.
//!
//! The [`Controller`] owns the selected log and publishes every result,
//! error included, to a [`ViewModel`]. [`spawn_refresher`] keeps the
//! published checkpoints current in the background.

pub mod controller;
pub mod error;
pub mod model;
pub mod refresher;

pub use controller::Controller;
pub use error::{ControllerError, ErrorKind};
pub use model::{CheckpointState, CheckpointStatus, LeafState, StateModel, ViewModel};
pub use refresher::{DEFAULT_REFRESH_INTERVAL, spawn_refresher};

#[cfg(test)]
mod tests;
