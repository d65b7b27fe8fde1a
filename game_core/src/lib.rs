//! # Game Core
//!
//! The frame-driven runtime of the overworld. It sequences scripted
//! activities, follows interaction chains once the activity queue drains, and
//! streams the 3×3 chunk neighborhood around the player without stalling the
//! frame loop.
//!
//! ## Core Components
//!
//! - **activity**: the `Activity` trait, built-in activities, and the two-phase
//!   entry/commit scheduler
//! - **interaction_chain**: continues dialog/cutscene chains when the queue empties
//! - **streaming**: chunk renderer registry and the resumable streaming pass
//! - **controller**: the single `GameController` that owns all of the above
//!
//! ## Frame Contract
//!
//! The host calls [`GameController::frame`] once per rendered frame. Nothing in
//! this crate blocks or spawns threads; long work is split into units and
//! advanced one unit per frame.

pub mod activity;
pub mod collaborators;
pub mod controller;
pub mod error;
pub mod interaction_chain;
pub mod roster;
pub mod streaming;
pub mod ui;

pub use activity::*;
pub use collaborators::*;
pub use controller::*;
pub use error::*;
pub use interaction_chain::*;
pub use roster::*;
pub use streaming::*;
pub use ui::*;
