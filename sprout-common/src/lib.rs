//! # Sprout Common Library
//!
//! Shared code for the Sprout caregiver client crates including:
//! - Wire model of the child snapshot (milestones, pending actions, timeline)
//! - Event types (StudioEvent enum) and the EventBus
//! - Configuration loading
//! - Time and display formatting helpers

pub mod config;
pub mod error;
pub mod events;
pub mod human_time;
pub mod model;
pub mod time;

pub use error::{Error, Result};
pub use model::{ChildId, MilestoneId, MilestoneState};
