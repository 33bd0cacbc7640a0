//! # Sprout Progression Resolver (sprout-path)
//!
//! Turns a child snapshot into the caregiver's progression view:
//! - an ordered milestone path (server order, never re-sorted)
//! - a prioritized action queue with capture navigation
//! - seasonal labels placing each milestone on the calendar
//! - timeline entries with their playback/override affordances
//!
//! Pure and synchronous; all inputs come from the caller.

pub mod actions;
pub mod navigation;
pub mod path;
pub mod resolver;
pub mod season;
pub mod timeline;

pub use actions::{ActionOrigin, ActionQueue, QueuedAction};
pub use navigation::Navigation;
pub use path::{PathNode, ProgressPath};
pub use resolver::{resolve, resolve_snapshot, ChildContext, Progression};
pub use season::{season_label, Quarter, SeasonLabel};
pub use timeline::TimelineEntry;
