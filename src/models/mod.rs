//! Data models for the sweeper.
//!
//! Records read from GitHub and the small enums that steer a run.

mod discussion;
mod mode;

pub use discussion::{Discussion, DiscussionCategory};
pub use mode::CleanupMode;
