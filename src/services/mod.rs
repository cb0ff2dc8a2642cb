//! Business logic services.
//!
//! Services orchestrate the remote API and the pure decision functions.

mod sweeper;

pub use sweeper::{DiscussionSweeper, SweepPlan, SweepReport};
