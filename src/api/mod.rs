//! Tick scheduling around the aiming core
//!
//! The scheduler replaces a free-running polling loop: it owns the timer, the tick
//! counter and the sun-position provider, and hands each tick's sun state to the
//! pure field aggregator.

pub mod scheduler;
pub mod types;

pub use scheduler::TrackingScheduler;
pub use types::{SchedulerState, TickReport, TrackingError, TrackingResult};
