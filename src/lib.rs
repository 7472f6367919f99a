//! Heliostat Field Aiming
//!
//! Computes the orientation each flat mirror in a central-tower solar field must
//! hold so that sunlight reflects onto the focal point atop the tower.

pub mod core;
pub mod algorithms;
pub mod ephemeris;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{
    AimingError, AimResult, CartesianPoint, FieldConfiguration, GeoPoint, MirrorOrientation,
    SunState,
};
pub use algorithms::{aim, aim_all, aim_each, project, to_vector, AimSolution};
pub use ephemeris::{ApproximateEphemeris, EphemerisError, ScriptedSunProvider, SolarPositionProvider};
pub use utils::{ConfigurationManager, ConfigError, HeliostatConfig, MirrorLayout, TrackingConfig};
pub use api::{SchedulerState, TickReport, TrackingError, TrackingResult, TrackingScheduler};
