//! Geometric constants and field defaults

/// Meters per degree of latitude under the small-angle approximation
pub const METERS_PER_DEGREE: f64 = 111_111.0;

/// Field extent beyond which the flat-earth projection is no longer trustworthy (meters)
pub const MAX_FLAT_EARTH_EXTENT_M: f64 = 10_000.0;

/// Height of the focal point above the tower top (meters)
pub const DEFAULT_FOCAL_HEIGHT_OFFSET_M: f64 = 5.0;

/// Distances below this are treated as coincident points (meters)
pub const MIN_TARGET_DISTANCE_M: f64 = 1e-6;
