//! Heliostat aiming engine
//!
//! A mirror's surface orientation is approximated as the angular bisector between
//! the sun direction and the direction from the mirror to the focal point. Elevation
//! is averaged directly; azimuth is averaged on the compass circle so that bearings
//! either side of north (e.g. 350° and 10°) meet at 0° rather than 180°.

use crate::core::{
    AimResult, AimingError, CartesianPoint, MirrorOrientation, SunState, MIN_TARGET_DISTANCE_M,
};
use serde::{Deserialize, Serialize};

/// Aiming result together with the mirror-to-target bearing it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimSolution {
    /// Straight-line distance from mirror to focal point (meters)
    pub target_distance: f64,
    /// Elevation of the focal point seen from the mirror (degrees)
    pub elevation_to_target: f64,
    /// Compass bearing of the focal point seen from the mirror (degrees)
    pub azimuth_to_target: f64,
    pub orientation: MirrorOrientation,
}

/// Wrap an angle in degrees into [0, 360)
pub fn normalize_azimuth(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Bearing midway between two compass bearings, measured on the circle
///
/// Diametrically opposite bearings have no unique mean; the arithmetic
/// mid-bearing is returned, which is equidistant from both.
pub fn circular_mean(a: f64, b: f64) -> f64 {
    let (sin_a, cos_a) = a.to_radians().sin_cos();
    let (sin_b, cos_b) = b.to_radians().sin_cos();
    let sin_sum = sin_a + sin_b;
    let cos_sum = cos_a + cos_b;

    if sin_sum.hypot(cos_sum) < 1e-12 {
        return normalize_azimuth((a + b) / 2.0);
    }

    normalize_azimuth(sin_sum.atan2(cos_sum).to_degrees())
}

/// Orientation a mirror at `mirror` must hold to send sunlight to `focal_point`
pub fn aim(
    mirror: &CartesianPoint,
    focal_point: &CartesianPoint,
    sun: &SunState,
) -> AimResult<MirrorOrientation> {
    aim_detailed(mirror, focal_point, sun).map(|solution| solution.orientation)
}

/// Same as [`aim`], keeping the intermediate target bearing
pub fn aim_detailed(
    mirror: &CartesianPoint,
    focal_point: &CartesianPoint,
    sun: &SunState,
) -> AimResult<AimSolution> {
    sun.validate()?;

    let d = mirror.vector_to(focal_point);
    let target_distance = d.magnitude();

    if !target_distance.is_finite() || target_distance < MIN_TARGET_DISTANCE_M {
        return Err(AimingError::GeometryDegenerate {
            distance: target_distance,
            details: "mirror coincides with focal point".to_string(),
        });
    }

    let ratio = d.z / target_distance;
    if !(-1.0..=1.0).contains(&ratio) {
        return Err(AimingError::GeometryDegenerate {
            distance: target_distance,
            details: format!("elevation ratio {} outside [-1, 1]", ratio),
        });
    }

    let elevation_to_target = ratio.asin().to_degrees();
    let azimuth_to_target = normalize_azimuth(d.x.atan2(d.y).to_degrees());

    let orientation = MirrorOrientation {
        elevation: (elevation_to_target + sun.elevation) / 2.0,
        azimuth: circular_mean(azimuth_to_target, sun.azimuth),
    };

    Ok(AimSolution {
        target_distance,
        elevation_to_target,
        azimuth_to_target,
        orientation,
    })
}
