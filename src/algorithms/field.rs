//! Field-wide aiming and mirror ring layout
//!
//! All local coordinates share one frame: horizontal origin at the tower base,
//! vertical origin at the ground datum. The focal point therefore sits at
//! `(0, 0, tower.height + focal_height_offset)` and each mirror at its own height.

use crate::algorithms::aiming::aim;
use crate::algorithms::projection::{offset, project_with_height};
use crate::core::{
    AimResult, AimingError, CartesianPoint, FieldConfiguration, GeoPoint, MirrorOrientation,
    SunState,
};
use log::debug;
use std::f64::consts::TAU;

/// Orientation for one mirror, tagged with its position in the field
pub type IndexedOrientation = (usize, MirrorOrientation);

/// Focal point in the field's local frame
pub fn focal_point_local(field: &FieldConfiguration) -> CartesianPoint {
    let tower = field.tower();
    project_with_height(tower, tower, field.focal_point().height)
}

/// Mirror position in the field's local frame
pub fn mirror_local(field: &FieldConfiguration, mirror: &GeoPoint) -> CartesianPoint {
    project_with_height(mirror, field.tower(), mirror.height)
}

/// Aim every mirror for one sun state
///
/// Output is index-aligned with `field.mirrors()`. The first failing mirror
/// fails the whole tick.
pub fn aim_all(field: &FieldConfiguration, sun: &SunState) -> AimResult<Vec<IndexedOrientation>> {
    sun.validate()?;

    let focal = focal_point_local(field);
    let mut orientations = Vec::with_capacity(field.mirror_count());

    for (index, mirror) in field.mirrors().iter().enumerate() {
        let position = mirror_local(field, mirror);
        let orientation = aim(&position, &focal, sun).map_err(|e| AimingError::MirrorFailed {
            index,
            source: Box::new(e),
        })?;
        orientations.push((index, orientation));
    }

    debug!(
        "aimed {} mirrors for sun elevation {:.2}°, azimuth {:.2}°",
        orientations.len(),
        sun.elevation,
        sun.azimuth
    );

    Ok(orientations)
}

/// Aim every mirror, keeping per-mirror failures instead of aborting
pub fn aim_each(field: &FieldConfiguration, sun: &SunState) -> Vec<AimResult<MirrorOrientation>> {
    let focal = focal_point_local(field);

    field
        .mirrors()
        .iter()
        .map(|mirror| aim(&mirror_local(field, mirror), &focal, sun))
        .collect()
}

/// Mirrors evenly spaced on a ring around the tower, starting due north and going clockwise
pub fn ring_mirrors(tower: &GeoPoint, count: usize, radius_m: f64, mirror_height: f64) -> Vec<GeoPoint> {
    (0..count)
        .map(|k| {
            let angle = TAU * k as f64 / count as f64;
            let north = radius_m * angle.cos();
            let east = radius_m * angle.sin();
            offset(tower, east, north, mirror_height)
        })
        .collect()
}
