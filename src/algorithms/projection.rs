//! Flat-earth projection between geographic and local Cartesian frames
//!
//! Uses a fixed-latitude small-angle approximation: one degree of latitude is
//! `METERS_PER_DEGREE` meters and one degree of longitude shrinks by the cosine
//! of the origin latitude. Only valid for fields a few kilometers across.
//!
//! The origin is always the observer and `point` the target, so the returned
//! vector points from origin to point.

use crate::core::{CartesianPoint, GeoPoint, METERS_PER_DEGREE};

fn meters_per_degree_lon(latitude: f64) -> f64 {
    METERS_PER_DEGREE * latitude.to_radians().cos()
}

/// Project `point` into the local frame centered on `origin`
pub fn project(point: &GeoPoint, origin: &GeoPoint) -> CartesianPoint {
    project_with_height(point, origin, point.height - origin.height)
}

/// Project `point` relative to `origin` with an explicitly supplied vertical offset
pub fn project_with_height(point: &GeoPoint, origin: &GeoPoint, dz: f64) -> CartesianPoint {
    let dx = (point.longitude - origin.longitude) * meters_per_degree_lon(origin.latitude);
    let dy = (point.latitude - origin.latitude) * METERS_PER_DEGREE;

    CartesianPoint::new(dx, dy, dz)
}

/// Geographic point lying `east_m` / `north_m` meters from `origin`, at absolute `height`
pub fn offset(origin: &GeoPoint, east_m: f64, north_m: f64, height: f64) -> GeoPoint {
    GeoPoint {
        latitude: origin.latitude + north_m / METERS_PER_DEGREE,
        longitude: origin.longitude + east_m / meters_per_degree_lon(origin.latitude),
        height,
    }
}

/// Inverse of [`project`]: local point back to geographic coordinates
pub fn unproject(local: &CartesianPoint, origin: &GeoPoint) -> GeoPoint {
    offset(origin, local.x, local.y, origin.height + local.z)
}

/// Validation helpers for geographic input
pub struct ProjectionValidator;

impl ProjectionValidator {
    pub fn validate_geo(point: &GeoPoint) -> Result<(), &'static str> {
        if !point.latitude.is_finite() || point.latitude < -90.0 || point.latitude > 90.0 {
            return Err("Invalid latitude: must be between -90 and 90 degrees");
        }

        if !point.longitude.is_finite() || point.longitude < -180.0 || point.longitude > 180.0 {
            return Err("Invalid longitude: must be between -180 and 180 degrees");
        }

        if !point.height.is_finite() {
            return Err("Invalid height: must be finite");
        }

        // cos(latitude) vanishes at the poles
        if point.latitude.abs() > 89.9 {
            return Err("Origin too close to a pole for flat-earth projection");
        }

        Ok(())
    }

    /// Check a projected point stays inside the region the approximation covers
    pub fn validate_extent(local: &CartesianPoint, max_extent_m: f64) -> Result<(), &'static str> {
        let distance = (local.x * local.x + local.y * local.y).sqrt();

        if distance > max_extent_m {
            return Err("Point outside flat-earth validity region");
        }

        Ok(())
    }

    /// Check `point` stands clear of the vertical axis through `origin`
    pub fn validate_separation(
        point: &GeoPoint,
        origin: &GeoPoint,
        min_distance_m: f64,
    ) -> Result<(), &'static str> {
        let horizontal = project(point, origin).horizontal_distance_to(&CartesianPoint::origin());

        if horizontal.is_nan() || horizontal < min_distance_m {
            return Err("Point too close to the origin's vertical axis");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MAX_FLAT_EARTH_EXTENT_M, MIN_TARGET_DISTANCE_M};
    use float_eq::assert_float_eq;

    fn tower() -> GeoPoint {
        GeoPoint::new(35.6892, 51.3890, 100.0)
    }

    #[test]
    fn test_project_origin_onto_itself() {
        let origin = tower();
        let local = project(&origin, &origin);
        assert_eq!(local, CartesianPoint::new(0.0, 0.0, 0.0));

        let raised = origin.with_height(105.0);
        let local = project(&raised, &origin);
        assert_eq!(local, CartesianPoint::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_project_north_and_east() {
        let origin = GeoPoint::new(0.0, 0.0, 0.0);

        let north = GeoPoint::new(0.001, 0.0, 0.0);
        let local = project(&north, &origin);
        assert_float_eq!(local.x, 0.0, abs <= 1e-9);
        assert_float_eq!(local.y, 111.111, abs <= 1e-6);

        let east = GeoPoint::new(0.0, 0.001, 0.0);
        let local = project(&east, &origin);
        assert_float_eq!(local.x, 111.111, abs <= 1e-6);
        assert_float_eq!(local.y, 0.0, abs <= 1e-9);
    }

    #[test]
    fn test_longitude_shrinks_with_latitude() {
        let origin = GeoPoint::new(60.0, 10.0, 0.0);
        let east = GeoPoint::new(60.0, 10.001, 0.0);
        let local = project(&east, &origin);
        // cos(60°) = 0.5
        assert_float_eq!(local.x, 55.5555, abs <= 1e-3);
    }

    #[test]
    fn test_projection_antisymmetry() {
        let a = tower();
        let b = offset(&a, 120.0, -80.0, 5.0);

        let ab = project(&b, &a);
        let ba = project(&a, &b);

        // Longitude scale uses each origin's latitude, so agreement is approximate
        assert_float_eq!(ab.x, -ba.x, abs <= 1e-2);
        assert_float_eq!(ab.y, -ba.y, abs <= 1e-9);
        assert_float_eq!(ab.z, -ba.z, abs <= 1e-12);
    }

    #[test]
    fn test_explicit_height() {
        let origin = tower();
        let mirror = offset(&origin, 200.0, 0.0, 5.0);
        let local = project_with_height(&origin, &mirror, 0.0);
        assert_float_eq!(local.x, -200.0, abs <= 1e-3);
        assert_eq!(local.z, 0.0);
    }

    #[test]
    fn test_offset_unproject_inverse() {
        let origin = tower();
        let local = CartesianPoint::new(-150.0, 75.0, -95.0);
        let geo = unproject(&local, &origin);
        let back = project(&geo, &origin);

        assert_float_eq!(back.x, local.x, abs <= 1e-6);
        assert_float_eq!(back.y, local.y, abs <= 1e-6);
        assert_float_eq!(back.z, local.z, abs <= 1e-9);
    }

    #[test]
    fn test_validation() {
        assert!(ProjectionValidator::validate_geo(&tower()).is_ok());
        assert!(ProjectionValidator::validate_geo(&GeoPoint::new(91.0, 0.0, 0.0)).is_err());
        assert!(ProjectionValidator::validate_geo(&GeoPoint::new(0.0, 181.0, 0.0)).is_err());
        assert!(ProjectionValidator::validate_geo(&GeoPoint::new(89.95, 0.0, 0.0)).is_err());
        assert!(ProjectionValidator::validate_geo(&GeoPoint::new(0.0, 0.0, f64::INFINITY)).is_err());

        let near = CartesianPoint::new(200.0, 0.0, 0.0);
        let far = CartesianPoint::new(20_000.0, 0.0, 0.0);
        assert!(ProjectionValidator::validate_extent(&near, MAX_FLAT_EARTH_EXTENT_M).is_ok());
        assert!(ProjectionValidator::validate_extent(&far, MAX_FLAT_EARTH_EXTENT_M).is_err());
    }

    #[test]
    fn test_separation_ignores_height() {
        let origin = tower();
        let min = MIN_TARGET_DISTANCE_M;

        // About 14 nm off the axis: indistinguishable from it
        let nudged = GeoPoint::new(origin.latitude + 1e-13, origin.longitude + 1e-13, 5.0);
        assert!(ProjectionValidator::validate_separation(&nudged, &origin, min).is_err());
        assert!(ProjectionValidator::validate_separation(&origin.with_height(500.0), &origin, min).is_err());

        let clear = offset(&origin, 0.0, 0.5, 5.0);
        assert!(ProjectionValidator::validate_separation(&clear, &origin, min).is_ok());

        let broken = GeoPoint::new(f64::NAN, origin.longitude, 5.0);
        assert!(ProjectionValidator::validate_separation(&broken, &origin, min).is_err());
    }
}
