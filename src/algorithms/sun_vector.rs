//! Sun direction vectors in the local east-north-up frame
//!
//! Azimuth is a compass bearing: 0° points along +y (north) and 90° along +x (east).
//! Every azimuth produced elsewhere in the crate follows the same convention.

use crate::core::{AimResult, AimingError, CartesianPoint, SunState};

/// Direction of length `length` for an (elevation, azimuth) pair in degrees
pub fn direction_vector(elevation: f64, azimuth: f64, length: f64) -> CartesianPoint {
    let (sin_el, cos_el) = elevation.to_radians().sin_cos();
    let (sin_az, cos_az) = azimuth.to_radians().sin_cos();

    CartesianPoint::new(
        length * cos_el * sin_az,
        length * cos_el * cos_az,
        length * sin_el,
    )
}

/// Vector from the ground toward the sun, scaled to `length`
pub fn to_vector(sun: &SunState, length: f64) -> AimResult<CartesianPoint> {
    sun.validate()?;

    if !length.is_finite() {
        return Err(AimingError::InvalidSunState {
            parameter: "length".to_string(),
            value: length,
        });
    }

    Ok(direction_vector(sun.elevation, sun.azimuth, length))
}

/// Unit vector toward the sun
pub fn to_unit_vector(sun: &SunState) -> AimResult<CartesianPoint> {
    to_vector(sun, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use float_eq::assert_float_eq;

    fn sun(elevation: f64, azimuth: f64) -> SunState {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap();
        SunState::new(elevation, azimuth, timestamp).unwrap()
    }

    #[test]
    fn test_magnitude_matches_length() {
        for elevation in [-90.0, -45.0, -1.0, 0.0, 12.5, 60.0, 90.0] {
            for azimuth in [0.0, 45.0, 90.0, 179.9, 180.0, 270.0, 359.9] {
                for length in [1.0, 50.0] {
                    let v = to_vector(&sun(elevation, azimuth), length).unwrap();
                    assert_float_eq!(v.magnitude(), length, abs <= 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_compass_convention() {
        let north = to_unit_vector(&sun(0.0, 0.0)).unwrap();
        assert_float_eq!(north.x, 0.0, abs <= 1e-12);
        assert!(north.y > 0.0);

        let east = to_unit_vector(&sun(0.0, 90.0)).unwrap();
        assert!(east.x > 0.0);
        assert_float_eq!(east.y, 0.0, abs <= 1e-12);

        let south = to_unit_vector(&sun(0.0, 180.0)).unwrap();
        assert!(south.y < 0.0);

        let west = to_unit_vector(&sun(0.0, 270.0)).unwrap();
        assert!(west.x < 0.0);
    }

    #[test]
    fn test_zenith_and_elevation() {
        let zenith = to_unit_vector(&sun(90.0, 123.0)).unwrap();
        assert_float_eq!(zenith.z, 1.0, abs <= 1e-12);
        assert_float_eq!(zenith.x, 0.0, abs <= 1e-12);
        assert_float_eq!(zenith.y, 0.0, abs <= 1e-12);

        let v = to_vector(&sun(30.0, 0.0), 50.0).unwrap();
        assert_float_eq!(v.z, 25.0, abs <= 1e-9);
    }

    #[test]
    fn test_rejects_invalid_sun_state() {
        let mut bad = sun(10.0, 10.0);
        bad.azimuth = 361.0;
        assert!(matches!(
            to_vector(&bad, 1.0),
            Err(AimingError::InvalidSunState { .. })
        ));

        assert!(to_vector(&sun(10.0, 10.0), f64::NAN).is_err());
    }
}
