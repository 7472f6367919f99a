//! Low-precision analytical sun position
//!
//! Propagates the Earth-Moon barycentre with the JPL approximate Keplerian
//! elements (1800–2050 table), rotates the result into an Earth-fixed frame with
//! the Earth rotation angle, and projects it onto the observer's east-north-up
//! frame. Precession, nutation, aberration and UT1-UTC are ignored; the result
//! agrees with full ephemerides to within about a degree.
//!
//! Reported elevations are apparent: Sæmundsson's refraction formula for a
//! standard atmosphere (1010 hPa, 10 °C) lifts the sun by about half a degree at
//! the horizon. Use [`ApproximateEphemeris::geometric`] for true elevation.

#![allow(non_snake_case)]

use crate::algorithms::aiming::normalize_azimuth;
use crate::core::SunState;
use crate::ephemeris::{validate_location, EphemerisError, EphemerisResult, SolarPositionProvider};
use chrono::{DateTime, Utc};
use nalgebra::{Matrix3, Vector3};
use std::f64::consts::{PI, TAU};

/// UNIX time of J2000.0 in terrestrial time
const J2000_EPOCH_UNIX: f64 = 946_727_935.816;

/// UNIX time of 2000-01-01T12:00:00 UTC
const J2000_NOON_UTC_UNIX: f64 = 946_728_000.0;

/// Mean obliquity of the ecliptic at J2000 (degrees)
const OBLIQUITY_DEG: f64 = 23.43928;

const KEPLER_MAX_ITERATIONS: usize = 30;

/// Below this true elevation the sun's disc has set and refraction is not applied (degrees)
const REFRACTION_LIMIT_DEG: f64 = -0.83337;

/// Analytical sun-position model
#[derive(Debug, Clone)]
pub struct ApproximateEphemeris {
    refraction: bool,
}

impl ApproximateEphemeris {
    /// Model reporting apparent (refracted) elevation
    pub fn new() -> Self {
        Self { refraction: true }
    }

    /// Model reporting true geometric elevation
    pub fn geometric() -> Self {
        Self { refraction: false }
    }

    /// Unit vector toward the sun in the observer's east-north-up frame
    pub fn sun_direction(&self, timestamp: &DateTime<Utc>, latitude: f64, longitude: f64) -> Vector3<f64> {
        let T = days_since(timestamp, J2000_EPOCH_UNIX) / 36525.0;

        let e = 0.01673163 - 0.00003661 * T;
        let I = (-0.00054346 - 0.01337178 * T).to_radians();
        let L = (100.46691572 + 35999.37306329 * T).to_radians();
        let w_bar = (102.93005885 + 0.31795260 * T).to_radians();
        let node = (-5.11260389 - 0.24123856 * T).to_radians();

        let w = w_bar - node;
        let M = wrap_angle(L - w_bar);
        let E = solve_kepler(M, e);

        let orbital = Vector3::new(E.cos() - e, (1.0 - e * e).sqrt() * E.sin(), 0.0);
        let equatorial =
            rot_x(-OBLIQUITY_DEG.to_radians()) * (rot_z(-node) * (rot_x(-I) * (rot_z(-w) * orbital)));

        // Earth relative to the sun, flipped to the sun relative to Earth
        let celestial = -equatorial;
        let terrestrial = rot_z(earth_rotation_angle(timestamp)) * celestial;

        let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
        let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();
        let up = Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat);
        let east = Vector3::z().cross(&up).normalize();
        let north = up.cross(&east);

        let to_enu = Matrix3::from_rows(&[east.transpose(), north.transpose(), up.transpose()]);
        to_enu * terrestrial.normalize()
    }
}

impl Default for ApproximateEphemeris {
    fn default() -> Self {
        Self::new()
    }
}

/// Atmospheric refraction (degrees) to add to a true elevation in degrees
pub fn refraction(true_elevation: f64) -> f64 {
    if true_elevation < REFRACTION_LIMIT_DEG {
        return 0.0;
    }

    let arcmin = 1.02 / (true_elevation + 10.3 / (true_elevation + 5.11)).to_radians().tan();
    arcmin / 60.0
}

impl SolarPositionProvider for ApproximateEphemeris {
    fn solar_position(
        &mut self,
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
    ) -> EphemerisResult<SunState> {
        validate_location(latitude, longitude)?;

        // East vector is undefined exactly at the poles
        if latitude.abs() >= 90.0 {
            return Err(EphemerisError::InvalidLocation {
                latitude,
                longitude,
            });
        }

        let direction = self.sun_direction(&timestamp, latitude, longitude);
        let mut elevation = direction.z.clamp(-1.0, 1.0).asin().to_degrees();
        if self.refraction {
            elevation = (elevation + refraction(elevation)).min(90.0);
        }
        let azimuth = normalize_azimuth(direction.x.atan2(direction.y).to_degrees());

        SunState::new(elevation, azimuth, timestamp).map_err(|e| EphemerisError::LookupFailed {
            details: e.to_string(),
        })
    }

    fn name(&self) -> &str {
        "approximate"
    }
}

fn days_since(timestamp: &DateTime<Utc>, epoch_unix: f64) -> f64 {
    let seconds = timestamp.timestamp() as f64 - epoch_unix
        + 1e-9 * timestamp.timestamp_subsec_nanos() as f64;
    seconds / 86400.0
}

/// Earth rotation angle (radians), treating UTC as UT1
fn earth_rotation_angle(timestamp: &DateTime<Utc>) -> f64 {
    let t = days_since(timestamp, J2000_NOON_UTC_UNIX);
    (t.fract() + 0.779057273264 + 0.00273781191135448 * t).rem_euclid(1.0) * TAU
}

/// Solve Kepler's equation M = E - e sin E for E
fn solve_kepler(M: f64, e: f64) -> f64 {
    let mut E = M - e * M.sin();
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let dE = (M - (E - e * E.sin())) / (1.0 - e * E.cos());
        E += dE;
        if dE.abs() < 1e-12 {
            break;
        }
    }
    E
}

/// Wrap to [-PI, PI)
fn wrap_angle(x: f64) -> f64 {
    (x + PI).rem_euclid(TAU) - PI
}

fn rot_x(r: f64) -> Matrix3<f64> {
    let (s, c) = r.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

fn rot_z(r: f64) -> Matrix3<f64> {
    let (s, c) = r.sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kepler_solution() {
        let e = 0.0167;
        for M in [-3.0, -1.0, 0.0, 0.5, 2.5] {
            let E = solve_kepler(M, e);
            assert!((E - e * E.sin() - M).abs() < 1e-10);
        }
    }

    #[test]
    fn test_equinox_noon_at_equator() {
        let mut ephemeris = ApproximateEphemeris::new();
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let sun = ephemeris.solar_position(timestamp, 0.0, 0.0).unwrap();
        assert!(sun.elevation > 85.0, "elevation {}", sun.elevation);
    }

    #[test]
    fn test_solstice_noon_in_tehran() {
        let mut ephemeris = ApproximateEphemeris::new();
        // Local solar noon at 51.389°E is about 08:34 UTC
        let timestamp = Utc.with_ymd_and_hms(2024, 6, 21, 8, 34, 0).unwrap();
        let sun = ephemeris.solar_position(timestamp, 35.6892, 51.3890).unwrap();

        let expected_elevation = 90.0 - (35.6892 - 23.44);
        assert!((sun.elevation - expected_elevation).abs() < 1.5, "elevation {}", sun.elevation);
        assert!(sun.azimuth > 140.0 && sun.azimuth < 220.0, "azimuth {}", sun.azimuth);
    }

    #[test]
    fn test_morning_sun_in_the_east() {
        let mut ephemeris = ApproximateEphemeris::new();
        let timestamp = Utc.with_ymd_and_hms(2024, 6, 21, 3, 0, 0).unwrap();
        let sun = ephemeris.solar_position(timestamp, 35.6892, 51.3890).unwrap();
        assert!(sun.elevation > 0.0);
        assert!(sun.azimuth > 45.0 && sun.azimuth < 110.0, "azimuth {}", sun.azimuth);
    }

    #[test]
    fn test_midnight_below_horizon() {
        let mut ephemeris = ApproximateEphemeris::new();
        let timestamp = Utc.with_ymd_and_hms(2024, 6, 21, 20, 34, 0).unwrap();
        let sun = ephemeris.solar_position(timestamp, 35.6892, 51.3890).unwrap();
        assert!(sun.elevation < -20.0);
        assert!(!sun.is_above_horizon());
    }

    #[test]
    fn test_refraction_magnitude() {
        // About 29 arcminutes at the horizon, one arcminute at 45 degrees
        assert!((refraction(0.0) - 0.483).abs() < 0.005, "{}", refraction(0.0));
        assert!((refraction(45.0) * 60.0 - 1.01).abs() < 0.02);
        assert!(refraction(89.99).abs() < 1e-4);
        assert_eq!(refraction(-5.0), 0.0);
    }

    #[test]
    fn test_apparent_elevation_near_sunrise() {
        let timestamp = Utc.with_ymd_and_hms(2024, 6, 21, 1, 20, 0).unwrap();
        let apparent = ApproximateEphemeris::new()
            .solar_position(timestamp, 35.6892, 51.3890)
            .unwrap();
        let geometric = ApproximateEphemeris::geometric()
            .solar_position(timestamp, 35.6892, 51.3890)
            .unwrap();

        assert_eq!(apparent.azimuth, geometric.azimuth);
        let lift = apparent.elevation - geometric.elevation;
        assert!((lift - refraction(geometric.elevation)).abs() < 1e-12);
        assert!(geometric.elevation < REFRACTION_LIMIT_DEG || lift > 0.0);
    }

    #[test]
    fn test_direction_is_unit() {
        let ephemeris = ApproximateEphemeris::new();
        let timestamp = Utc.with_ymd_and_hms(2025, 1, 10, 15, 45, 0).unwrap();
        let direction = ephemeris.sun_direction(&timestamp, -33.9, 18.4);
        assert!((direction.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_poles_and_bad_coordinates() {
        let mut ephemeris = ApproximateEphemeris::new();
        let timestamp = Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
        assert!(ephemeris.solar_position(timestamp, 90.0, 0.0).is_err());
        assert!(ephemeris.solar_position(timestamp, 10.0, 200.0).is_err());
    }
}
