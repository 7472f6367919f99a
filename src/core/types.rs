//! Core data types for heliostat aiming

use crate::algorithms::projection::ProjectionValidator;
use crate::core::constants::MIN_TARGET_DISTANCE_M;
use crate::core::error::{AimResult, AimingError};
use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Geographic position with height above the shared ground datum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Height above ground datum in meters
    pub height: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64, height: f64) -> Self {
        Self {
            latitude,
            longitude,
            height,
        }
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }
}

/// Local flat-earth position: x east, y north, z up (meters)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn magnitude(&self) -> f64 {
        self.to_vector3().norm()
    }

    /// Vector pointing from `self` to `target`
    pub fn vector_to(&self, target: &CartesianPoint) -> CartesianPoint {
        (target.to_vector3() - self.to_vector3()).into()
    }

    /// Horizontal (ground-plane) distance to another point
    pub fn horizontal_distance_to(&self, other: &CartesianPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<Vector3<f64>> for CartesianPoint {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Sun position reported by the ephemeris for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunState {
    /// Angle above the horizon, degrees in [-90, 90]
    pub elevation: f64,
    /// Compass bearing clockwise from north, degrees in [0, 360)
    pub azimuth: f64,
    pub timestamp: DateTime<Utc>,
}

impl SunState {
    /// Build a sun state, rejecting angles outside their documented domain
    pub fn new(elevation: f64, azimuth: f64, timestamp: DateTime<Utc>) -> AimResult<Self> {
        let state = Self {
            elevation,
            azimuth,
            timestamp,
        };
        state.validate()?;
        Ok(state)
    }

    /// Check the angles without clamping; an out-of-range value points at an upstream fault
    pub fn validate(&self) -> AimResult<()> {
        if !self.elevation.is_finite() || !(-90.0..=90.0).contains(&self.elevation) {
            return Err(AimingError::InvalidSunState {
                parameter: "elevation".to_string(),
                value: self.elevation,
            });
        }
        if !self.azimuth.is_finite() || !(0.0..360.0).contains(&self.azimuth) {
            return Err(AimingError::InvalidSunState {
                parameter: "azimuth".to_string(),
                value: self.azimuth,
            });
        }
        Ok(())
    }

    pub fn is_above_horizon(&self) -> bool {
        self.elevation > 0.0
    }
}

/// Required mirror orientation for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MirrorOrientation {
    /// Degrees above the horizon
    pub elevation: f64,
    /// Compass bearing, degrees in [0, 360)
    pub azimuth: f64,
}

/// Immutable description of the tower and its mirror ring
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfiguration {
    tower: GeoPoint,
    focal_height_offset: f64,
    mirrors: Vec<GeoPoint>,
}

impl FieldConfiguration {
    /// Build a field, enforcing finite input, at least one mirror and no mirror on the tower's axis
    pub fn new(tower: GeoPoint, focal_height_offset: f64, mirrors: Vec<GeoPoint>) -> AimResult<Self> {
        require_finite_point("tower", &tower)?;
        require_finite("focal_height_offset", focal_height_offset)?;

        if mirrors.is_empty() {
            return Err(AimingError::EmptyField);
        }

        for (index, mirror) in mirrors.iter().enumerate() {
            require_finite_point(&format!("mirrors[{}]", index), mirror)?;
            if ProjectionValidator::validate_separation(mirror, &tower, MIN_TARGET_DISTANCE_M).is_err() {
                return Err(AimingError::MirrorAtTower { index });
            }
        }

        Ok(Self {
            tower,
            focal_height_offset,
            mirrors,
        })
    }

    /// Build a field without any checks, for exercising the aiming failure paths
    #[cfg(test)]
    pub(crate) fn unchecked(tower: GeoPoint, focal_height_offset: f64, mirrors: Vec<GeoPoint>) -> Self {
        Self {
            tower,
            focal_height_offset,
            mirrors,
        }
    }

    pub fn tower(&self) -> &GeoPoint {
        &self.tower
    }

    pub fn focal_height_offset(&self) -> f64 {
        self.focal_height_offset
    }

    /// Focal point: tower top raised by the focal offset
    pub fn focal_point(&self) -> GeoPoint {
        self.tower
            .with_height(self.tower.height + self.focal_height_offset)
    }

    pub fn mirrors(&self) -> &[GeoPoint] {
        &self.mirrors
    }

    pub fn mirror_count(&self) -> usize {
        self.mirrors.len()
    }
}

fn require_finite(parameter: &str, value: f64) -> AimResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AimingError::NonFiniteField {
            parameter: parameter.to_string(),
            value,
        })
    }
}

fn require_finite_point(name: &str, point: &GeoPoint) -> AimResult<()> {
    require_finite(&format!("{}.latitude", name), point.latitude)?;
    require_finite(&format!("{}.longitude", name), point.longitude)?;
    require_finite(&format!("{}.height", name), point.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sun_state_domain() {
        assert!(SunState::new(45.0, 180.0, noon()).is_ok());
        assert!(SunState::new(-90.0, 0.0, noon()).is_ok());
        assert!(SunState::new(90.0, 359.999, noon()).is_ok());

        assert!(matches!(
            SunState::new(90.5, 10.0, noon()),
            Err(AimingError::InvalidSunState { .. })
        ));
        assert!(matches!(
            SunState::new(10.0, 360.0, noon()),
            Err(AimingError::InvalidSunState { .. })
        ));
        assert!(SunState::new(f64::NAN, 10.0, noon()).is_err());
        assert!(SunState::new(10.0, -0.5, noon()).is_err());
    }

    #[test]
    fn test_field_requires_mirrors() {
        let tower = GeoPoint::new(35.6892, 51.3890, 100.0);
        let result = FieldConfiguration::new(tower, 5.0, Vec::new());
        assert_eq!(result, Err(AimingError::EmptyField));
    }

    #[test]
    fn test_field_rejects_mirror_under_tower() {
        let tower = GeoPoint::new(35.6892, 51.3890, 100.0);
        let mirrors = vec![
            GeoPoint::new(35.6900, 51.3890, 5.0),
            GeoPoint::new(35.6892, 51.3890, 5.0),
        ];
        let result = FieldConfiguration::new(tower, 5.0, mirrors);
        assert_eq!(result, Err(AimingError::MirrorAtTower { index: 1 }));
    }

    #[test]
    fn test_field_rejects_mirror_nanometres_from_axis() {
        let tower = GeoPoint::new(35.6892, 51.3890, 100.0);
        let mirrors = vec![
            GeoPoint::new(35.6900, 51.3890, 5.0),
            GeoPoint::new(tower.latitude + 1e-13, tower.longitude + 1e-13, 5.0),
        ];
        let result = FieldConfiguration::new(tower, 5.0, mirrors);
        assert_eq!(result, Err(AimingError::MirrorAtTower { index: 1 }));

        // Half a meter away is a legitimate, if cramped, placement
        let close = vec![GeoPoint::new(tower.latitude + 0.5 / 111_111.0, tower.longitude, 5.0)];
        assert!(FieldConfiguration::new(tower, 5.0, close).is_ok());
    }

    #[test]
    fn test_field_rejects_non_finite_input() {
        let tower = GeoPoint::new(35.6892, 51.3890, 100.0);
        let mirror = GeoPoint::new(35.6900, 51.3890, 5.0);

        let nan_offset = FieldConfiguration::new(tower, f64::NAN, vec![mirror]);
        assert!(matches!(
            nan_offset,
            Err(AimingError::NonFiniteField { ref parameter, .. }) if parameter == "focal_height_offset"
        ));

        let bad_tower = tower.with_height(f64::INFINITY);
        assert!(matches!(
            FieldConfiguration::new(bad_tower, 5.0, vec![mirror]),
            Err(AimingError::NonFiniteField { ref parameter, .. }) if parameter == "tower.height"
        ));

        let bad_mirror = GeoPoint::new(35.6900, f64::NAN, 5.0);
        assert!(matches!(
            FieldConfiguration::new(tower, 5.0, vec![mirror, bad_mirror]),
            Err(AimingError::NonFiniteField { ref parameter, .. }) if parameter == "mirrors[1].longitude"
        ));
    }

    #[test]
    fn test_focal_point_height() {
        let tower = GeoPoint::new(35.6892, 51.3890, 100.0);
        let field =
            FieldConfiguration::new(tower, 5.0, vec![GeoPoint::new(35.69, 51.39, 5.0)]).unwrap();
        let focal = field.focal_point();
        assert_eq!(focal.height, 105.0);
        assert_eq!(focal.latitude, tower.latitude);
        assert_eq!(field.mirror_count(), 1);
    }

    #[test]
    fn test_cartesian_helpers() {
        let a = CartesianPoint::new(200.0, 0.0, 5.0);
        let b = CartesianPoint::new(0.0, 0.0, 5.0);
        let d = a.vector_to(&b);
        assert_eq!(d, CartesianPoint::new(-200.0, 0.0, 0.0));
        assert!((d.magnitude() - 200.0).abs() < 1e-12);
        assert!((a.horizontal_distance_to(&b) - 200.0).abs() < 1e-12);
    }
}
