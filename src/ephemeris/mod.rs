//! Sun-position sources
//!
//! The aiming core never computes solar ephemerides itself. It consumes a
//! [`SolarPositionProvider`], which may be a remote service, an analytical
//! model, or a scripted test double.

pub mod approximate;
pub mod error;
pub mod mock;

pub use approximate::ApproximateEphemeris;
pub use error::{EphemerisError, EphemerisResult};
pub use mock::ScriptedSunProvider;

use crate::core::SunState;
use chrono::{DateTime, Utc};

/// Source of solar elevation and azimuth for a time and place
pub trait SolarPositionProvider {
    /// Sun state at `timestamp` seen from `latitude`/`longitude` (degrees)
    ///
    /// Returns elevation in [-90, 90] and azimuth in [0, 360) on success.
    fn solar_position(
        &mut self,
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
    ) -> EphemerisResult<SunState>;

    /// Short name used in log output
    fn name(&self) -> &str;
}

/// Reject locations no provider can answer for
pub fn validate_location(latitude: f64, longitude: f64) -> EphemerisResult<()> {
    let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
    let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);

    if lat_ok && lon_ok {
        Ok(())
    } else {
        Err(EphemerisError::InvalidLocation {
            latitude,
            longitude,
        })
    }
}
