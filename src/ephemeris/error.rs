//! Sun-position lookup errors

use std::fmt;

/// Errors reported by a [`SolarPositionProvider`](crate::ephemeris::SolarPositionProvider)
#[derive(Debug, Clone, PartialEq)]
pub enum EphemerisError {
    /// The lookup itself failed (bad timestamp, unreachable service, ...)
    LookupFailed { details: String },
    /// Latitude or longitude outside the valid range
    InvalidLocation { latitude: f64, longitude: f64 },
    /// A scripted provider has no more sun states to hand out
    Exhausted { served: u32 },
}

impl fmt::Display for EphemerisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemerisError::LookupFailed { details } => {
                write!(f, "Solar position lookup failed: {}", details)
            }
            EphemerisError::InvalidLocation { latitude, longitude } => {
                write!(f, "Invalid location: latitude {}, longitude {}", latitude, longitude)
            }
            EphemerisError::Exhausted { served } => {
                write!(f, "Solar position source exhausted after {} lookups", served)
            }
        }
    }
}

impl std::error::Error for EphemerisError {}

/// Result type for sun-position lookups
pub type EphemerisResult<T> = Result<T, EphemerisError>;

impl EphemerisError {
    /// Whether a later lookup may succeed where this one failed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EphemerisError::LookupFailed { .. })
    }
}
