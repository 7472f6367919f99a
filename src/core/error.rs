//! Aiming error types

use std::fmt;

/// Errors raised by the projection, sun vector and aiming computations
#[derive(Debug, Clone, PartialEq)]
pub enum AimingError {
    /// Mirror and focal point project to the same point
    GeometryDegenerate { distance: f64, details: String },
    /// Sun elevation or azimuth outside its documented domain
    InvalidSunState { parameter: String, value: f64 },
    /// A single mirror failed during a field-wide tick
    MirrorFailed { index: usize, source: Box<AimingError> },
    /// Field configured without any mirrors
    EmptyField,
    /// Mirror stands within the coincidence threshold of the tower's vertical axis
    MirrorAtTower { index: usize },
    /// Field coordinate or offset is NaN or infinite
    NonFiniteField { parameter: String, value: f64 },
}

impl fmt::Display for AimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AimingError::GeometryDegenerate { distance, details } => {
                write!(f, "Degenerate geometry (distance {:.3e} m): {}", distance, details)
            }
            AimingError::InvalidSunState { parameter, value } => {
                write!(f, "Invalid sun state: {} = {}", parameter, value)
            }
            AimingError::MirrorFailed { index, source } => {
                write!(f, "Mirror {} failed: {}", index, source)
            }
            AimingError::EmptyField => {
                write!(f, "Field configuration contains no mirrors")
            }
            AimingError::MirrorAtTower { index } => {
                write!(f, "Mirror {} coincides with the tower's horizontal position", index)
            }
            AimingError::NonFiniteField { parameter, value } => {
                write!(f, "Field parameter {} must be finite, got {}", parameter, value)
            }
        }
    }
}

impl std::error::Error for AimingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AimingError::MirrorFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type for aiming operations
pub type AimResult<T> = Result<T, AimingError>;

impl AimingError {
    /// Index of the mirror that caused the error, if any
    pub fn mirror_index(&self) -> Option<usize> {
        match self {
            AimingError::MirrorFailed { index, .. } | AimingError::MirrorAtTower { index } => {
                Some(*index)
            }
            _ => None,
        }
    }

    pub fn is_geometry_error(&self) -> bool {
        match self {
            AimingError::GeometryDegenerate { .. } | AimingError::MirrorAtTower { .. } => true,
            AimingError::MirrorFailed { source, .. } => source.is_geometry_error(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_mirror_failure_chain() {
        let inner = AimingError::GeometryDegenerate {
            distance: 0.0,
            details: "mirror coincides with focal point".to_string(),
        };
        let err = AimingError::MirrorFailed {
            index: 3,
            source: Box::new(inner.clone()),
        };

        assert_eq!(err.mirror_index(), Some(3));
        assert!(err.is_geometry_error());
        assert!(err.to_string().starts_with("Mirror 3 failed"));
        assert_eq!(err.source().map(|s| s.to_string()), Some(inner.to_string()));
    }

    #[test]
    fn test_sun_state_error_is_not_geometry() {
        let err = AimingError::InvalidSunState {
            parameter: "azimuth".to_string(),
            value: 400.0,
        };
        assert!(!err.is_geometry_error());
        assert_eq!(err.mirror_index(), None);
        assert_eq!(err.to_string(), "Invalid sun state: azimuth = 400");
    }

    #[test]
    fn test_non_finite_field_message() {
        let err = AimingError::NonFiniteField {
            parameter: "focal_height_offset".to_string(),
            value: f64::NAN,
        };
        assert!(!err.is_geometry_error());
        assert_eq!(err.to_string(), "Field parameter focal_height_offset must be finite, got NaN");
    }
}
