//! Scheduler-facing result and state types

use crate::algorithms::field::IndexedOrientation;
use crate::core::{AimingError, SunState};
use crate::ephemeris::EphemerisError;
use crate::utils::config::ConfigError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Result type for tracking operations
pub type TrackingResult<T> = Result<T, TrackingError>;

/// Errors surfaced to whoever drives the tick loop
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingError {
    /// Aiming computation rejected the tick
    AimingFailed { error: AimingError },
    /// The sun-position provider failed
    ExternalServiceFailure { provider: String, error: EphemerisError },
    /// Field configuration could not be used
    ConfigurationError { error: ConfigError },
    /// Simulated time ran past what a timestamp can represent
    SimulatedClockOverflow { step: u64 },
}

impl From<AimingError> for TrackingError {
    fn from(error: AimingError) -> Self {
        TrackingError::AimingFailed { error }
    }
}

impl From<ConfigError> for TrackingError {
    fn from(error: ConfigError) -> Self {
        TrackingError::ConfigurationError { error }
    }
}

impl fmt::Display for TrackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingError::AimingFailed { error } => write!(f, "Aiming failed: {}", error),
            TrackingError::ExternalServiceFailure { provider, error } => {
                write!(f, "Sun position provider '{}' failed: {}", provider, error)
            }
            TrackingError::ConfigurationError { error } => {
                write!(f, "Configuration error: {}", error)
            }
            TrackingError::SimulatedClockOverflow { step } => {
                write!(f, "Simulated clock overflowed at step {}", step)
            }
        }
    }
}

impl std::error::Error for TrackingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackingError::AimingFailed { error } => Some(error),
            TrackingError::ExternalServiceFailure { error, .. } => Some(error),
            TrackingError::ConfigurationError { error } => Some(error),
            TrackingError::SimulatedClockOverflow { .. } => None,
        }
    }
}

impl TrackingError {
    /// Whether a later tick may succeed where this one failed
    ///
    /// Geometry is fixed for the life of the field, so a degenerate mirror fails
    /// every tick; a bad sun state or a transient lookup failure may not recur.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TrackingError::AimingFailed { error } => !error.is_geometry_error(),
            TrackingError::ExternalServiceFailure { error, .. } => error.is_recoverable(),
            TrackingError::ConfigurationError { .. }
            | TrackingError::SimulatedClockOverflow { .. } => false,
        }
    }
}

/// Output of one completed tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Sequence number, starting at 1
    pub tick: u64,
    pub sun: SunState,
    /// One entry per mirror, in field order
    pub orientations: Vec<IndexedOrientation>,
    pub computation_time_us: u64,
}

/// Running statistics kept by the scheduler
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchedulerState {
    /// Ticks attempted, successful or not
    pub ticks_attempted: u64,
    pub ticks_completed: u64,
    pub error_count: u64,
    pub last_tick_time: Option<DateTime<Utc>>,
    pub avg_computation_time_us: u64,
    pub uptime_ms: u64,
}
