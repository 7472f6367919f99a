//! Scripted sun-position provider for testing and development

use crate::core::SunState;
use crate::ephemeris::{validate_location, EphemerisError, EphemerisResult, SolarPositionProvider};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// A single lookup made against the scripted provider
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Replays a fixed sequence of sun angles, one per lookup
///
/// Angles are handed back unvalidated so that out-of-range input reaches the
/// aiming boundary exactly as a faulty upstream service would deliver it.
pub struct ScriptedSunProvider {
    script: VecDeque<(f64, f64)>,
    repeat_last: bool,
    last: Option<(f64, f64)>,
    pending_failures: VecDeque<EphemerisError>,
    requests: Vec<LookupRequest>,
    served: u32,
}

impl ScriptedSunProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            repeat_last: false,
            last: None,
            pending_failures: VecDeque::new(),
            requests: Vec::new(),
            served: 0,
        }
    }

    /// Create a provider that replays `angles` as (elevation, azimuth) pairs
    pub fn from_angles(angles: &[(f64, f64)]) -> Self {
        let mut provider = Self::new();
        for &(elevation, azimuth) in angles {
            provider.push_angles(elevation, azimuth);
        }
        provider
    }

    /// Create a provider that always reports the same sun position
    pub fn constant(elevation: f64, azimuth: f64) -> Self {
        Self::from_angles(&[(elevation, azimuth)]).repeating()
    }

    /// Keep returning the last scripted state once the script runs out
    pub fn repeating(mut self) -> Self {
        self.repeat_last = true;
        self
    }

    /// Queue another (elevation, azimuth) pair
    pub fn push_angles(&mut self, elevation: f64, azimuth: f64) {
        self.script.push_back((elevation, azimuth));
    }

    /// Make the next lookup fail with `error`, ahead of any scripted state
    pub fn fail_next(&mut self, error: EphemerisError) {
        self.pending_failures.push_back(error);
    }

    /// All lookups made so far
    pub fn requests(&self) -> &[LookupRequest] {
        &self.requests
    }

    /// Number of scripted states still queued
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Number of successful lookups
    pub fn served(&self) -> u32 {
        self.served
    }
}

impl Default for ScriptedSunProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SolarPositionProvider for ScriptedSunProvider {
    fn solar_position(
        &mut self,
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
    ) -> EphemerisResult<SunState> {
        self.requests.push(LookupRequest {
            timestamp,
            latitude,
            longitude,
        });

        validate_location(latitude, longitude)?;

        if let Some(error) = self.pending_failures.pop_front() {
            return Err(error);
        }

        let (elevation, azimuth) = match self.script.pop_front() {
            Some(angles) => {
                self.last = Some(angles);
                angles
            }
            None => match self.last {
                Some(angles) if self.repeat_last => angles,
                _ => return Err(EphemerisError::Exhausted { served: self.served }),
            },
        };

        self.served += 1;
        Ok(SunState {
            elevation,
            azimuth,
            timestamp,
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
