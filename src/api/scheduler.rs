//! Tick scheduler driving the aiming core
//!
//! The scheduler owns everything that changes between ticks: the tick counter,
//! the timer, the sun-position provider and running statistics. The aiming core
//! it calls stays pure; each tick hands it one fresh sun state.

use crate::algorithms::field::aim_all;
use crate::api::types::{SchedulerState, TickReport, TrackingError, TrackingResult};
use crate::core::FieldConfiguration;
use crate::ephemeris::SolarPositionProvider;
use crate::utils::config::{ConfigurationManager, TrackingConfig};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{debug, error, info, warn};
use std::path::Path;
use std::time::{Duration, Instant};

/// Sequential tick loop over a fixed field
pub struct TrackingScheduler<P: SolarPositionProvider> {
    field: FieldConfiguration,
    provider: P,
    config: TrackingConfig,
    state: SchedulerState,
    start_time: Instant,
}

impl<P: SolarPositionProvider> TrackingScheduler<P> {
    pub fn new(field: FieldConfiguration, provider: P, config: TrackingConfig) -> Self {
        Self {
            field,
            provider,
            config,
            state: SchedulerState::default(),
            start_time: Instant::now(),
        }
    }

    /// Build a scheduler from a JSON field configuration file
    pub fn from_config_file<Q: AsRef<Path>>(path: Q, provider: P) -> TrackingResult<Self> {
        let manager = ConfigurationManager::from_file(path)?;
        let field = manager.build_field()?;
        Ok(Self::new(field, provider, manager.get_config().tracking.clone()))
    }

    pub fn field(&self) -> &FieldConfiguration {
        &self.field
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Override the tick limit loaded from configuration
    pub fn set_max_ticks(&mut self, max_ticks: Option<u64>) {
        self.config.max_ticks = max_ticks;
    }

    /// Run one tick at the current wall-clock time
    pub fn tick(&mut self) -> TrackingResult<TickReport> {
        self.tick_at(Utc::now())
    }

    /// Run one tick for an explicit timestamp
    pub fn tick_at(&mut self, timestamp: DateTime<Utc>) -> TrackingResult<TickReport> {
        let started = Instant::now();
        self.state.ticks_attempted += 1;
        let tick = self.state.ticks_attempted;

        let result = self.compute(tick, timestamp, started);
        match &result {
            Ok(report) => {
                self.record_success(report);
                debug!(
                    "tick {}: sun elevation {:.2}°, azimuth {:.2}°, {} mirrors in {} us",
                    tick,
                    report.sun.elevation,
                    report.sun.azimuth,
                    report.orientations.len(),
                    report.computation_time_us
                );
            }
            Err(e) => {
                self.state.error_count += 1;
                error!("tick {} failed: {}", tick, e);
            }
        }
        self.state.uptime_ms = self.start_time.elapsed().as_millis() as u64;

        result
    }

    /// Tick in real time until `max_ticks` is reached or a tick fails fatally
    ///
    /// Sleeps `interval_ms` between ticks. Every tick result, good or bad, is
    /// passed to `on_tick`. Returns the number of ticks attempted.
    pub fn run<F>(&mut self, on_tick: F) -> TrackingResult<u64>
    where
        F: FnMut(&TrackingResult<TickReport>),
    {
        let interval = Duration::from_millis(self.config.interval_ms);
        self.drive(on_tick, |_| Ok(Utc::now()), move || std::thread::sleep(interval))
    }

    /// Replay ticks over simulated time starting at `start`, `step` apart, without sleeping
    pub fn run_simulated<F>(
        &mut self,
        start: DateTime<Utc>,
        step: ChronoDuration,
        on_tick: F,
    ) -> TrackingResult<u64>
    where
        F: FnMut(&TrackingResult<TickReport>),
    {
        let clock = move |n: u64| {
            i32::try_from(n)
                .ok()
                .and_then(|k| step.checked_mul(k))
                .and_then(|elapsed| start.checked_add_signed(elapsed))
                .ok_or(TrackingError::SimulatedClockOverflow { step: n })
        };
        self.drive(on_tick, clock, || {})
    }

    pub fn get_state(&mut self) -> SchedulerState {
        self.state.uptime_ms = self.start_time.elapsed().as_millis() as u64;
        self.state.clone()
    }

    pub fn reset_statistics(&mut self) {
        self.state = SchedulerState::default();
        self.start_time = Instant::now();
    }

    fn drive<F, C, S>(&mut self, mut on_tick: F, mut clock: C, mut pause: S) -> TrackingResult<u64>
    where
        F: FnMut(&TrackingResult<TickReport>),
        C: FnMut(u64) -> TrackingResult<DateTime<Utc>>,
        S: FnMut(),
    {
        info!(
            "tracking {} mirrors with provider '{}' every {} ms",
            self.field.mirror_count(),
            self.provider.name(),
            self.config.interval_ms
        );

        let mut attempted = 0u64;
        loop {
            if let Some(max) = self.config.max_ticks {
                if attempted >= max {
                    break;
                }
            }

            let timestamp = clock(attempted).map_err(|e| {
                warn!("stopping after {} ticks: {}", attempted, e);
                e
            })?;
            let result = self.tick_at(timestamp);
            attempted += 1;
            on_tick(&result);

            if let Err(e) = result {
                if self.config.stop_on_error || !e.is_recoverable() {
                    warn!("stopping after {} ticks", attempted);
                    return Err(e);
                }
            }

            if self.config.max_ticks.map_or(true, |max| attempted < max) {
                pause();
            }
        }

        info!("tracking finished after {} ticks", attempted);
        Ok(attempted)
    }

    fn compute(&mut self, tick: u64, timestamp: DateTime<Utc>, started: Instant) -> TrackingResult<TickReport> {
        let tower = *self.field.tower();
        let sun = self
            .provider
            .solar_position(timestamp, tower.latitude, tower.longitude)
            .map_err(|error| TrackingError::ExternalServiceFailure {
                provider: self.provider.name().to_string(),
                error,
            })?;

        if !sun.is_above_horizon() {
            debug!("tick {}: sun below horizon ({:.2}°)", tick, sun.elevation);
        }

        let orientations = aim_all(&self.field, &sun)?;

        Ok(TickReport {
            tick,
            sun,
            orientations,
            computation_time_us: started.elapsed().as_micros() as u64,
        })
    }

    fn record_success(&mut self, report: &TickReport) {
        self.state.ticks_completed += 1;
        self.state.last_tick_time = Some(report.sun.timestamp);

        let n = self.state.ticks_completed;
        self.state.avg_computation_time_us =
            (self.state.avg_computation_time_us * (n - 1) + report.computation_time_us) / n;
    }
}
