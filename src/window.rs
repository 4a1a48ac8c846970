//! Visibility window search.
//!
//! Computes the set of future times at which a target is observable under
//! darkness and altitude constraints, and reduces it to a single best
//! contiguous follow-up window (delay, start, end, duration).
//!
//! The search discretizes an interval around the event time into a grid
//! of [`TimeSample`]s, queries the ephemeris provider in bulk, applies
//! the three observability masks (sun down, moon down, target up) and
//! extracts the first contiguous block of valid strictly-future samples.

use chrono::{DateTime, Duration, Utc};
use qtty::Hours;
use serde::{Deserialize, Serialize};

use crate::ephemeris::{EphemerisError, EphemerisProvider};
use crate::models::{EquatorialCoordinates, ObservabilityConfig, Site};

/// Hard cap on the number of grid samples per search.
const MAX_SAMPLES: usize = 500;
/// Maximum sample density in samples per hour.
const SAMPLES_PER_HOUR: usize = 25;
/// Gap between adjacent valid samples that closes a window, in seconds.
const MAX_GAP_SECS: i64 = 3600;

/// Error from one window-search invocation.
#[derive(Debug, thiserror::Error)]
pub enum WindowSearchError {
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

/// One grid point of the search: timestamp plus the three altitudes that
/// decide observability. Produced in bulk, discarded after extraction.
#[derive(Debug, Clone, Copy)]
pub struct TimeSample {
    pub time: DateTime<Utc>,
    pub sun_altitude: qtty::Degrees,
    pub moon_altitude: qtty::Degrees,
    pub target_altitude: qtty::Degrees,
}

impl TimeSample {
    /// All three observability masks hold for this sample.
    fn is_valid(&self, config: &ObservabilityConfig) -> bool {
        self.sun_altitude.value() < config.sun_altitude_limit.value()
            && self.moon_altitude.value() < config.moon_altitude_limit.value()
            && self.target_altitude.value() > config.altitude_limit().value()
    }
}

/// Best contiguous follow-up window for one target.
///
/// `valid = false` means no observable future sample exists; the delay is
/// then the infinite sentinel and the duration zero. A zero-duration
/// window (single isolated valid sample) is legal and `valid = true`;
/// consumers that need usable exposure time must check the duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationWindowResult {
    /// Target the search ran for
    pub target: EquatorialCoordinates,
    /// Time from event to window start, infinite when no window exists
    pub delay: Hours,
    /// Window start, `None` when no window exists
    pub start: Option<DateTime<Utc>>,
    /// Window end, `None` when no window exists
    pub end: Option<DateTime<Utc>>,
    /// Window length
    pub duration: Hours,
    /// Whether a window was found
    pub valid: bool,
}

impl ObservationWindowResult {
    /// The "no window" result for a target.
    pub fn not_found(target: EquatorialCoordinates) -> Self {
        Self {
            target,
            delay: Hours::new(f64::INFINITY),
            start: None,
            end: None,
            duration: Hours::new(0.0),
            valid: false,
        }
    }
}

impl std::fmt::Display for ObservationWindowResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.start, self.end) {
            (Some(start), Some(end)) => write!(
                f,
                "window for {}: delay {:.3} h, {} .. {}, duration {:.3} h",
                self.target,
                self.delay.value(),
                start,
                end,
                self.duration.value()
            ),
            _ => write!(f, "no observation window for {}", self.target),
        }
    }
}

/// Visibility window search for one site and one program's thresholds.
///
/// Each [`find`](Self::find) call builds and discards its own grid, so
/// repeated or nested searches (custom-cut wobble searches) never share
/// state.
pub struct WindowSearch<'a> {
    site: &'a Site,
    config: &'a ObservabilityConfig,
    provider: &'a dyn EphemerisProvider,
}

impl<'a> WindowSearch<'a> {
    pub fn new(
        site: &'a Site,
        config: &'a ObservabilityConfig,
        provider: &'a dyn EphemerisProvider,
    ) -> Self {
        Self {
            site,
            config,
            provider,
        }
    }

    /// Search for the best follow-up window after `event_time`.
    ///
    /// `now` is the decision time: only samples strictly after it are
    /// eligible, so a late-running search reports fewer opportunities.
    /// An ephemeris fault aborts this invocation only.
    pub fn find(
        &self,
        target: EquatorialCoordinates,
        event_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<ObservationWindowResult, WindowSearchError> {
        let times = self.sample_grid(event_time);
        let samples = self.sample_sky(target, &times)?;

        let future: Vec<DateTime<Utc>> = samples
            .iter()
            .filter(|s| s.is_valid(self.config))
            .map(|s| s.time)
            .filter(|&t| t > now)
            .collect();

        let (Some(&start), Some(&last)) = (future.first(), future.last()) else {
            log::debug!(
                "no observation window in darktime for {} after {}",
                target,
                now
            );
            return Ok(ObservationWindowResult::not_found(target));
        };

        // Close the first contiguous block at the first gap over one hour.
        let mut end = last;
        for pair in future.windows(2) {
            if pair[1] - pair[0] > Duration::seconds(MAX_GAP_SECS) {
                end = pair[0];
                break;
            }
        }

        let delay_hours = (start - event_time).num_milliseconds() as f64 / 3_600_000.0;
        let duration_hours = (end - start).num_milliseconds() as f64 / 3_600_000.0;

        Ok(ObservationWindowResult {
            target,
            delay: Hours::new(round3(delay_hours)),
            start: Some(start),
            end: Some(end),
            duration: Hours::new(duration_hours),
            valid: true,
        })
    }

    /// Build the sample grid around the event time.
    ///
    /// The interval spans `-0.2 .. +1.5` times the configured maximum
    /// delay, anchored to the top of the event's hour so the grid is
    /// deterministic under sub-hour jitter in the event time. Density is
    /// capped at 25 samples/hour and 500 samples total.
    fn sample_grid(&self, event_time: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let max_delay = self.config.max_delay.value();
        let start_hours = -0.2 * max_delay;
        let end_hours = 1.5 * max_delay;
        let total_hours = end_hours - start_hours;

        // At least two points so degenerate sub-hour configurations still
        // produce a grid instead of a vacuous "no window".
        let steps = MAX_SAMPLES
            .min(total_hours.floor() as usize * SAMPLES_PER_HOUR)
            .max(2);

        let anchor_secs = {
            let ts = event_time.timestamp();
            ts - ts.rem_euclid(3600)
        };
        let anchor = DateTime::from_timestamp(anchor_secs, 0).unwrap_or(event_time);

        (0..steps)
            .map(|i| {
                let frac = i as f64 / (steps - 1) as f64;
                let offset_hours = start_hours + (end_hours - start_hours) * frac;
                anchor + Duration::milliseconds((offset_hours * 3_600_000.0).round() as i64)
            })
            .collect()
    }

    /// Query the ephemeris provider for all three bodies over the grid.
    fn sample_sky(
        &self,
        target: EquatorialCoordinates,
        times: &[DateTime<Utc>],
    ) -> Result<Vec<TimeSample>, WindowSearchError> {
        let sun = self.provider.sun_altitudes(times, self.site)?;
        let moon = self.provider.moon_altitudes(times, self.site)?;
        let source = self.provider.target_altitudes(target, times, self.site)?;

        Ok(times
            .iter()
            .zip(sun)
            .zip(moon)
            .zip(source)
            .map(|(((&time, sun_altitude), moon_altitude), target_altitude)| TimeSample {
                time,
                sun_altitude,
                moon_altitude,
                target_altitude,
            })
            .collect())
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
