//! Per-program observability thresholds.

use qtty::{Degrees, Hours};
use serde::{Deserialize, Serialize};

/// Default sun altitude limit for astronomical darkness.
pub const DEFAULT_SUN_ALTITUDE_LIMIT: f64 = -18.0;
/// Default moon altitude limit for moonless darkness.
pub const DEFAULT_MOON_ALTITUDE_LIMIT: f64 = -0.5;

/// Observability thresholds of one science program.
///
/// The window search enforces the zenith and darkness limits; the
/// sky-quality fields (`min_nsb`, `max_nsb`, `illumination`) are carried
/// through for downstream scheduling but not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Maximum acceptable zenith angle of the target
    pub max_zenith_angle: Degrees,
    /// Maximum acceptable delay between event and window start
    pub max_delay: Hours,
    /// Minimum acceptable window duration
    pub min_duration: Hours,
    /// Minimum acceptable night-sky background
    pub min_nsb: f64,
    /// Maximum acceptable night-sky background
    pub max_nsb: f64,
    /// Maximum acceptable moon illumination fraction
    pub illumination: f64,
    /// Sun altitude below which the sky counts as dark
    pub sun_altitude_limit: Degrees,
    /// Moon altitude below which the sky counts as moonless
    pub moon_altitude_limit: Degrees,
}

impl ObservabilityConfig {
    /// Create a config with the default darkness thresholds and no
    /// sky-quality bounds.
    pub fn new(max_zenith_angle: Degrees, max_delay: Hours, min_duration: Hours) -> Self {
        Self {
            max_zenith_angle,
            max_delay,
            min_duration,
            min_nsb: 0.0,
            max_nsb: f64::INFINITY,
            illumination: 1.0,
            sun_altitude_limit: Degrees::new(DEFAULT_SUN_ALTITUDE_LIMIT),
            moon_altitude_limit: Degrees::new(DEFAULT_MOON_ALTITUDE_LIMIT),
        }
    }

    /// Minimum target altitude implied by the zenith constraint.
    pub fn altitude_limit(&self) -> Degrees {
        Degrees::new(90.0 - self.max_zenith_angle.value())
    }
}
