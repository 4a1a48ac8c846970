//! Ephemeris provider contract.
//!
//! The window search consumes sun, moon and target altitudes through this
//! trait; it never computes celestial mechanics itself. Altitude queries
//! are batched over timestamp slices since the search evaluates hundreds
//! of grid points per invocation.

pub mod analytic;

pub use analytic::AnalyticProvider;

use chrono::{DateTime, Utc};
use qtty::Degrees;

use crate::models::{EquatorialCoordinates, Site};

/// Error from an ephemeris computation.
///
/// Fatal to the single window-search invocation that issued the query;
/// sibling searches are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum EphemerisError {
    #[error("ephemeris computation failed: {0}")]
    Computation(String),
    #[error("timestamp {0} outside the provider's validity range")]
    OutOfRange(DateTime<Utc>),
}

/// Source of sun, moon and target positions as seen from a site.
///
/// Implementations must be pure functions of (timestamps, site, target):
/// the engines treat every call as side-effect free and repeatable.
pub trait EphemerisProvider {
    /// Sun altitude at each timestamp.
    fn sun_altitudes(
        &self,
        times: &[DateTime<Utc>],
        site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError>;

    /// Moon altitude at each timestamp.
    fn moon_altitudes(
        &self,
        times: &[DateTime<Utc>],
        site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError>;

    /// Altitude of a fixed equatorial target at each timestamp.
    fn target_altitudes(
        &self,
        target: EquatorialCoordinates,
        times: &[DateTime<Utc>],
        site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError>;

    /// Moon azimuth at one timestamp.
    fn moon_azimuth(&self, time: DateTime<Utc>, site: &Site) -> Result<Degrees, EphemerisError>;

    /// Moon illumination at one timestamp, in percent (0 = new, 100 = full).
    fn moon_phase(&self, time: DateTime<Utc>, site: &Site) -> Result<f64, EphemerisError>;
}
