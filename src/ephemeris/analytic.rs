//! Built-in low-precision ephemeris provider.
//!
//! Geocentric solar and lunar positions from the standard low-precision
//! series (good to a fraction of a degree over the current decades),
//! reduced to altitude/azimuth through Greenwich sidereal time. Lunar
//! topocentric parallax is neglected, which shifts the moon altitude by
//! up to ~1 degree; acceptable for darkness screening.

use chrono::{DateTime, Utc};
use qtty::Degrees;

use crate::models::{EquatorialCoordinates, Site};

use super::{EphemerisError, EphemerisProvider};

/// Low-precision analytic sun/moon/target provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticProvider;

impl AnalyticProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Days since the J2000.0 epoch (JD 2451545.0), UTC treated as UT1.
fn days_since_j2000(t: DateTime<Utc>) -> f64 {
    let unix = t.timestamp() as f64 + f64::from(t.timestamp_subsec_nanos()) / 1e9;
    unix / 86400.0 + 2440587.5 - 2451545.0
}

/// Greenwich mean sidereal time in degrees.
fn gmst_degrees(d: f64) -> f64 {
    (280.460_618_37 + 360.985_647_366_29 * d).rem_euclid(360.0)
}

/// Mean obliquity of the ecliptic in degrees.
fn obliquity_degrees(d: f64) -> f64 {
    23.439_291 - 3.6e-7 * d
}

/// Convert ecliptic (lon, lat) to equatorial (ra, dec), all in degrees.
fn ecliptic_to_equatorial(lon: f64, lat: f64, d: f64) -> (f64, f64) {
    let eps = obliquity_degrees(d).to_radians();
    let lon = lon.to_radians();
    let lat = lat.to_radians();

    let ra = (lon.sin() * eps.cos() - lat.tan() * eps.sin()).atan2(lon.cos());
    let dec = (lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin()).asin();
    (ra.to_degrees().rem_euclid(360.0), dec.to_degrees())
}

/// Geocentric solar position in equatorial degrees.
fn sun_equatorial(d: f64) -> (f64, f64) {
    let g = (357.529 + 0.985_600_28 * d).to_radians();
    let lon = 280.459 + 0.985_647_36 * d + 1.915 * g.sin() + 0.020 * (2.0 * g).sin();
    ecliptic_to_equatorial(lon.rem_euclid(360.0), 0.0, d)
}

/// Geocentric lunar position in equatorial degrees (truncated series).
fn moon_equatorial(d: f64) -> (f64, f64) {
    let lp = 218.316 + 13.176_396 * d;
    let m = (134.963 + 13.064_993 * d).to_radians();
    let f = (93.272 + 13.229_350 * d).to_radians();

    let lon = (lp + 6.289 * m.sin()).rem_euclid(360.0);
    let lat = 5.128 * f.sin();
    ecliptic_to_equatorial(lon, lat, d)
}

/// Altitude and azimuth (degrees, azimuth from north through east) of an
/// equatorial position as seen from `site`.
fn alt_az(ra: f64, dec: f64, d: f64, site: &Site) -> (f64, f64) {
    let lst = gmst_degrees(d) + site.longitude.value();
    let hour_angle = (lst - ra).rem_euclid(360.0).to_radians();
    let dec = dec.to_radians();
    let lat = site.latitude.value().to_radians();

    let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle.cos();
    let alt = sin_alt.clamp(-1.0, 1.0).asin();

    let north = dec.sin() * lat.cos() - dec.cos() * hour_angle.cos() * lat.sin();
    let east = -dec.cos() * hour_angle.sin();
    let az = east.atan2(north).to_degrees().rem_euclid(360.0);

    (alt.to_degrees(), az)
}

impl EphemerisProvider for AnalyticProvider {
    fn sun_altitudes(
        &self,
        times: &[DateTime<Utc>],
        site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError> {
        Ok(times
            .iter()
            .map(|&t| {
                let d = days_since_j2000(t);
                let (ra, dec) = sun_equatorial(d);
                Degrees::new(alt_az(ra, dec, d, site).0)
            })
            .collect())
    }

    fn moon_altitudes(
        &self,
        times: &[DateTime<Utc>],
        site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError> {
        Ok(times
            .iter()
            .map(|&t| {
                let d = days_since_j2000(t);
                let (ra, dec) = moon_equatorial(d);
                Degrees::new(alt_az(ra, dec, d, site).0)
            })
            .collect())
    }

    fn target_altitudes(
        &self,
        target: EquatorialCoordinates,
        times: &[DateTime<Utc>],
        site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError> {
        Ok(times
            .iter()
            .map(|&t| {
                let d = days_since_j2000(t);
                Degrees::new(alt_az(target.ra.value(), target.dec.value(), d, site).0)
            })
            .collect())
    }

    fn moon_azimuth(&self, time: DateTime<Utc>, site: &Site) -> Result<Degrees, EphemerisError> {
        let d = days_since_j2000(time);
        let (ra, dec) = moon_equatorial(d);
        Ok(Degrees::new(alt_az(ra, dec, d, site).1))
    }

    fn moon_phase(&self, time: DateTime<Utc>, _site: &Site) -> Result<f64, EphemerisError> {
        let d = days_since_j2000(time);
        let (sun_ra, sun_dec) = sun_equatorial(d);
        let (moon_ra, moon_dec) = moon_equatorial(d);

        let d1 = sun_dec.to_radians();
        let d2 = moon_dec.to_radians();
        let dra = (sun_ra - moon_ra).to_radians();
        let cos_elong = (d1.sin() * d2.sin() + d1.cos() * d2.cos() * dra.cos()).clamp(-1.0, 1.0);

        Ok((1.0 - cos_elong) / 2.0 * 100.0)
    }
}
