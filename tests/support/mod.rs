#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use qtty::Degrees;
use serde_json::json;

use transient_followup::ephemeris::{EphemerisError, EphemerisProvider};
use transient_followup::models::{Alert, EquatorialCoordinates, Site};

/// Scripted ephemeris provider with fixed sun and moon altitudes.
///
/// The target is high in the sky unless its right ascension exceeds
/// `blocked_ra_above`, which lets tests fail individual wobble candidate
/// positions while the nominal target stays observable.
pub struct ScriptedProvider {
    pub sun_alt: f64,
    pub moon_alt: f64,
    pub blocked_ra_above: Option<f64>,
}

impl ScriptedProvider {
    /// Dark sky, moon down, every target observable.
    pub fn clear_night() -> Self {
        Self {
            sun_alt: -30.0,
            moon_alt: -10.0,
            blocked_ra_above: None,
        }
    }

    /// Sun above the horizon, nothing observable.
    pub fn daytime() -> Self {
        Self {
            sun_alt: 30.0,
            moon_alt: -10.0,
            blocked_ra_above: None,
        }
    }
}

impl EphemerisProvider for ScriptedProvider {
    fn sun_altitudes(
        &self,
        times: &[DateTime<Utc>],
        _site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError> {
        Ok(times.iter().map(|_| Degrees::new(self.sun_alt)).collect())
    }

    fn moon_altitudes(
        &self,
        times: &[DateTime<Utc>],
        _site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError> {
        Ok(times.iter().map(|_| Degrees::new(self.moon_alt)).collect())
    }

    fn target_altitudes(
        &self,
        target: EquatorialCoordinates,
        times: &[DateTime<Utc>],
        _site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError> {
        let altitude = match self.blocked_ra_above {
            Some(limit) if target.ra.value() > limit => 5.0,
            _ => 80.0,
        };
        Ok(times.iter().map(|_| Degrees::new(altitude)).collect())
    }

    fn moon_azimuth(&self, _time: DateTime<Utc>, _site: &Site) -> Result<Degrees, EphemerisError> {
        Ok(Degrees::new(180.0))
    }

    fn moon_phase(&self, _time: DateTime<Utc>, _site: &Site) -> Result<f64, EphemerisError> {
        Ok(10.0)
    }
}

/// Provider whose every call fails, for fault-isolation tests.
pub struct FailingProvider;

impl EphemerisProvider for FailingProvider {
    fn sun_altitudes(
        &self,
        _times: &[DateTime<Utc>],
        _site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError> {
        Err(EphemerisError::Computation("ephemeris offline".into()))
    }

    fn moon_altitudes(
        &self,
        _times: &[DateTime<Utc>],
        _site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError> {
        Err(EphemerisError::Computation("ephemeris offline".into()))
    }

    fn target_altitudes(
        &self,
        _target: EquatorialCoordinates,
        _times: &[DateTime<Utc>],
        _site: &Site,
    ) -> Result<Vec<Degrees>, EphemerisError> {
        Err(EphemerisError::Computation("ephemeris offline".into()))
    }

    fn moon_azimuth(&self, _time: DateTime<Utc>, _site: &Site) -> Result<Degrees, EphemerisError> {
        Err(EphemerisError::Computation("ephemeris offline".into()))
    }

    fn moon_phase(&self, _time: DateTime<Utc>, _site: &Site) -> Result<f64, EphemerisError> {
        Err(EphemerisError::Computation("ephemeris offline".into()))
    }
}

/// A Swift BAT GRB alert with the raw fields the built-in plugin reads.
pub fn swift_alert() -> Alert {
    let t = Utc.with_ymd_and_hms(2019, 1, 11, 20, 57, 23).unwrap();
    Alert::new(
        "ivo://nasa.gsfc.gcn/SWIFT#BAT_GRB_Pos_880025-648",
        EquatorialCoordinates::from_degrees(54.51, -26.939),
        Degrees::new(0.05),
        t,
        t,
    )
    .with_raw(json!({
        "Burst_Inten": 4145,
        "Solution_Status": { "GRB_Identified": "true" }
    }))
}

/// A complete program document subscribing to Swift BAT positions.
/// Tests mutate the sections they exercise.
pub fn program_document(name: &str, priority: i64) -> serde_json::Value {
    json!({
        "Name": name,
        "ProposalDetails": {
            "ID": "2019-TR-001",
            "PI": "A. Observer",
            "Title": "Rapid GRB follow-up",
            "Type": "ToO"
        },
        "ObservationConfig": {
            "Priority": priority,
            "IntendedAction": "observe",
            "Urgency": "immediate",
            "UseCustomCoords": false,
            "MaxExposure": [40.0, "min"],
            "NumberBlocks": 4,
            "PointingMode": {
                "Wobble": { "Offset": [0.5, "deg"], "Angle": [0.0, "deg"] }
            }
        },
        "AllowedAlertTypes": { "SWIFT": ["BAT_GRB_Pos"] },
        "ProcessingCuts": {
            "CommonCuts": {
                "max_delay": ["5 h", "<"],
                "position_uncertainty": ["1 deg", "<"]
            },
            "CustomCuts": {}
        },
        "ObservationWindowRequirements": {
            "MaxZenithAngle": [60.0, "deg"],
            "MaxDelay": [5.0, "h"],
            "MinDuration": [10.0, "min"]
        }
    })
}
