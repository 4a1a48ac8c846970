//! Scientific alert data model.
//!
//! An [`Alert`] is the parsed, immutable view of one incoming transient
//! alert. Wire-format parsing happens upstream; the engines only rely on
//! the typed header fields and on [`Alert::parameter`], the opaque
//! raw-field accessor used by `alert_parameter.*` cuts and custom plugins.

use chrono::{DateTime, Utc};
use qtty::Degrees;
use serde::{Deserialize, Serialize};

use crate::models::EquatorialCoordinates;

/// One incoming transient alert after ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert identifier (IVORN or equivalent)
    pub ivorn: String,
    /// Best-estimate target position
    pub coords: EquatorialCoordinates,
    /// Reported 1-sigma positional uncertainty
    pub position_uncertainty: Degrees,
    /// Time of the astrophysical event
    pub event_time: DateTime<Utc>,
    /// Time this alert was received by the handler
    pub received_time: DateTime<Utc>,
    /// IVORN of a cited prior alert of the same event series, if any
    pub cited_event: Option<String>,
    /// Raw alert payload, opaque to the engines
    raw: serde_json::Value,
}

impl Alert {
    pub fn new(
        ivorn: impl Into<String>,
        coords: EquatorialCoordinates,
        position_uncertainty: Degrees,
        event_time: DateTime<Utc>,
        received_time: DateTime<Utc>,
    ) -> Self {
        Self {
            ivorn: ivorn.into(),
            coords,
            position_uncertainty,
            event_time,
            received_time,
            cited_event: None,
            raw: serde_json::Value::Null,
        }
    }

    /// Attach the raw alert payload.
    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = raw;
        self
    }

    /// Record a citation to a prior alert of the same event series.
    pub fn with_cited_event(mut self, ivorn: impl Into<String>) -> Self {
        self.cited_event = Some(ivorn.into());
        self
    }

    /// Look up a named field in the raw alert payload.
    ///
    /// Keys use dotted paths into nested objects, e.g.
    /// `"Solution_Status.GRB_Identified"`. Returns `None` when any path
    /// segment is missing.
    pub fn parameter(&self, key: &str) -> Option<&serde_json::Value> {
        let mut current = &self.raw;
        for segment in key.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ {} (event {}, received {})",
            self.ivorn, self.coords, self.event_time, self.received_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_alert() -> Alert {
        let t = Utc.with_ymd_and_hms(2019, 1, 11, 20, 57, 23).unwrap();
        Alert::new(
            "ivo://nasa.gsfc.gcn/SWIFT#BAT_GRB_Pos_883832-433",
            EquatorialCoordinates::from_degrees(54.51, -26.939),
            Degrees::new(0.05),
            t,
            t,
        )
        .with_raw(json!({
            "Burst_Inten": 4145.0,
            "Solution_Status": { "GRB_Identified": "true" }
        }))
    }

    #[test]
    fn test_parameter_top_level() {
        let alert = sample_alert();
        assert_eq!(alert.parameter("Burst_Inten").unwrap().as_f64(), Some(4145.0));
    }

    #[test]
    fn test_parameter_nested() {
        let alert = sample_alert();
        assert_eq!(
            alert.parameter("Solution_Status.GRB_Identified").unwrap(),
            "true"
        );
    }

    #[test]
    fn test_parameter_missing() {
        let alert = sample_alert();
        assert!(alert.parameter("Nope").is_none());
        assert!(alert.parameter("Solution_Status.Nope").is_none());
        assert!(alert.parameter("Burst_Inten.deeper").is_none());
    }

    #[test]
    fn test_cited_event() {
        let alert = sample_alert();
        assert!(alert.cited_event.is_none());
        let cited = alert.with_cited_event("ivo://earlier");
        assert_eq!(cited.cited_event.as_deref(), Some("ivo://earlier"));
    }
}
