//! Swift GRB custom cuts.
//!
//! Implements the `swift_grb` plugin family: the BAT identification flag,
//! the burst intensity, and the wobble-candidate vetting cut used by
//! programs that repoint around the nominal burst position.

use chrono::Duration;
use qtty::Degrees;

use super::{CustomCutModule, CustomCutOutcome, EvaluationContext, PluginError};
use crate::cuts::Value;
use crate::models::{Alert, EquatorialCoordinates};
use crate::window::ObservationWindowResult;

/// Raw alert field carrying the BAT GRB identification flag.
const GRB_IDENTIFIED_FIELD: &str = "Solution_Status.GRB_Identified";
/// Raw alert field carrying the burst intensity in counts.
const BURST_INTENSITY_FIELD: &str = "Burst_Inten";

/// Number of wobble candidate positions vetted by `Custom_coords`.
const WOBBLE_CANDIDATES: usize = 4;
/// Right ascension step between consecutive candidates.
const WOBBLE_STEP_DEG: f64 = 0.1;
/// Candidate observations are assumed to start this long after receipt.
const CANDIDATE_START_OFFSET_MIN: i64 = 30;

/// Plugin module for Swift BAT gamma-ray burst alerts.
pub struct GrbSelectionModule;

impl GrbSelectionModule {
    fn grb_identified(&self, alert: &Alert) -> Result<CustomCutOutcome, PluginError> {
        let raw = alert
            .parameter(GRB_IDENTIFIED_FIELD)
            .ok_or_else(|| PluginError::MissingField(GRB_IDENTIFIED_FIELD.to_string()))?;
        let identified = matches!(Value::coerce_json(raw), Value::Bool(true));
        Ok(CustomCutOutcome::of(Value::Bool(identified)))
    }

    fn burst_intensity(&self, alert: &Alert) -> Result<CustomCutOutcome, PluginError> {
        let raw = alert
            .parameter(BURST_INTENSITY_FIELD)
            .ok_or_else(|| PluginError::MissingField(BURST_INTENSITY_FIELD.to_string()))?;
        match Value::coerce_json(raw) {
            value @ Value::Number(_) => Ok(CustomCutOutcome::of(value)),
            other => Err(PluginError::Message(format!(
                "field '{BURST_INTENSITY_FIELD}' is not numeric: {other}"
            ))),
        }
    }

    /// Vet a wobble pattern of candidate positions around the burst.
    ///
    /// Each candidate offsets the right ascension by a fixed step and must
    /// be observable in its own window starting shortly after receipt,
    /// with the program's common cuts holding against that window. All
    /// candidates must pass; one bad position fails the whole cut and no
    /// candidates are surfaced.
    fn custom_coords(
        &self,
        alert: &Alert,
        ctx: &EvaluationContext<'_>,
    ) -> Result<CustomCutOutcome, PluginError> {
        let start = alert.received_time + Duration::minutes(CANDIDATE_START_OFFSET_MIN);
        let mut accepted = Vec::with_capacity(WOBBLE_CANDIDATES);

        for i in 0..WOBBLE_CANDIDATES {
            let candidate = EquatorialCoordinates::new(
                Degrees::new(alert.coords.ra.value() + i as f64 * WOBBLE_STEP_DEG),
                alert.coords.dec,
            );
            let window = ctx.search_window(candidate, start)?;
            if window.valid && ctx.common_cuts_pass(alert, &window) {
                log::debug!("candidate position {candidate} accepted: {window}");
                accepted.push(candidate);
            } else {
                log::debug!("candidate position {candidate} rejected");
            }
        }

        if accepted.len() == WOBBLE_CANDIDATES {
            Ok(CustomCutOutcome::with_candidates(Value::Bool(true), accepted))
        } else {
            Ok(CustomCutOutcome::of(Value::Bool(false)))
        }
    }
}

impl CustomCutModule for GrbSelectionModule {
    fn name(&self) -> &str {
        "swift_grb"
    }

    fn evaluate(
        &self,
        cut_name: &str,
        alert: &Alert,
        _window: &ObservationWindowResult,
        ctx: &EvaluationContext<'_>,
    ) -> Result<CustomCutOutcome, PluginError> {
        match cut_name {
            "GRB_selection" => self.grb_identified(alert),
            "Swift_counts" => self.burst_intensity(alert),
            "Custom_coords" => self.custom_coords(alert, ctx),
            other => Err(PluginError::UnknownCut {
                plugin: self.name().to_string(),
                cut: other.to_string(),
            }),
        }
    }
}
