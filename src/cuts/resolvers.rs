//! Built-in resolvers for common cuts.
//!
//! Common cut names are parsed into a static dispatch enum at
//! configuration load, so a typo'd cut name is a load error instead of a
//! runtime lookup failure during alert processing.

use qtty::Degrees;

use super::value::Value;
use super::CutConfigError;
use crate::models::Alert;
use crate::window::ObservationWindowResult;

/// Nominal position change reported when the alert cites a prior event.
/// Placeholder until position deltas can be computed against an archive.
const NOMINAL_POSITION_CHANGE_DEG: f64 = 5.0;

/// Error while resolving a common cut's actual value.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("alert parameter '{0}' not present in the raw alert")]
    MissingParameter(String),
}

/// Statically dispatched source of a common cut's actual value.
#[derive(Debug, Clone)]
pub enum CommonResolver {
    /// `alert_parameter.<key>`: named field from the raw alert payload.
    AlertParameter(String),
    /// Delay of the observation window.
    MaxDelay,
    /// Delay of the observation window.
    MinDelay,
    /// Whether the target is already being observed.
    /// Stub: always `true` pending live-schedule integration.
    CurrentlyInSchedule,
    /// Position change against a cited prior alert of the same series.
    /// Stub: 0 deg without a citation, a nominal 5 deg with one; the
    /// archive-backed position delta is not implemented.
    PositionChanged,
    /// The alert's reported positional uncertainty.
    PositionUncertainty,
}

impl CommonResolver {
    /// Parse a common cut name from the registry.
    pub fn parse(name: &str) -> Result<Self, CutConfigError> {
        if let Some(key) = name.strip_prefix("alert_parameter.") {
            if key.is_empty() {
                return Err(CutConfigError::UnknownResolver(name.to_string()));
            }
            return Ok(CommonResolver::AlertParameter(key.to_string()));
        }
        match name {
            "max_delay" => Ok(CommonResolver::MaxDelay),
            "min_delay" => Ok(CommonResolver::MinDelay),
            "currently_in_schedule" => Ok(CommonResolver::CurrentlyInSchedule),
            "position_changed" => Ok(CommonResolver::PositionChanged),
            "position_uncertainty" => Ok(CommonResolver::PositionUncertainty),
            other => Err(CutConfigError::UnknownResolver(other.to_string())),
        }
    }

    /// Determine the actual value for this resolver.
    pub fn resolve(
        &self,
        alert: &Alert,
        window: &ObservationWindowResult,
    ) -> Result<Value, ResolveError> {
        match self {
            CommonResolver::AlertParameter(key) => alert
                .parameter(key)
                .map(Value::coerce_json)
                .ok_or_else(|| ResolveError::MissingParameter(key.clone())),
            // An invalid window carries the plain infinite sentinel, so
            // delay cuts fail performed rather than as a type error.
            CommonResolver::MaxDelay | CommonResolver::MinDelay => {
                if window.valid {
                    Ok(Value::hours(window.delay))
                } else {
                    Ok(Value::Number(f64::INFINITY))
                }
            }
            CommonResolver::CurrentlyInSchedule => Ok(Value::Bool(true)),
            CommonResolver::PositionChanged => {
                let change = if alert.cited_event.is_some() {
                    Degrees::new(NOMINAL_POSITION_CHANGE_DEG)
                } else {
                    Degrees::new(0.0)
                };
                Ok(Value::degrees(change))
            }
            CommonResolver::PositionUncertainty => Ok(Value::degrees(alert.position_uncertainty)),
        }
    }
}
