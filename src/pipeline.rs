//! Per-alert follow-up pipeline.
//!
//! One processing pass takes an alert and the loaded science programs,
//! matches the subscribing programs, and evaluates each one in descending
//! priority: window search, cut execution, aggregate verdict, pointing
//! pattern. Programs are independent; a fault in one never affects the
//! others.

use chrono::{DateTime, Utc};

use crate::config::ScienceConfig;
use crate::cuts::CutCollection;
use crate::ephemeris::EphemerisProvider;
use crate::models::{Alert, EquatorialCoordinates, Site};
use crate::plugins::{EvaluationContext, PluginRegistry};
use crate::pointing::{produce_custom_pointing_pattern, produce_pointing_pattern, PointingPattern};
use crate::window::{ObservationWindowResult, WindowSearch};

/// The decision reached for one alert under one program.
#[derive(Debug, Clone)]
pub struct FollowupOutcome {
    pub program: String,
    pub priority: i64,
    pub window: ObservationWindowResult,
    /// The evaluated cut collection, for reporting.
    pub cuts: CutCollection,
    pub accepted: bool,
    /// Alternative positions vetted by custom cuts, if any.
    pub custom_coordinates: Vec<EquatorialCoordinates>,
    /// Pointing pattern, present only for accepted follow-ups.
    pub pointing: Option<PointingPattern>,
}

/// Synchronous follow-up decision engine for one site.
pub struct Pipeline<'a> {
    site: &'a Site,
    provider: &'a dyn EphemerisProvider,
    plugins: &'a PluginRegistry,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        site: &'a Site,
        provider: &'a dyn EphemerisProvider,
        plugins: &'a PluginRegistry,
    ) -> Self {
        Self {
            site,
            provider,
            plugins,
        }
    }

    /// Programs subscribing to this alert, highest priority first.
    pub fn match_programs<'c>(
        &self,
        alert: &Alert,
        programs: &'c [ScienceConfig],
    ) -> Vec<&'c ScienceConfig> {
        let mut matched: Vec<&ScienceConfig> = programs
            .iter()
            .filter(|program| program.accepts_alert_type(&alert.ivorn))
            .collect();
        matched.sort_by_key(|program| std::cmp::Reverse(program.observation.priority));
        matched
    }

    /// Evaluate `alert` against every matching program at decision time
    /// `now`. Outcomes come back in descending program priority.
    pub fn process(
        &self,
        alert: &Alert,
        programs: &[ScienceConfig],
        now: DateTime<Utc>,
    ) -> Vec<FollowupOutcome> {
        let matched = self.match_programs(alert, programs);
        log::info!(
            "alert {} matched {} program(s)",
            alert.ivorn,
            matched.len()
        );
        matched
            .into_iter()
            .map(|program| self.process_program(alert, program, now))
            .collect()
    }

    fn process_program(
        &self,
        alert: &Alert,
        program: &ScienceConfig,
        now: DateTime<Utc>,
    ) -> FollowupOutcome {
        let search = WindowSearch::new(self.site, &program.window_requirements, self.provider);
        let window = match search.find(alert.coords, alert.event_time, now) {
            Ok(window) => window,
            Err(err) => {
                log::error!(
                    "window search failed for program '{}' on {}: {err}",
                    program.name,
                    alert.ivorn
                );
                // Reject this program; its cuts stay unevaluated.
                return FollowupOutcome {
                    program: program.name.clone(),
                    priority: program.observation.priority,
                    window: ObservationWindowResult::not_found(alert.coords),
                    cuts: program.cuts.clone(),
                    accepted: false,
                    custom_coordinates: Vec::new(),
                    pointing: None,
                };
            }
        };

        let mut cuts = program.cuts.clone();
        let ctx = EvaluationContext::new(program, self.site, self.provider, self.plugins, now);
        let custom_coordinates = cuts.execute(alert, &window, &ctx);
        let accepted = cuts.result();

        log::info!(
            "program '{}' {} alert {}",
            program.name,
            if accepted { "accepted" } else { "rejected" },
            alert.ivorn
        );
        log::debug!("cut report for '{}':\n{}", program.name, cuts.report());

        // Programs opting into custom coordinates observe the vetted
        // positions; everything else wobbles around the nominal target.
        let pointing = if !accepted {
            None
        } else if program.observation.use_custom_coords && !custom_coordinates.is_empty() {
            produce_custom_pointing_pattern(program, &window, &custom_coordinates)
        } else {
            produce_pointing_pattern(program, &window)
        };

        FollowupOutcome {
            program: program.name.clone(),
            priority: program.observation.priority,
            window,
            cuts,
            accepted,
            custom_coordinates,
            pointing,
        }
    }
}
