//! Custom cut plugin boundary.
//!
//! Programs can carry cuts the common resolvers do not know about. Those
//! are delegated to named plugin modules registered in a
//! [`PluginRegistry`]; each plugin owns a family of cut names and turns an
//! alert into the cut's actual value. Plugins get read-only access to the
//! alert and program plus a narrow [`EvaluationContext`] for running
//! window searches and re-checking a program's common cuts against
//! alternative targets.

pub mod grb;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::config::ScienceConfig;
use crate::cuts::Value;
use crate::ephemeris::EphemerisProvider;
use crate::models::{Alert, EquatorialCoordinates, Site};
use crate::window::{ObservationWindowResult, WindowSearch, WindowSearchError};

pub use grb::GrbSelectionModule;

/// Error from a custom cut evaluation.
///
/// Any of these marks the owning cut failed and unperformed; sibling cuts
/// of the same program are evaluated regardless.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("plugin '{plugin}' does not implement cut '{cut}'")]
    UnknownCut { plugin: String, cut: String },
    #[error("required alert field '{0}' is missing")]
    MissingField(String),
    #[error(transparent)]
    Window(#[from] WindowSearchError),
    #[error("{0}")]
    Message(String),
}

/// Result of a successful custom cut evaluation.
#[derive(Debug, Clone)]
pub struct CustomCutOutcome {
    /// Actual value handed back to the cut engine for comparison.
    pub value: Value,
    /// Alternative pointing positions vetted by the plugin, if the cut
    /// produces any. Surfaced to the caller, never written to the alert.
    pub candidates: Option<Vec<EquatorialCoordinates>>,
}

impl CustomCutOutcome {
    pub fn of(value: Value) -> Self {
        Self {
            value,
            candidates: None,
        }
    }

    pub fn with_candidates(value: Value, candidates: Vec<EquatorialCoordinates>) -> Self {
        Self {
            value,
            candidates: Some(candidates),
        }
    }
}

/// A named module implementing a family of custom cuts.
pub trait CustomCutModule: Send + Sync {
    /// Registry name, the prefix of this module's qualified cut names.
    fn name(&self) -> &str;

    /// Produce the actual value for `cut_name` against `alert`.
    ///
    /// `window` is the observation window already computed for the
    /// alert's nominal position, so delay- or duration-dependent cuts
    /// need no search of their own. An unrecognized `cut_name` is
    /// [`PluginError::UnknownCut`].
    fn evaluate(
        &self,
        cut_name: &str,
        alert: &Alert,
        window: &ObservationWindowResult,
        ctx: &EvaluationContext<'_>,
    ) -> Result<CustomCutOutcome, PluginError>;
}

/// Registry of custom cut modules, keyed by module name.
///
/// Populated once at startup; configuration load resolves every custom
/// cut against it, so an unregistered plugin name is a load error.
#[derive(Default)]
pub struct PluginRegistry {
    modules: HashMap<String, Box<dyn CustomCutModule>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in modules installed.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(GrbSelectionModule));
        registry
    }

    pub fn register(&mut self, module: Box<dyn CustomCutModule>) {
        self.modules.insert(module.name().to_string(), module);
    }

    pub fn get(&self, name: &str) -> Option<&dyn CustomCutModule> {
        self.modules.get(name).map(|m| m.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }
}

/// What a plugin may see and do while evaluating one alert against one
/// program.
pub struct EvaluationContext<'a> {
    pub program: &'a ScienceConfig,
    pub site: &'a Site,
    pub provider: &'a dyn EphemerisProvider,
    pub plugins: &'a PluginRegistry,
    /// Decision time of the current processing pass.
    pub now: DateTime<Utc>,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        program: &'a ScienceConfig,
        site: &'a Site,
        provider: &'a dyn EphemerisProvider,
        plugins: &'a PluginRegistry,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            program,
            site,
            provider,
            plugins,
            now,
        }
    }

    /// Window search under the program's observability requirements, with
    /// `time` as both event and decision time.
    pub fn search_window(
        &self,
        target: EquatorialCoordinates,
        time: DateTime<Utc>,
    ) -> Result<ObservationWindowResult, WindowSearchError> {
        WindowSearch::new(self.site, &self.program.window_requirements, self.provider)
            .find(target, time, time)
    }

    /// Re-run the program's common cuts against an alternative window.
    ///
    /// Works on a scratch copy of the cut collection; the program's own
    /// evaluation state is untouched.
    pub fn common_cuts_pass(&self, alert: &Alert, window: &ObservationWindowResult) -> bool {
        let mut scratch = self.program.cuts.clone();
        scratch.execute_common(alert, window);
        scratch.common_results().iter().all(|&passed| passed)
    }
}
