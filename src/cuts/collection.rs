//! Cut collection: parse, evaluate, aggregate.

use serde_json::Value as Json;

use super::cut::{Comparator, Cut, CutDefinition, CutKind};
use super::resolvers::CommonResolver;
use super::value::Value;
use super::CutConfigError;
use crate::models::{Alert, EquatorialCoordinates};
use crate::plugins::{EvaluationContext, PluginRegistry};
use crate::window::ObservationWindowResult;

/// All cuts of one program, in registry order within each group.
///
/// Cloned per evaluation pass, so evaluation state never leaks between
/// alerts.
#[derive(Debug, Clone, Default)]
pub struct CutCollection {
    common: Vec<Cut>,
    custom: Vec<Cut>,
}

impl CutCollection {
    /// Build the collection from the `Cuts` section of a program
    /// configuration.
    ///
    /// Expected shape:
    /// ```json
    /// {
    ///   "CommonCuts": { "<name>": ["<required>", "<comparator>"] },
    ///   "CustomCuts": { "<plugin>.<name>": ["<required>", "<comparator>"] }
    /// }
    /// ```
    /// Every name, plugin and comparator is resolved here, so a bad
    /// registry entry fails the program load instead of alert processing.
    pub fn from_registry(data: &Json, plugins: &PluginRegistry) -> Result<Self, CutConfigError> {
        let mut collection = CutCollection::default();

        if let Some(entries) = data.get("CommonCuts") {
            for (name, entry) in object_entries("CommonCuts", entries)? {
                let (required, comparator) = parse_entry(name, entry)?;
                let resolver = CommonResolver::parse(name)?;
                collection.common.push(Cut::new(CutDefinition {
                    name: name.to_string(),
                    required,
                    comparator,
                    kind: CutKind::Common(resolver),
                }));
            }
        }

        if let Some(entries) = data.get("CustomCuts") {
            for (qualified, entry) in object_entries("CustomCuts", entries)? {
                let (required, comparator) = parse_entry(qualified, entry)?;
                let Some((plugin, name)) = qualified.split_once('.') else {
                    return Err(CutConfigError::MalformedEntry(
                        qualified.to_string(),
                        "custom cut names are '<plugin>.<cut>'".to_string(),
                    ));
                };
                if !plugins.contains(plugin) {
                    return Err(CutConfigError::UnknownPlugin(plugin.to_string()));
                }
                collection.custom.push(Cut::new(CutDefinition {
                    name: name.to_string(),
                    required,
                    comparator,
                    kind: CutKind::Custom {
                        plugin: plugin.to_string(),
                    },
                }));
            }
        }

        Ok(collection)
    }

    /// Evaluate every cut against one alert and its observation window.
    ///
    /// Returns the alternative pointing positions collected from custom
    /// cuts. A failing plugin marks only its own cut failed.
    pub fn execute(
        &mut self,
        alert: &Alert,
        window: &ObservationWindowResult,
        ctx: &EvaluationContext<'_>,
    ) -> Vec<EquatorialCoordinates> {
        self.execute_common(alert, window);

        let mut candidates = Vec::new();
        for cut in &mut self.custom {
            cut.state.reset();
            let CutKind::Custom { plugin } = &cut.definition.kind else {
                continue;
            };
            let Some(module) = ctx.plugins.get(plugin) else {
                // Load-time validation makes this unreachable in practice.
                log::warn!("cut '{}': plugin not registered, cut failed", cut.definition.qualified_name());
                cut.state.set_failed();
                continue;
            };
            match module.evaluate(&cut.definition.name, alert, window, ctx) {
                Ok(outcome) => {
                    cut.state.actual = Some(outcome.value);
                    cut.evaluate();
                    if let Some(mut found) = outcome.candidates {
                        candidates.append(&mut found);
                    }
                }
                Err(err) => {
                    log::warn!(
                        "cut '{}': evaluation error ({err}), cut failed",
                        cut.definition.qualified_name()
                    );
                    cut.state.set_failed();
                }
            }
        }
        candidates
    }

    /// Evaluate only the common cuts. Used by plugins to vet alternative
    /// windows without touching custom cut state.
    pub fn execute_common(&mut self, alert: &Alert, window: &ObservationWindowResult) {
        for cut in &mut self.common {
            cut.state.reset();
            let CutKind::Common(resolver) = &cut.definition.kind else {
                continue;
            };
            match resolver.resolve(alert, window) {
                Ok(actual) => {
                    cut.state.actual = Some(actual);
                    cut.evaluate();
                }
                Err(err) => {
                    log::warn!(
                        "cut '{}': could not resolve actual value ({err}), cut failed",
                        cut.definition.name
                    );
                    cut.state.set_failed();
                }
            }
        }
    }

    /// Aggregate verdict: every cut performed and passed.
    pub fn result(&self) -> bool {
        self.common
            .iter()
            .chain(&self.custom)
            .all(|cut| cut.state.performed && cut.state.passed)
    }

    pub fn common_results(&self) -> Vec<bool> {
        self.common.iter().map(|cut| cut.state.passed).collect()
    }

    pub fn custom_results(&self) -> Vec<bool> {
        self.custom.iter().map(|cut| cut.state.passed).collect()
    }

    pub fn common(&self) -> &[Cut] {
        &self.common
    }

    pub fn custom(&self) -> &[Cut] {
        &self.custom
    }

    pub fn len(&self) -> usize {
        self.common.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.common.is_empty() && self.custom.is_empty()
    }

    /// One line per cut, in evaluation order.
    pub fn report(&self) -> String {
        self.common
            .iter()
            .chain(&self.custom)
            .map(|cut| cut.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn object_entries<'a>(
    section: &str,
    entries: &'a Json,
) -> Result<impl Iterator<Item = (&'a String, &'a Json)>, CutConfigError> {
    entries
        .as_object()
        .map(|map| map.iter())
        .ok_or_else(|| {
            CutConfigError::MalformedEntry(section.to_string(), "expected an object".to_string())
        })
}

/// Parse one `[required, comparator]` registry pair.
fn parse_entry(name: &str, entry: &Json) -> Result<(Value, Comparator), CutConfigError> {
    let pair = entry.as_array().filter(|a| a.len() == 2).ok_or_else(|| {
        CutConfigError::MalformedEntry(
            name.to_string(),
            "expected a [required, comparator] pair".to_string(),
        )
    })?;
    let required = Value::coerce_json(&pair[0]);
    let symbol = pair[1].as_str().ok_or_else(|| {
        CutConfigError::MalformedEntry(name.to_string(), "comparator must be a string".to_string())
    })?;
    Ok((required, Comparator::parse(symbol)?))
}
