//! Single-cut definition, state and evaluation.

use serde::{Deserialize, Serialize};

use super::resolvers::CommonResolver;
use super::value::Value;
use super::CutConfigError;

/// Comparison mode of a cut, using the registry wire symbols.
///
/// Both directional comparators are non-strict, and their semantics are
/// inverted relative to their symbols: `>` passes iff required <= actual,
/// `<` passes iff required >= actual. This matches the deployed registry
/// files and is deliberately preserved; the symbol, not the name, is the
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Greater,
    Less,
    Equal,
}

impl Comparator {
    /// Parse a registry comparator symbol (`"=="`, `">"`, `"<"`).
    pub fn parse(symbol: &str) -> Result<Self, CutConfigError> {
        match symbol {
            ">" => Ok(Comparator::Greater),
            "<" => Ok(Comparator::Less),
            "==" => Ok(Comparator::Equal),
            other => Err(CutConfigError::UnknownComparator(other.to_string())),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Greater => ">",
            Comparator::Less => "<",
            Comparator::Equal => "==",
        }
    }
}

/// How a cut's actual value is produced.
#[derive(Debug, Clone)]
pub enum CutKind {
    /// Built-in resolver, dispatched statically.
    Common(CommonResolver),
    /// Program-specific plugin, looked up by name at configuration load.
    Custom { plugin: String },
}

impl CutKind {
    pub fn is_common(&self) -> bool {
        matches!(self, CutKind::Common(_))
    }
}

/// Immutable cut definition from a program's cut registry.
#[derive(Debug, Clone)]
pub struct CutDefinition {
    /// Short cut name (for custom cuts, without the plugin prefix)
    pub name: String,
    /// Pre-coerced required value
    pub required: Value,
    pub comparator: Comparator,
    pub kind: CutKind,
}

impl CutDefinition {
    /// Fully qualified name, `plugin.name` for custom cuts.
    pub fn qualified_name(&self) -> String {
        match &self.kind {
            CutKind::Common(_) => self.name.clone(),
            CutKind::Custom { plugin } => format!("{plugin}.{}", self.name),
        }
    }
}

/// Mutable runtime companion of a [`CutDefinition`].
///
/// Reset and recomputed on every evaluation pass, never shared across
/// alerts. `performed` records whether evaluation completed without a
/// type or unit error; `passed` records the comparison outcome.
#[derive(Debug, Clone, Default)]
pub struct CutState {
    pub actual: Option<Value>,
    pub performed: bool,
    pub passed: bool,
}

impl CutState {
    pub fn reset(&mut self) {
        *self = CutState::default();
    }

    /// Mark the cut failed without a completed evaluation.
    pub fn set_failed(&mut self) {
        self.performed = false;
        self.passed = false;
    }
}

/// One cut: definition plus its current evaluation state.
#[derive(Debug, Clone)]
pub struct Cut {
    pub definition: CutDefinition,
    pub state: CutState,
}

impl Cut {
    pub fn new(definition: CutDefinition) -> Self {
        Self {
            definition,
            state: CutState::default(),
        }
    }

    /// Evaluate the cut against the actual value in `state.actual`.
    ///
    /// Failure ladder:
    /// 1. missing actual value -> failed, unperformed;
    /// 2. variant mismatch -> failed, unperformed — unless one side is
    ///    the infinite numeric sentinel, which is a real comparison that
    ///    lost (failed, performed);
    /// 3. quantity dimension mismatch -> failed, unperformed;
    /// 4. otherwise apply the comparator and mark performed.
    pub fn evaluate(&mut self) {
        self.state.performed = false;
        self.state.passed = false;

        let required = &self.definition.required;
        let Some(actual) = self.state.actual.as_ref() else {
            log::warn!("cut '{}': no actual value, cut failed", self.definition.name);
            return;
        };

        if std::mem::discriminant(required) != std::mem::discriminant(actual) {
            if required.is_infinite() || actual.is_infinite() {
                // e.g. a delay cut against the "no window" sentinel.
                self.state.performed = true;
                return;
            }
            log::warn!(
                "cut '{}': incompatible types ({required} vs {actual}), cut failed",
                self.definition.name
            );
            return;
        }

        let ordering = match required.partial_cmp(actual) {
            Some(ordering) => ordering,
            None => {
                // Same variant but no ordering: quantities with different
                // dimensional bases (or NaN).
                log::warn!(
                    "cut '{}': values not comparable ({required} vs {actual}), cut failed",
                    self.definition.name
                );
                return;
            }
        };

        self.state.passed = match self.definition.comparator {
            Comparator::Equal => ordering == std::cmp::Ordering::Equal,
            Comparator::Greater => ordering != std::cmp::Ordering::Greater,
            Comparator::Less => ordering != std::cmp::Ordering::Less,
        };
        self.state.performed = true;
    }
}

impl std::fmt::Display for Cut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' {} {}  -> actual value: {}",
            self.definition.qualified_name(),
            self.definition.comparator.symbol(),
            self.definition.required,
            self.state
                .actual
                .as_ref()
                .map_or_else(|| "<none>".to_string(), |v| v.to_string()),
        )?;
        if self.state.performed {
            if self.state.passed {
                write!(f, "  -> cut passed.")
            } else {
                write!(f, "  -> cut failed.")
            }
        } else {
            write!(f, "  -> cut not performed.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuts::value::Dimension;

    fn common_cut(required: Value, comparator: Comparator) -> Cut {
        Cut::new(CutDefinition {
            name: "test".into(),
            required,
            comparator,
            kind: CutKind::Common(CommonResolver::CurrentlyInSchedule),
        })
    }

    fn run(required: Value, symbol: &str, actual: Value) -> (bool, bool) {
        let mut cut = common_cut(required, Comparator::parse(symbol).unwrap());
        cut.state.actual = Some(actual);
        cut.evaluate();
        (cut.state.performed, cut.state.passed)
    }

    fn passes(required: Value, symbol: &str, actual: Value) -> bool {
        let (performed, passed) = run(required, symbol, actual);
        performed && passed
    }

    fn hours(h: f64) -> Value {
        Value::quantity(h, "h").unwrap()
    }

    #[test]
    fn test_comparator_symbols() {
        assert_eq!(Comparator::parse("==").unwrap(), Comparator::Equal);
        assert_eq!(Comparator::parse(">").unwrap(), Comparator::Greater);
        assert_eq!(Comparator::parse("<").unwrap(), Comparator::Less);
        assert!(Comparator::parse(">=").is_err());
        assert_eq!(Comparator::Greater.symbol(), ">");
    }

    // Vector table carried over from the deployed handler's unit tests.
    #[test]
    fn test_evaluation_vectors() {
        assert!(passes(Value::Bool(true), "==", Value::Bool(true)));
        assert!(passes(Value::coerce_str("True"), "==", Value::Bool(true)));
        assert!(!passes(Value::Bool(true), "==", Value::Bool(false)));
        assert!(passes(Value::Text("abc".into()), "==", Value::Text("abc".into())));
        assert!(!passes(Value::Text("foo".into()), "==", Value::Text("bar".into())));
        assert!(passes(Value::Number(10.0), "==", Value::Number(10.0)));
        assert!(passes(Value::coerce_str("10"), "==", Value::Number(10.0)));
        assert!(passes(hours(10.0), "==", Value::quantity(600.0, "min").unwrap()));
        assert!(!passes(hours(10.0), "==", Value::quantity(1.0, "s").unwrap()));
        assert!(passes(hours(10.0), "==", Value::coerce_str("10 h")));
        assert!(!passes(hours(10.0), "==", Value::coerce_str("5 K")));
        assert!(passes(
            Value::quantity(12.5, "deg").unwrap(),
            "==",
            Value::coerce_str("12.5 deg")
        ));
        // Non-strict inverted directional semantics.
        assert!(passes(Value::Number(1.09), ">", Value::Number(1.2)));
        assert!(!passes(Value::Number(125.2), ">", Value::Number(5.5)));
    }

    #[test]
    fn test_greater_passes_iff_required_le_actual() {
        assert!(passes(Value::Number(5.0), ">", Value::Number(5.0)));
        assert!(passes(Value::Number(5.0), ">", Value::Number(6.0)));
        assert!(!passes(Value::Number(5.0), ">", Value::Number(4.9)));
    }

    #[test]
    fn test_less_passes_iff_required_ge_actual() {
        assert!(passes(Value::Number(5.0), "<", Value::Number(5.0)));
        assert!(passes(Value::Number(5.0), "<", Value::Number(4.0)));
        assert!(!passes(Value::Number(5.0), "<", Value::Number(5.1)));
    }

    #[test]
    fn test_unit_mismatch_is_unperformed() {
        let (performed, passed) = run(hours(10.0), "==", Value::coerce_str("5 K"));
        assert!(!performed);
        assert!(!passed);
    }

    #[test]
    fn test_type_mismatch_is_unperformed() {
        let (performed, passed) = run(Value::Bool(true), "==", Value::Number(1.0));
        assert!(!performed);
        assert!(!passed);
    }

    #[test]
    fn test_infinite_sentinel_is_performed_failure() {
        // A delay requirement compared against the "no window" sentinel:
        // a real numeric comparison that lost, not a type error.
        let (performed, passed) = run(hours(5.0), "<", Value::Number(f64::INFINITY));
        assert!(performed);
        assert!(!passed);
    }

    #[test]
    fn test_missing_actual_fails_unperformed() {
        let mut cut = common_cut(Value::Bool(true), Comparator::Equal);
        cut.evaluate();
        assert!(!cut.state.performed);
        assert!(!cut.state.passed);
    }

    #[test]
    fn test_state_reset_between_passes() {
        let mut cut = common_cut(Value::Number(1.0), Comparator::Equal);
        cut.state.actual = Some(Value::Number(1.0));
        cut.evaluate();
        assert!(cut.state.performed && cut.state.passed);

        cut.state.reset();
        assert!(cut.state.actual.is_none());
        assert!(!cut.state.performed && !cut.state.passed);
    }

    #[test]
    fn test_quantity_inequality_direction() {
        // required 1 h > actual means passes iff 1 h <= actual.
        assert!(passes(hours(1.0), ">", Value::quantity(90.0, "min").unwrap()));
        assert!(!passes(hours(1.0), ">", Value::quantity(30.0, "min").unwrap()));
    }

    #[test]
    fn test_display_reports_outcome() {
        let mut cut = common_cut(Value::Number(1.0), Comparator::Equal);
        cut.state.actual = Some(Value::Number(1.0));
        cut.evaluate();
        let line = format!("{cut}");
        assert!(line.contains("cut passed"));
    }
}
