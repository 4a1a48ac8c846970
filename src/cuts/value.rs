//! Typed cut values and the ordered-fallback coercion rules.
//!
//! Required and actual cut values are carried as a closed sum type. All
//! inputs — JSON literals from the cut registry, raw alert fields, plugin
//! return values — pass through one total coercion function before
//! comparison, so the fallback order (boolean literal, then float, then
//! unit-tagged quantity, then raw text) is defined in exactly one place.

use std::cmp::Ordering;

/// Dimensional base of a [`Value::Quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Time,
    Angle,
    Length,
    Temperature,
    Dimensionless,
}

impl Dimension {
    /// Canonical base unit symbol magnitudes are normalized to.
    pub fn base_unit(&self) -> &'static str {
        match self {
            Dimension::Time => "s",
            Dimension::Angle => "deg",
            Dimension::Length => "m",
            Dimension::Temperature => "K",
            Dimension::Dimensionless => "",
        }
    }
}

/// A coerced cut value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
    /// Unit-tagged quantity, magnitude normalized to the dimension's base
    /// unit (seconds, degrees, meters, kelvin).
    Quantity { magnitude: f64, dimension: Dimension },
}

impl Value {
    /// Quantity from an amount in a named unit.
    pub fn quantity(magnitude: f64, unit: &str) -> Option<Self> {
        let (dimension, factor) = unit_factor(unit)?;
        Some(Value::Quantity {
            magnitude: magnitude * factor,
            dimension,
        })
    }

    pub fn hours(h: qtty::Hours) -> Self {
        Value::Quantity {
            magnitude: h.value() * 3600.0,
            dimension: Dimension::Time,
        }
    }

    pub fn degrees(d: qtty::Degrees) -> Self {
        Value::Quantity {
            magnitude: d.value(),
            dimension: Dimension::Angle,
        }
    }

    /// Coerce a raw JSON value.
    ///
    /// Booleans and numbers pass through (integers promote to float);
    /// strings follow the ordered string fallback; everything else
    /// degrades to its text rendering.
    pub fn coerce_json(raw: &serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::coerce_str(s),
            other => Value::Text(other.to_string()),
        }
    }

    /// Ordered string fallback: boolean literal, float, quantity, text.
    pub fn coerce_str(s: &str) -> Self {
        if let Some(b) = parse_bool_literal(s) {
            return Value::Bool(b);
        }
        if let Ok(n) = s.trim().parse::<f64>() {
            return Value::Number(n);
        }
        if let Some(q) = parse_quantity(s) {
            return q;
        }
        Value::Text(s.to_string())
    }

    /// Whether this value is the infinite numeric sentinel.
    pub fn is_infinite(&self) -> bool {
        match self {
            Value::Number(n) => n.is_infinite(),
            Value::Quantity { magnitude, .. } => magnitude.is_infinite(),
            _ => false,
        }
    }

    /// Order two values of the same variant. `None` across variants or
    /// across quantity dimensions.
    pub fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (
                Value::Quantity {
                    magnitude: a,
                    dimension: da,
                },
                Value::Quantity {
                    magnitude: b,
                    dimension: db,
                },
            ) if da == db => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Quantity {
                magnitude,
                dimension,
            } => write!(f, "{magnitude} {}", dimension.base_unit()),
        }
    }
}

/// "true"/"false"/"yes"/"no", case-insensitive.
fn parse_bool_literal(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

/// Unit symbol to (dimension, factor-to-base-unit).
fn unit_factor(unit: &str) -> Option<(Dimension, f64)> {
    let factor = match unit {
        "s" | "sec" | "second" | "seconds" => (Dimension::Time, 1.0),
        "min" | "minute" | "minutes" => (Dimension::Time, 60.0),
        "h" | "hr" | "hour" | "hours" => (Dimension::Time, 3600.0),
        "d" | "day" | "days" => (Dimension::Time, 86400.0),
        "deg" | "degree" | "degrees" => (Dimension::Angle, 1.0),
        "arcmin" => (Dimension::Angle, 1.0 / 60.0),
        "arcsec" => (Dimension::Angle, 1.0 / 3600.0),
        "rad" => (Dimension::Angle, 180.0 / std::f64::consts::PI),
        "m" | "meter" | "meters" => (Dimension::Length, 1.0),
        "km" => (Dimension::Length, 1000.0),
        "cm" => (Dimension::Length, 0.01),
        "mm" => (Dimension::Length, 0.001),
        "K" | "kelvin" => (Dimension::Temperature, 1.0),
        "%" | "percent" => (Dimension::Dimensionless, 1.0),
        _ => return None,
    };
    Some(factor)
}

/// Parse `"<number> <unit>"` (whitespace optional) into a quantity.
///
/// The unit starts at the first alphabetic character that does not
/// continue the float literal, so exponent notation (`1.5e3 s`) keeps
/// its `e` with the magnitude.
fn parse_quantity(s: &str) -> Option<Value> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let split = s
        .char_indices()
        .find(|&(i, c)| {
            c == '%'
                || (c.is_alphabetic()
                    && !(matches!(c, 'e' | 'E') && continues_float_literal(bytes, i)))
        })
        .map(|(i, _)| i)?;
    let magnitude: f64 = s[..split].trim().parse().ok()?;
    Value::quantity(magnitude, s[split..].trim())
}

/// Whether the `e`/`E` at byte offset `i` is an exponent marker: a digit
/// directly before it and a (possibly signed) digit after it.
fn continues_float_literal(bytes: &[u8], i: usize) -> bool {
    let digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
    let after = match bytes.get(i + 1) {
        Some(b'+') | Some(b'-') => bytes.get(i + 2),
        other => other,
    };
    digit_before && after.is_some_and(u8::is_ascii_digit)
}
