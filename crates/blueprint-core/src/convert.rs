//! Value converters
//!
//! Converters coerce a value into the representation expected at a location
//! before the loader retries an assignment that failed with a type mismatch.
//! [`ConverterRegistry`] holds at most one converter per target [`Kind`].

use crate::value::{Field, Kind, Value};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Errors raised by converters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// Text is not a valid duration
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },

    /// Generic converter failure
    #[error("conversion to {target} failed: {reason}")]
    Failed { target: Kind, reason: String },
}

/// Coerces a value into another representation
pub trait Converter: Send + Sync {
    /// Convert `value`
    ///
    /// # Errors
    /// Returns [`ConvertError`] if the value cannot be represented
    fn convert(&self, value: Value) -> Result<Value, ConvertError>;
}

impl<F> Converter for F
where
    F: Fn(Value) -> Result<Value, ConvertError> + Send + Sync,
{
    fn convert(&self, value: Value) -> Result<Value, ConvertError> {
        self(value)
    }
}

/// Registry of converters keyed by target kind
#[derive(Default)]
pub struct ConverterRegistry {
    converters: Mutex<HashMap<Kind, Arc<dyn Converter>>>,
}

static GLOBAL: Lazy<Arc<ConverterRegistry>> =
    Lazy::new(|| Arc::new(ConverterRegistry::with_defaults()));

impl ConverterRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with the built-in converters (text to duration)
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register::<Duration>(duration_converter);
        registry
    }

    /// Process-wide registry, pre-filled with the built-in converters
    #[must_use]
    pub fn global() -> &'static Arc<ConverterRegistry> {
        &GLOBAL
    }

    /// Register the converter for the kind of field type `T`
    ///
    /// # Panics
    /// Panics if a converter is already registered for that kind.
    pub fn register<T: Field>(&self, converter: impl Converter + 'static) {
        self.register_kind(T::kind(), converter);
    }

    /// Register the converter for `kind`
    ///
    /// # Panics
    /// Panics if a converter is already registered for `kind`.
    pub fn register_kind(&self, kind: Kind, converter: impl Converter + 'static) {
        let mut converters = self.converters.lock();

        if converters.contains_key(&kind) {
            drop(converters);
            tracing::error!(kind = %kind, "duplicate converter registration");
            panic!("duplicate converters for type '{kind}'");
        }

        converters.insert(kind, Arc::new(converter));
    }

    /// Check if a converter exists for `kind`
    #[must_use]
    pub fn contains(&self, kind: &Kind) -> bool {
        self.converters.lock().contains_key(kind)
    }

    /// Convert `value` for a location of `kind`
    ///
    /// Returns `None` when no converter is registered for `kind`.
    pub fn convert(&self, kind: &Kind, value: Value) -> Option<Result<Value, ConvertError>> {
        let converter = self.converters.lock().get(kind).cloned()?;
        Some(converter.convert(value))
    }
}

impl Debug for ConverterRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let converters = self.converters.lock();
        f.debug_set().entries(converters.keys()).finish()
    }
}

/// Converts duration text (`"5s"`, `"1h30m"`, `"250ms"`) into a duration
///
/// Values that are not text are returned unchanged.
///
/// # Errors
/// Returns [`ConvertError::InvalidDuration`] for malformed text
pub fn duration_converter(value: Value) -> Result<Value, ConvertError> {
    match value {
        Value::Str(text) => parse_duration(&text).map(Value::Duration),
        other => Ok(other),
    }
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parse duration text as a sequence of decimal numbers, each with a unit
///
/// Units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare `0` is accepted.
///
/// # Errors
/// Returns [`ConvertError::InvalidDuration`] for malformed or negative text
pub fn parse_duration(text: &str) -> Result<Duration, ConvertError> {
    let invalid = |reason: &str| ConvertError::InvalidDuration {
        input: text.to_string(),
        reason: reason.to_string(),
    };

    let mut rest = text.strip_prefix('+').unwrap_or(text);
    if rest.starts_with('-') {
        return Err(invalid("negative durations are not supported"));
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid("empty duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        if number.is_empty() || number == "." {
            return Err(invalid("expected a number"));
        }

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        if unit.is_empty() {
            return Err(invalid("missing unit"));
        }
        let scale = unit_nanos(unit).ok_or_else(|| invalid(&format!("unknown unit '{unit}'")))?;

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if fraction.contains('.') {
            return Err(invalid("expected a number"));
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("number out of range"))?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| invalid("duration out of range"))?;

        if !fraction.is_empty() {
            let digits = &fraction[..fraction.len().min(18)];
            let value: u128 = digits.parse().map_err(|_| invalid("expected a number"))?;
            let denominator = 10u128.pow(u32::try_from(digits.len()).unwrap_or(18));
            nanos = nanos
                .checked_add(value * scale / denominator)
                .ok_or_else(|| invalid("duration out of range"))?;
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| invalid("duration out of range"))?;
        rest = tail;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| invalid("duration out of range"))?;
    let subsec = u32::try_from(total % NANOS_PER_SEC).unwrap_or(0);
    Ok(Duration::new(secs, subsec))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_units() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2us").unwrap(), Duration::from_micros(2));
        assert_eq!(parse_duration("2µs").unwrap(), Duration::from_micros(2));
        assert_eq!(parse_duration("10ns").unwrap(), Duration::from_nanos(10));
        assert_eq!(parse_duration("3m").unwrap(), Duration::from_secs(180));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7_200));
    }

    #[test]
    fn parse_compound_and_fractional() {
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5_400));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1_500));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("+1m1s").unwrap(), Duration::from_secs(61));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn parse_rejects_malformed() {
        for text in ["", "5", "s", "-5s", "5x", "1..5s", "."] {
            assert!(
                matches!(parse_duration(text), Err(ConvertError::InvalidDuration { .. })),
                "accepted '{text}'"
            );
        }
    }

    #[test]
    fn parse_rejects_fraction_past_the_limit() {
        let hours = u128::MAX / 3_600_000_000_000;
        for text in [format!("{hours}.99h"), format!("{}s", u128::MAX)] {
            assert!(
                matches!(parse_duration(&text), Err(ConvertError::InvalidDuration { .. })),
                "accepted '{text}'"
            );
        }
        assert!(parse_duration(&format!("{hours}h")).is_err());
    }

    #[test]
    fn duration_converter_leaves_non_text_alone() {
        assert_eq!(duration_converter(Value::Int(5)).unwrap(), Value::Int(5));
        assert_eq!(
            duration_converter(Value::from("5s")).unwrap(),
            Value::Duration(Duration::from_secs(5))
        );
    }

    #[test]
    fn registry_with_defaults_has_duration() {
        let registry = ConverterRegistry::with_defaults();
        assert!(registry.contains(&Kind::Duration));
        let converted = registry.convert(&Kind::Duration, Value::from("1m")).unwrap();
        assert_eq!(converted.unwrap(), Value::Duration(Duration::from_secs(60)));
    }

    #[test]
    fn registry_without_converter_returns_none() {
        let registry = ConverterRegistry::new();
        assert!(registry.convert(&Kind::Duration, Value::from("1m")).is_none());
    }

    #[test]
    fn register_closure_converter() {
        let registry = ConverterRegistry::new();
        registry.register::<bool>(|value: Value| match value {
            Value::Str(text) => Ok(Value::Bool(text == "yes")),
            other => Err(ConvertError::Failed {
                target: Kind::Bool,
                reason: format!("cannot read {}", other.kind_name()),
            }),
        });

        let converted = registry.convert(&Kind::Bool, Value::from("yes")).unwrap();
        assert_eq!(converted.unwrap(), Value::Bool(true));
        assert!(registry.convert(&Kind::Bool, Value::Int(1)).unwrap().is_err());
    }

    #[test]
    #[should_panic(expected = "duplicate converters")]
    fn duplicate_converter_panics() {
        let registry = ConverterRegistry::with_defaults();
        registry.register::<Duration>(duration_converter);
    }
}
