//! The parameter bag shared by all generator constructors.

use chrono::{DateTime, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use bench_core::ConfigValue;
use bench_schema::ColumnType;

use crate::error::GeneratorError;

/// Construction parameters for a generator.
///
/// A copy of this bag is made per configured range, so one column
/// configuration can fan out into several concrete generators.
#[derive(Debug, Clone)]
pub struct GeneratorArgs {
    pub column_type: ColumnType,
    pub seed: Option<u64>,
    pub length: Option<usize>,
    /// Static-value mode: every `next()` returns `value`.
    pub static_value: bool,
    pub value: Option<ConfigValue>,
    pub begin: Option<ConfigValue>,
    pub end: Option<ConfigValue>,
    pub minimum: Option<ConfigValue>,
    pub maximum: Option<ConfigValue>,
    /// Constrain the generator to `[minimum, maximum)`.
    pub ranged: bool,
}

impl GeneratorArgs {
    pub fn for_type(column_type: ColumnType) -> Self {
        Self {
            column_type,
            seed: None,
            length: None,
            static_value: false,
            value: None,
            begin: None,
            end: None,
            minimum: None,
            maximum: None,
            ranged: false,
        }
    }

    /// A generator-private RNG: seeded when the configuration says so,
    /// from entropy otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Coerce a range bound into an integer.
pub fn int_value(value: &ConfigValue, what: &str) -> Result<i64, GeneratorError> {
    match value {
        ConfigValue::Int(v) => Ok(*v),
        other => Err(GeneratorError::bad_arg(what, "integer", other)),
    }
}

/// Coerce a range bound into a float; integers widen.
pub fn float_value(value: &ConfigValue, what: &str) -> Result<f64, GeneratorError> {
    match value {
        ConfigValue::Float(v) => Ok(*v),
        ConfigValue::Int(v) => Ok(*v as f64),
        other => Err(GeneratorError::bad_arg(what, "float", other)),
    }
}

pub fn bool_value(value: &ConfigValue, what: &str) -> Result<bool, GeneratorError> {
    match value {
        ConfigValue::Bool(v) => Ok(*v),
        other => Err(GeneratorError::bad_arg(what, "bool", other)),
    }
}

pub fn string_value(value: &ConfigValue, what: &str) -> Result<String, GeneratorError> {
    match value {
        ConfigValue::Text(v) => Ok(v.clone()),
        other => Err(GeneratorError::bad_arg(what, "string", other)),
    }
}

/// Coerce a range bound into unix seconds. Integers are taken verbatim;
/// text is parsed as RFC 3339 or `YYYY-MM-DD`.
pub fn unix_seconds(value: &ConfigValue, what: &str) -> Result<i64, GeneratorError> {
    match value {
        ConfigValue::Int(v) => Ok(*v),
        ConfigValue::Text(text) => parse_time(text)
            .map(|dt| dt.timestamp())
            .ok_or_else(|| GeneratorError::bad_arg(what, "timestamp", text)),
        other => Err(GeneratorError::bad_arg(what, "timestamp", other)),
    }
}

fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_schema::{ColumnKind, ColumnType};

    #[test]
    fn seeded_rngs_are_deterministic() {
        use rand::Rng;

        let mut args = GeneratorArgs::for_type(ColumnType::scalar(ColumnKind::Int64));
        args.seed = Some(42);
        let a: u64 = args.rng().gen();
        let b: u64 = args.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn coercions_accept_matching_shapes() {
        assert_eq!(int_value(&ConfigValue::Int(5), "minimum").unwrap(), 5);
        assert_eq!(float_value(&ConfigValue::Int(5), "minimum").unwrap(), 5.0);
        assert_eq!(float_value(&ConfigValue::Float(0.5), "m").unwrap(), 0.5);
        assert!(bool_value(&ConfigValue::Bool(true), "value").unwrap());
        assert_eq!(
            unix_seconds(&ConfigValue::Text("1970-01-02".into()), "minimum").unwrap(),
            86_400
        );
        assert_eq!(
            unix_seconds(&ConfigValue::Text("1970-01-01T01:00:00Z".into()), "minimum").unwrap(),
            3_600
        );
    }

    #[test]
    fn coercions_reject_mismatched_shapes() {
        assert!(int_value(&ConfigValue::Text("five".into()), "minimum").is_err());
        assert!(bool_value(&ConfigValue::Int(1), "value").is_err());
        assert!(unix_seconds(&ConfigValue::Text("whenever".into()), "minimum").is_err());
        assert!(float_value(&ConfigValue::Bool(true), "maximum").is_err());
    }
}
