//! Random calendar dates.

use chrono::DateTime;
use rand::rngs::StdRng;
use rand::Rng;

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::args::{unix_seconds, GeneratorArgs};
use crate::error::GeneratorError;
use crate::Generator;

// Default range: years 1970 through 2070.
pub(crate) const DEFAULT_MIN_UNIX: i64 = 0;
pub(crate) const DEFAULT_MAX_UNIX: i64 = 3_155_760_000;

pub(crate) fn time_range(args: &GeneratorArgs) -> Result<(i64, i64), GeneratorError> {
    if !args.ranged {
        return Ok((DEFAULT_MIN_UNIX, DEFAULT_MAX_UNIX));
    }

    let min = match &args.minimum {
        Some(v) => unix_seconds(v, "minimum")?,
        None => return Err(GeneratorError::bad_arg("minimum", "timestamp", &args.minimum)),
    };
    let max = match &args.maximum {
        Some(v) => unix_seconds(v, "maximum")?,
        None => return Err(GeneratorError::bad_arg("maximum", "timestamp", &args.maximum)),
    };
    if max <= min {
        return Err(GeneratorError::bad_arg(
            "maximum",
            "timestamp after minimum",
            max,
        ));
    }
    Ok((min, max))
}

/// Uniform unix-seconds in `[min, max)`, converted to a calendar date.
pub struct DateGenerator {
    rng: StdRng,
    min: i64,
    max: i64,
}

impl DateGenerator {
    pub fn new(args: &GeneratorArgs) -> Result<Self, GeneratorError> {
        let (min, max) = time_range(args)?;
        Ok(Self {
            rng: args.rng(),
            min,
            max,
        })
    }
}

impl Generator for DateGenerator {
    fn next_value(&mut self) -> Value {
        let sec = self.rng.gen_range(self.min..self.max);
        // In-range unix seconds always convert.
        let date = DateTime::from_timestamp(sec, 0)
            .map(|dt| dt.date_naive())
            .unwrap_or_default();
        Value::Date(date)
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Date
    }
}
