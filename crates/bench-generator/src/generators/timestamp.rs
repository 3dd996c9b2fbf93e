//! Random timestamps at one-second resolution.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::args::GeneratorArgs;
use crate::error::GeneratorError;
use crate::generators::date::time_range;
use crate::Generator;

/// Uniform unix-seconds in `[min, max)`, kept at full timestamp precision
/// rather than truncated to a day. Shares its default 1970–2070 range with
/// [`crate::generators::DateGenerator`].
pub struct TimestampGenerator {
    rng: StdRng,
    min: i64,
    max: i64,
}

impl TimestampGenerator {
    pub fn new(args: &GeneratorArgs) -> Result<Self, GeneratorError> {
        let (min, max) = time_range(args)?;
        Ok(Self {
            rng: args.rng(),
            min,
            max,
        })
    }
}

impl Generator for TimestampGenerator {
    fn next_value(&mut self) -> Value {
        let sec = self.rng.gen_range(self.min..self.max);
        let ts = DateTime::from_timestamp(sec, 0).unwrap_or_else(|| DateTime::<Utc>::MIN_UTC);
        Value::Timestamp(ts)
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Timestamp
    }
}
