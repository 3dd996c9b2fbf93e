//! Random 64-bit integers, unbounded or ranged.

use rand::rngs::StdRng;
use rand::Rng;

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::args::{int_value, GeneratorArgs};
use crate::error::GeneratorError;
use crate::Generator;

pub struct Int64Generator {
    rng: StdRng,
    range: Option<(i64, i64)>,
}

impl Int64Generator {
    pub fn new(args: &GeneratorArgs) -> Result<Self, GeneratorError> {
        let range = if args.ranged {
            let min = match &args.minimum {
                Some(v) => int_value(v, "minimum")?,
                None => return Err(GeneratorError::bad_arg("minimum", "integer", &args.minimum)),
            };
            let max = match &args.maximum {
                Some(v) => int_value(v, "maximum")?,
                None => return Err(GeneratorError::bad_arg("maximum", "integer", &args.maximum)),
            };
            if max <= min {
                return Err(GeneratorError::bad_arg(
                    "maximum",
                    "value greater than minimum",
                    max,
                ));
            }
            Some((min, max))
        } else {
            None
        };

        Ok(Self {
            rng: args.rng(),
            range,
        })
    }
}

impl Generator for Int64Generator {
    fn next_value(&mut self) -> Value {
        let v = match self.range {
            // Half-open, matching `min + rand_int_n(max - min)`.
            Some((min, max)) => self.rng.gen_range(min..max),
            None => self.rng.gen_range(0..i64::MAX),
        };
        Value::Int64(v)
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Int64
    }
}
