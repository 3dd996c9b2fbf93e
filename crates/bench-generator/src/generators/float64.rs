//! Random 64-bit floats, uniform over `[0, 1)` or ranged.

use rand::rngs::StdRng;
use rand::Rng;

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::args::{float_value, GeneratorArgs};
use crate::error::GeneratorError;
use crate::Generator;

/// Uniform floats.
///
/// Ranged mode computes `min + u * (max - min)` without normalizing the
/// bounds: callers passing `min > max` get values drawn from the reversed
/// interval, which is still well-formed output.
pub struct Float64Generator {
    rng: StdRng,
    range: Option<(f64, f64)>,
}

impl Float64Generator {
    pub fn new(args: &GeneratorArgs) -> Result<Self, GeneratorError> {
        let range = if args.ranged {
            let min = match &args.minimum {
                Some(v) => float_value(v, "minimum")?,
                None => return Err(GeneratorError::bad_arg("minimum", "float", &args.minimum)),
            };
            let max = match &args.maximum {
                Some(v) => float_value(v, "maximum")?,
                None => return Err(GeneratorError::bad_arg("maximum", "float", &args.maximum)),
            };
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

impl Generator for Float64Generator {
    fn next_value(&mut self) -> Value {
        let v = match self.range {
            Some((min, max)) => min + self.rng.gen::<f64>() * (max - min),
            None => self.rng.gen::<f64>(),
        };
        Value::Float64(v)
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Float64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_core::ConfigValue;
    use bench_schema::ColumnType;

    fn args() -> GeneratorArgs {
        GeneratorArgs::for_type(ColumnType::scalar(ColumnKind::Float64))
    }

    #[test]
    fn unbounded_is_unit_interval() {
        let mut gen = Float64Generator::new(&args()).unwrap();
        for _ in 0..128 {
            match gen.next_value() {
                Value::Float64(v) => assert!((0.0..1.0).contains(&v)),
                other => panic!("unexpected value {other:?}"),
            }
        }
    }

    #[test]
    fn ranged_values_span_the_interval() {
        let mut a = args();
        a.ranged = true;
        a.minimum = Some(ConfigValue::Float(10.0));
        a.maximum = Some(ConfigValue::Float(20.0));
        let mut gen = Float64Generator::new(&a).unwrap();
        for _ in 0..128 {
            match gen.next_value() {
                Value::Float64(v) => assert!((10.0..20.0).contains(&v)),
                other => panic!("unexpected value {other:?}"),
            }
        }
    }

    #[test]
    fn reversed_bounds_are_preserved() {
        let mut a = args();
        a.ranged = true;
        a.minimum = Some(ConfigValue::Float(20.0));
        a.maximum = Some(ConfigValue::Float(10.0));
        let mut gen = Float64Generator::new(&a).unwrap();
        for _ in 0..128 {
            match gen.next_value() {
                // 20 + u * (10 - 20) lands in (10, 20].
                Value::Float64(v) => assert!(v > 10.0 && v <= 20.0),
                other => panic!("unexpected value {other:?}"),
            }
        }
    }
}
