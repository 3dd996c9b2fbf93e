//! Random exact-decimal values.

use rand::rngs::StdRng;
use rand::Rng;

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::args::GeneratorArgs;
use crate::error::GeneratorError;
use crate::Generator;

/// Random decimals shaped for a `NUMERIC(38, 9)` column: a random
/// non-negative integer part and nine fractional digits.
pub struct NumericGenerator {
    rng: StdRng,
}

impl NumericGenerator {
    pub fn new(args: &GeneratorArgs) -> Result<Self, GeneratorError> {
        Ok(Self { rng: args.rng() })
    }
}

impl Generator for NumericGenerator {
    fn next_value(&mut self) -> Value {
        let int_part: i64 = self.rng.gen_range(0..i64::MAX);
        let frac: u32 = self.rng.gen_range(0..1_000_000_000);
        Value::Numeric(format!("{int_part}.{frac:09}"))
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Numeric
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_schema::ColumnType;

    #[test]
    fn emits_decimal_strings_with_nine_fraction_digits() {
        let args = GeneratorArgs::for_type(ColumnType::scalar(ColumnKind::Numeric));
        let mut gen = NumericGenerator::new(&args).unwrap();
        for _ in 0..32 {
            match gen.next_value() {
                Value::Numeric(text) => {
                    let (int_part, frac) = text.split_once('.').expect("decimal point");
                    assert!(int_part.parse::<i64>().unwrap() >= 0);
                    assert_eq!(frac.len(), 9);
                    assert!(frac.bytes().all(|b| b.is_ascii_digit()));
                }
                other => panic!("unexpected value {other:?}"),
            }
        }
    }
}
