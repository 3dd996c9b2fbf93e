//! Random and static boolean generation.

use rand::rngs::StdRng;
use rand::RngCore;

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::args::{bool_value, GeneratorArgs};
use crate::error::GeneratorError;
use crate::Generator;

/// Fair-coin booleans, one bit at a time from a 63-bit draw cache, or a
/// static constant when configured with `(static = true, value = <bool>)`.
pub struct BooleanGenerator {
    rng: StdRng,
    cache: u64,
    remaining: u32,
    constant: Option<bool>,
}

impl BooleanGenerator {
    pub fn new(args: &GeneratorArgs) -> Result<Self, GeneratorError> {
        let constant = if args.static_value {
            let value = args
                .value
                .as_ref()
                .ok_or_else(|| GeneratorError::bad_arg("value", "bool", &args.value))?;
            Some(bool_value(value, "value")?)
        } else {
            None
        };

        Ok(Self {
            rng: args.rng(),
            cache: 0,
            remaining: 0,
            constant,
        })
    }
}

impl Generator for BooleanGenerator {
    fn next_value(&mut self) -> Value {
        if let Some(constant) = self.constant {
            return Value::Bool(constant);
        }

        if self.remaining == 0 {
            self.cache = self.rng.next_u64() >> 1;
            self.remaining = 63;
        }
        let bit = self.cache & 1 == 1;
        self.cache >>= 1;
        self.remaining -= 1;

        Value::Bool(bit)
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Bool
    }
}
