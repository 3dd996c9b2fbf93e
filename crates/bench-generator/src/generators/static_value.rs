//! Uniform selection from a fixed set of values.

use rand::rngs::StdRng;
use rand::Rng;

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::error::GeneratorError;
use crate::Generator;

/// Picks one of the given values uniformly at random on each `next()`.
pub struct StaticGenerator {
    rng: StdRng,
    values: Vec<Value>,
    kind: ColumnKind,
}

impl StaticGenerator {
    pub fn new(rng: StdRng, kind: ColumnKind, values: Vec<Value>) -> Result<Self, GeneratorError> {
        if values.is_empty() {
            return Err(GeneratorError::EmptyStatic);
        }
        Ok(Self { rng, values, kind })
    }
}

impl Generator for StaticGenerator {
    fn next_value(&mut self) -> Value {
        let idx = self.rng.gen_range(0..self.values.len());
        self.values[idx].clone()
    }

    fn kind(&self) -> ColumnKind {
        self.kind
    }
}
