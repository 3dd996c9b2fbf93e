//! Uniform delegation over several configured ranges.

use rand::rngs::StdRng;
use rand::Rng;

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::error::GeneratorError;
use crate::Generator;

/// Holds one generator per configured range and delegates each `next()`
/// to one of them, chosen uniformly.
pub struct SubRangeGenerator {
    rng: StdRng,
    generators: Vec<Box<dyn Generator>>,
}

impl SubRangeGenerator {
    pub fn new(rng: StdRng, generators: Vec<Box<dyn Generator>>) -> Result<Self, GeneratorError> {
        if generators.is_empty() {
            return Err(GeneratorError::EmptySubRange);
        }
        Ok(Self { rng, generators })
    }
}

impl Generator for SubRangeGenerator {
    fn next_value(&mut self) -> Value {
        let idx = self.rng.gen_range(0..self.generators.len());
        self.generators[idx].next_value()
    }

    fn kind(&self) -> ColumnKind {
        self.generators[0].kind()
    }
}
