//! Array wrapper over any scalar generator.

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::error::GeneratorError;
use crate::Generator;

/// Calls the inner generator `length` times per `next()` and returns a
/// homogeneous array.
pub struct ArrayGenerator {
    inner: Box<dyn Generator>,
    length: usize,
}

impl ArrayGenerator {
    pub fn new(inner: Box<dyn Generator>, length: usize) -> Result<Self, GeneratorError> {
        if length == 0 {
            return Err(GeneratorError::InvalidLength("array"));
        }
        Ok(Self { inner, length })
    }
}

impl Generator for ArrayGenerator {
    fn next_value(&mut self) -> Value {
        Value::Array((0..self.length).map(|_| self.inner.next_value()).collect())
    }

    fn kind(&self) -> ColumnKind {
        self.inner.kind()
    }
}
