//! Fixed-length uniform random bytes.

use rand::rngs::StdRng;
use rand::RngCore;

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::args::GeneratorArgs;
use crate::error::GeneratorError;
use crate::Generator;

pub struct RandomBytesGenerator {
    rng: StdRng,
    length: usize,
}

impl RandomBytesGenerator {
    pub fn new(args: &GeneratorArgs) -> Result<Self, GeneratorError> {
        let length = args.length.unwrap_or(0);
        if length == 0 {
            return Err(GeneratorError::InvalidLength("bytes"));
        }
        Ok(Self {
            rng: args.rng(),
            length,
        })
    }
}

impl Generator for RandomBytesGenerator {
    fn next_value(&mut self) -> Value {
        let mut buf = vec![0u8; self.length];
        self.rng.fill_bytes(&mut buf);
        Value::Bytes(buf)
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_schema::ColumnType;

    #[test]
    fn fixed_length_bytes() {
        let mut args = GeneratorArgs::for_type(ColumnType::with_length(ColumnKind::Bytes, 16));
        args.length = Some(16);
        let mut gen = RandomBytesGenerator::new(&args).unwrap();
        match gen.next_value() {
            Value::Bytes(b) => assert_eq!(b.len(), 16),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn zero_length_is_rejected() {
        let args = GeneratorArgs::for_type(ColumnType::scalar(ColumnKind::Bytes));
        assert!(RandomBytesGenerator::new(&args).is_err());
    }
}
