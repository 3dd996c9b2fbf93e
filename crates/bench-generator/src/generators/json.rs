//! Random JSON documents.

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::args::GeneratorArgs;
use crate::error::GeneratorError;
use crate::generators::string::StringGenerator;
use crate::Generator;

const DEFAULT_PAIRS: usize = 6;
const KEY_LENGTH: usize = 5;

/// Flat JSON objects whose keys and values come from a short-string
/// generator. The pair count defaults to six and follows
/// `generator.length` when configured.
pub struct JsonGenerator {
    pairs: usize,
    strings: StringGenerator,
}

impl JsonGenerator {
    pub fn new(args: &GeneratorArgs) -> Result<Self, GeneratorError> {
        let pairs = args.length.unwrap_or(DEFAULT_PAIRS);
        Ok(Self {
            pairs,
            strings: StringGenerator::with_length(KEY_LENGTH, args.rng())?,
        })
    }
}

impl Generator for JsonGenerator {
    fn next_value(&mut self) -> Value {
        let mut object = serde_json::Map::with_capacity(self.pairs);
        while object.len() < self.pairs {
            let key = match self.strings.next_value() {
                Value::String(s) => s,
                _ => unreachable!("string generator yields strings"),
            };
            let value = match self.strings.next_value() {
                Value::String(s) => s,
                _ => unreachable!("string generator yields strings"),
            };
            object.insert(key, serde_json::Value::String(value));
        }
        Value::Json(serde_json::Value::Object(object))
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_schema::ColumnType;

    fn args() -> GeneratorArgs {
        GeneratorArgs::for_type(ColumnType::scalar(ColumnKind::Json))
    }

    #[test]
    fn default_is_six_pairs() {
        let mut gen = JsonGenerator::new(&args()).unwrap();
        match gen.next_value() {
            Value::Json(serde_json::Value::Object(map)) => assert_eq!(map.len(), 6),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn pair_count_follows_configured_length() {
        let mut a = args();
        a.length = Some(3);
        let mut gen = JsonGenerator::new(&a).unwrap();
        match gen.next_value() {
            Value::Json(serde_json::Value::Object(map)) => assert_eq!(map.len(), 3),
            other => panic!("unexpected value {other:?}"),
        }
    }
}
