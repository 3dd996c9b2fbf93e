//! Deterministic prefix plus random tail.

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::error::GeneratorError;
use crate::generators::hexavigesimal::{HexavigesimalConfig, HexavigesimalGenerator};
use crate::generators::string::StringGenerator;
use crate::Generator;

/// Configuration for a [`CombinedGenerator`].
#[derive(Debug, Clone, Default)]
pub struct CombinedConfig {
    pub minimum: u64,
    pub maximum: u64,
    pub prefix_length: usize,
    pub string_length: usize,
    pub key_range: Option<(String, String)>,
    pub seed: Option<u64>,
}

/// Concatenates a base-26 counter prefix of `prefix_length` characters
/// with a random alphabetic tail, for keys that need a predictable
/// ordering prefix and a random remainder.
pub struct CombinedGenerator {
    prefix: HexavigesimalGenerator,
    tail: StringGenerator,
}

impl CombinedGenerator {
    pub fn new(config: CombinedConfig) -> Result<Self, GeneratorError> {
        if config.prefix_length >= config.string_length {
            return Err(GeneratorError::InvalidPrefixLength {
                prefix: config.prefix_length,
                total: config.string_length,
            });
        }

        let rng = {
            use rand::SeedableRng;
            match config.seed {
                Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
                None => rand::rngs::StdRng::from_entropy(),
            }
        };

        Ok(Self {
            prefix: HexavigesimalGenerator::new(HexavigesimalConfig {
                minimum: config.minimum,
                maximum: config.maximum,
                length: config.prefix_length,
                key_range: config.key_range,
            }),
            tail: StringGenerator::with_length(config.string_length - config.prefix_length, rng)?,
        })
    }
}

impl Generator for CombinedGenerator {
    fn next_value(&mut self) -> Value {
        let prefix = match self.prefix.next_value() {
            Value::String(s) => s,
            _ => unreachable!("hexavigesimal generator yields strings"),
        };
        let tail = match self.tail.next_value() {
            Value::String(s) => s,
            _ => unreachable!("string generator yields strings"),
        };
        Value::String(format!("{prefix}{tail}"))
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next_string(gen: &mut CombinedGenerator) -> String {
        match gen.next_value() {
            Value::String(s) => s,
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn prefixes_count_up_with_random_tails() {
        let mut gen = CombinedGenerator::new(CombinedConfig {
            minimum: 0,
            maximum: 1_000_000,
            prefix_length: 8,
            string_length: 64,
            key_range: None,
            seed: None,
        })
        .unwrap();

        for expected in ["AAAAAAAA", "AAAAAAAB", "AAAAAAAC", "AAAAAAAD", "AAAAAAAE"] {
            let value = next_string(&mut gen);
            assert!(value.starts_with(expected), "{value} !~ {expected}");
            assert_eq!(value.len(), 64);
        }

        for _ in 0..1_000 {
            gen.next_value();
        }
        for expected in ["AAAAABMR", "AAAAABMS", "AAAAABMT"] {
            let value = next_string(&mut gen);
            assert!(value.starts_with(expected), "{value} !~ {expected}");
        }
    }

    #[test]
    fn shorter_prefixes_work_the_same() {
        let mut gen = CombinedGenerator::new(CombinedConfig {
            minimum: 0,
            maximum: 1_000_000,
            prefix_length: 5,
            string_length: 10,
            key_range: None,
            seed: None,
        })
        .unwrap();

        for expected in ["AAAAA", "AAAAB", "AAAAC", "AAAAD", "AAAAE"] {
            let value = next_string(&mut gen);
            assert!(value.starts_with(expected), "{value} !~ {expected}");
            assert_eq!(value.len(), 10);
        }

        for _ in 0..1_000 {
            gen.next_value();
        }
        for expected in ["AABMR", "AABMS", "AABMT"] {
            let value = next_string(&mut gen);
            assert!(value.starts_with(expected), "{value} !~ {expected}");
        }
    }

    #[test]
    fn prefix_must_leave_room_for_the_tail() {
        assert!(CombinedGenerator::new(CombinedConfig {
            prefix_length: 10,
            string_length: 10,
            ..Default::default()
        })
        .is_err());
    }
}
