//! Deterministic base-26 key sequences.

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::Generator;

const BASE: u64 = 26;

/// Configuration for a [`HexavigesimalGenerator`].
///
/// When `key_range` is set, its decoded textual bounds override
/// `minimum`/`maximum`.
#[derive(Debug, Clone, Default)]
pub struct HexavigesimalConfig {
    pub minimum: u64,
    pub maximum: u64,
    pub length: usize,
    pub key_range: Option<(String, String)>,
}

/// Counter-based generator emitting the base-26 (`A..Z`) encoding of an
/// incrementing value, zero-padded to a fixed width. Past `maximum` the
/// counter wraps back to `minimum`, so the sequence is cyclic and fully
/// deterministic.
pub struct HexavigesimalGenerator {
    min: u64,
    max: u64,
    current: u64,
    length: usize,
}

impl HexavigesimalGenerator {
    pub fn new(config: HexavigesimalConfig) -> Self {
        let (min, max) = match &config.key_range {
            Some((start, end)) => (Self::decode(start), Self::decode(end)),
            None => (config.minimum, config.maximum),
        };
        Self {
            min,
            max,
            current: min,
            length: config.length,
        }
    }

    /// Encode `value` as base-26 text of exactly `length` characters.
    pub fn encode(value: u64, length: usize) -> String {
        let mut chars = vec![b'A'; length];
        let mut current = value;
        for slot in chars.iter_mut().rev() {
            *slot = b'A' + (current % BASE) as u8;
            current /= BASE;
            if current == 0 {
                break;
            }
        }
        // The buffer is pure ASCII.
        String::from_utf8(chars).unwrap_or_default()
    }

    /// Decode base-26 text (`A = 0`); lowercase is accepted.
    pub fn decode(text: &str) -> u64 {
        let mut result: u64 = 0;
        let mut power: u64 = 1;
        for byte in text.bytes().rev() {
            let digit = match byte {
                b'A'..=b'Z' => (byte - b'A') as u64,
                b'a'..=b'z' => (byte - b'a') as u64,
                _ => 0,
            };
            result += digit * power;
            power = power.saturating_mul(BASE);
        }
        result
    }

    /// The sequence capacity for strings of `string_length` characters
    /// over an alphabet of `base_length` symbols.
    pub fn max_value(string_length: usize, base_length: u64) -> u64 {
        let mut total = base_length;
        for exponent in 1..string_length {
            total += base_length.pow(exponent as u32);
        }
        total
    }
}

impl Generator for HexavigesimalGenerator {
    fn next_value(&mut self) -> Value {
        // Wrap back to the start of the range once past the end.
        if self.current > self.max {
            self.current = self.min;
        }
        let encoded = Self::encode(self.current, self.length);
        self.current += 1;
        Value::String(encoded)
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next_string(gen: &mut HexavigesimalGenerator) -> String {
        match gen.next_value() {
            Value::String(s) => s,
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn encode_known_values() {
        assert_eq!(HexavigesimalGenerator::encode(0, 8), "AAAAAAAA");
        assert_eq!(HexavigesimalGenerator::encode(10, 8), "AAAAAAAK");
        assert_eq!(HexavigesimalGenerator::encode(25, 8), "AAAAAAAZ");
        assert_eq!(HexavigesimalGenerator::encode(26, 8), "AAAAAABA");
        assert_eq!(HexavigesimalGenerator::encode(40, 8), "AAAAAABO");
        assert_eq!(HexavigesimalGenerator::encode(55, 8), "AAAAAACD");
        assert_eq!(HexavigesimalGenerator::encode(1_000_000_000, 8), "ADGEHTYM");
        assert_eq!(
            HexavigesimalGenerator::encode(208_827_064_575, 8),
            "ZZZZZZZZ"
        );
    }

    #[test]
    fn decode_known_values() {
        assert_eq!(HexavigesimalGenerator::decode("AAAAAAAA"), 0);
        assert_eq!(HexavigesimalGenerator::decode("AAAAAAAK"), 10);
        assert_eq!(HexavigesimalGenerator::decode("AAAAAAAZ"), 25);
        assert_eq!(HexavigesimalGenerator::decode("AAAAAABA"), 26);
        assert_eq!(HexavigesimalGenerator::decode("AAAAAABO"), 40);
        assert_eq!(HexavigesimalGenerator::decode("AAAAAACD"), 55);
        assert_eq!(HexavigesimalGenerator::decode("ADGEHTYM"), 1_000_000_000);
        assert_eq!(HexavigesimalGenerator::decode("ZZZZZZZZ"), 208_827_064_575);
    }

    #[test]
    fn round_trip() {
        for n in (0..500_000u64).step_by(1_303) {
            let encoded = HexavigesimalGenerator::encode(n, 8);
            assert_eq!(HexavigesimalGenerator::decode(&encoded), n);
        }
    }

    #[test]
    fn max_value_formula() {
        assert_eq!(HexavigesimalGenerator::max_value(2, 2), 4);
        assert_eq!(HexavigesimalGenerator::max_value(3, 2), 8);
        assert_eq!(HexavigesimalGenerator::max_value(4, 2), 16);
        assert_eq!(HexavigesimalGenerator::max_value(2, 26), 52);
        assert_eq!(HexavigesimalGenerator::max_value(8, 26), 8_353_082_608);
    }

    #[test]
    fn sequence_counts_up() {
        let mut gen = HexavigesimalGenerator::new(HexavigesimalConfig {
            minimum: 0,
            maximum: 10_000_000,
            length: 8,
            key_range: None,
        });

        assert_eq!(next_string(&mut gen), "AAAAAAAA");
        assert_eq!(next_string(&mut gen), "AAAAAAAB");
        // AAAABBBB decodes to 18279; consume the counters in between.
        for _ in 0..18_277 {
            gen.next_value();
        }
        assert_eq!(next_string(&mut gen), "AAAABBBB");
    }

    #[test]
    fn wraps_past_the_maximum() {
        let mut gen = HexavigesimalGenerator::new(HexavigesimalConfig {
            minimum: 0,
            maximum: 3,
            length: 8,
            key_range: None,
        });
        // Values 0..=3, then back to the minimum.
        let seq: Vec<String> = (0..5).map(|_| next_string(&mut gen)).collect();
        assert_eq!(seq[0], "AAAAAAAA");
        assert_eq!(seq[3], "AAAAAAAD");
        assert_eq!(seq[4], "AAAAAAAA");
    }

    #[test]
    fn key_range_overrides_numeric_bounds() {
        let mut gen = HexavigesimalGenerator::new(HexavigesimalConfig {
            minimum: 0,
            maximum: 100,
            length: 8,
            key_range: Some(("AAAAAABA".to_string(), "AAAAAABZ".to_string())),
        });
        assert_eq!(next_string(&mut gen), "AAAAAABA");
        assert_eq!(next_string(&mut gen), "AAAAAABB");
    }
}
