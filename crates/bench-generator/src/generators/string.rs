//! Random alphabetic strings of a fixed length.

use rand::rngs::StdRng;
use rand::RngCore;

use bench_core::Value;
use bench_schema::ColumnKind;

use crate::args::GeneratorArgs;
use crate::error::GeneratorError;
use crate::Generator;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LETTER_BITS: u32 = 6;
const LETTER_MASK: u64 = (1 << LETTER_BITS) - 1;
// Letter indices one 63-bit draw can yield.
const LETTERS_PER_DRAW: u32 = 63 / LETTER_BITS;

/// Fixed-length random strings over the 52 ASCII letters.
///
/// Each 63-bit draw is sliced into 6-bit slots; slots past the alphabet
/// are discarded, so the distribution stays uniform.
pub struct StringGenerator {
    rng: StdRng,
    length: usize,
}

impl StringGenerator {
    pub fn new(args: &GeneratorArgs) -> Result<Self, GeneratorError> {
        let length = args.length.unwrap_or(0);
        if length == 0 {
            return Err(GeneratorError::InvalidLength("string"));
        }
        Ok(Self {
            rng: args.rng(),
            length,
        })
    }

    /// Constructor for internal reuse by composite generators.
    pub(crate) fn with_length(length: usize, rng: StdRng) -> Result<Self, GeneratorError> {
        if length == 0 {
            return Err(GeneratorError::InvalidLength("string"));
        }
        Ok(Self { rng, length })
    }

    fn next_string(&mut self) -> String {
        let mut out = Vec::with_capacity(self.length);
        let mut cache = self.rng.next_u64() >> 1;
        let mut remaining = LETTERS_PER_DRAW;

        while out.len() < self.length {
            if remaining == 0 {
                cache = self.rng.next_u64() >> 1;
                remaining = LETTERS_PER_DRAW;
            }
            let idx = (cache & LETTER_MASK) as usize;
            if idx < ALPHABET.len() {
                out.push(ALPHABET[idx]);
            }
            cache >>= LETTER_BITS;
            remaining -= 1;
        }

        // ALPHABET is ASCII, so this cannot fail.
        String::from_utf8(out).unwrap_or_default()
    }
}

impl Generator for StringGenerator {
    fn next_value(&mut self) -> Value {
        Value::String(self.next_string())
    }

    fn kind(&self) -> ColumnKind {
        ColumnKind::String
    }
}
