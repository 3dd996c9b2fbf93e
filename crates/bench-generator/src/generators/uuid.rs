//! UUID v4 generation in string and binary shapes.

use uuid::Uuid;

use bench_core::Value;
use bench_schema::{ColumnKind, ColumnType};

use crate::error::GeneratorError;
use crate::Generator;

const LEN_STRING: i64 = 36;
const LEN_STRING_COMPACT: i64 = 32;
const LEN_BYTES: i64 = 16;

/// Random UUID v4 values.
///
/// Valid shapes are `STRING(36)` (canonical), `STRING(32)` (no
/// separators) and `BYTES(16)`; anything else is rejected at
/// construction, including oversized string columns.
pub struct UuidGenerator {
    kind: ColumnKind,
    length: i64,
}

impl UuidGenerator {
    pub fn new(column_type: ColumnType) -> Result<Self, GeneratorError> {
        let length = column_type.length.unwrap_or(0);
        match column_type.base {
            ColumnKind::String => {
                if length != LEN_STRING && length != LEN_STRING_COMPACT {
                    return Err(GeneratorError::InvalidUuidShape {
                        kind: ColumnKind::String,
                        length,
                    });
                }
            }
            ColumnKind::Bytes => {
                if length != LEN_BYTES {
                    return Err(GeneratorError::InvalidUuidShape {
                        kind: ColumnKind::Bytes,
                        length,
                    });
                }
            }
            other => return Err(GeneratorError::InvalidUuidType(other)),
        }

        Ok(Self {
            kind: column_type.base,
            length,
        })
    }
}

impl Generator for UuidGenerator {
    fn next_value(&mut self) -> Value {
        let id = Uuid::new_v4();
        match (self.kind, self.length) {
            (ColumnKind::Bytes, _) => Value::Bytes(id.as_bytes().to_vec()),
            (_, LEN_STRING_COMPACT) => Value::String(id.simple().to_string()),
            _ => Value::String(id.hyphenated().to_string()),
        }
    }

    fn kind(&self) -> ColumnKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_string_shape() {
        let mut gen =
            UuidGenerator::new(ColumnType::with_length(ColumnKind::String, 36)).unwrap();
        match gen.next_value() {
            Value::String(s) => {
                assert_eq!(s.len(), 36);
                assert_eq!(s.matches('-').count(), 4);
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn compact_string_shape() {
        let mut gen =
            UuidGenerator::new(ColumnType::with_length(ColumnKind::String, 32)).unwrap();
        match gen.next_value() {
            Value::String(s) => {
                assert_eq!(s.len(), 32);
                assert!(!s.contains('-'));
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn binary_shape() {
        let mut gen = UuidGenerator::new(ColumnType::with_length(ColumnKind::Bytes, 16)).unwrap();
        match gen.next_value() {
            Value::Bytes(b) => assert_eq!(b.len(), 16),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn oversized_or_mistyped_columns_are_rejected() {
        assert!(UuidGenerator::new(ColumnType::with_length(ColumnKind::String, 40)).is_err());
        assert!(UuidGenerator::new(ColumnType::with_length(ColumnKind::Bytes, 17)).is_err());
        assert!(UuidGenerator::new(ColumnType::scalar(ColumnKind::Int64)).is_err());
    }
}
