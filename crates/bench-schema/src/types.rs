//! Column type model and textual descriptor parser.

use crate::error::SchemaError;

/// Sentinel for `STRING(MAX)` / `BYTES(MAX)` declarations.
pub const MAX_LENGTH: i64 = i64::MAX;

/// Ceiling for explicit numeric string and bytes lengths. The `MAX`
/// sentinel is not subject to it; generators collapse the sentinel to a
/// practical width themselves.
const STRING_CLIP: i64 = 1024;
const BYTES_CLIP: i64 = 1024;

/// The scalar base kinds a column can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Bool,
    String,
    Int64,
    Float64,
    Bytes,
    Timestamp,
    Date,
    Numeric,
    Json,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColumnKind::Bool => "BOOL",
            ColumnKind::String => "STRING",
            ColumnKind::Int64 => "INT64",
            ColumnKind::Float64 => "FLOAT64",
            ColumnKind::Bytes => "BYTES",
            ColumnKind::Timestamp => "TIMESTAMP",
            ColumnKind::Date => "DATE",
            ColumnKind::Numeric => "NUMERIC",
            ColumnKind::Json => "JSON",
        };
        f.write_str(name)
    }
}

/// A parsed column type: base kind, array flag, optional length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnType {
    pub base: ColumnKind,
    pub array: bool,
    pub length: Option<i64>,
}

impl ColumnType {
    pub fn scalar(base: ColumnKind) -> Self {
        Self {
            base,
            array: false,
            length: None,
        }
    }

    pub fn with_length(base: ColumnKind, length: i64) -> Self {
        Self {
            base,
            array: false,
            length: Some(length),
        }
    }
}

/// Parse a textual column type descriptor such as `STRING(MAX)`,
/// `BYTES(256)` or `ARRAY<STRING(1024)>`.
///
/// Numeric lengths above the clip limit are clipped to 1024 for strings
/// and bytes; `MAX` maps to [`MAX_LENGTH`] and stays there.
pub fn parse_column_type(descriptor: &str) -> Result<ColumnType, SchemaError> {
    let mut text = descriptor.trim();
    let mut array = false;

    if let Some(inner) = text
        .strip_prefix("ARRAY<")
        .and_then(|rest| rest.strip_suffix('>'))
    {
        array = true;
        text = inner;
    }

    let mut length = None;
    let mut base_text = text;
    if let Some((head, tail)) = text.split_once('(') {
        let inner = tail
            .strip_suffix(')')
            .ok_or_else(|| SchemaError::BadType(descriptor.to_string()))?;
        length = Some(if inner == "MAX" {
            MAX_LENGTH
        } else {
            inner
                .parse::<u32>()
                .map(i64::from)
                .map_err(|_| SchemaError::BadType(descriptor.to_string()))?
        });
        base_text = head;
    }

    let base = match base_text {
        "BOOL" => ColumnKind::Bool,
        "STRING" => ColumnKind::String,
        "INT64" => ColumnKind::Int64,
        "FLOAT64" => ColumnKind::Float64,
        "BYTES" => ColumnKind::Bytes,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "DATE" => ColumnKind::Date,
        "NUMERIC" => ColumnKind::Numeric,
        "JSON" => ColumnKind::Json,
        _ => return Err(SchemaError::BadType(descriptor.to_string())),
    };

    let clip = match base {
        ColumnKind::String => Some(STRING_CLIP),
        ColumnKind::Bytes => Some(BYTES_CLIP),
        _ => None,
    };
    if let (Some(clip), Some(len)) = (clip, length) {
        if len != MAX_LENGTH && len > clip {
            length = Some(clip);
        }
    }

    Ok(ColumnType { base, array, length })
}
