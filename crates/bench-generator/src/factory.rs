//! Maps `(column type, optional column configuration)` to generators.

use bench_core::config::{ColumnConfig, GeneratorSpec, RangeSpec};
use bench_core::Config;
use bench_schema::{Column, ColumnKind, ColumnType, Table, MAX_LENGTH};

use crate::args::{int_value, GeneratorArgs};
use crate::error::GeneratorError;
use crate::generators::{
    ArrayGenerator, BooleanGenerator, CombinedConfig, CombinedGenerator, CommitTimestampGenerator,
    DateGenerator, Float64Generator, HexavigesimalConfig, HexavigesimalGenerator, Int64Generator,
    JsonGenerator, NumericGenerator, RandomBytesGenerator, StringGenerator, SubRangeGenerator,
    TimestampGenerator, UuidGenerator,
};
use crate::{Generator, GeneratorMap};

const DEFAULT_ARRAY_LENGTH: usize = 10;

/// Width a `STRING(MAX)`/`BYTES(MAX)` declaration collapses to when a
/// generator inherits the column's length.
const MAX_DECLARED_LENGTH: usize = 1024;

/// The declared length as a generator width: numeric lengths pass
/// through, the `MAX` sentinel collapses to [`MAX_DECLARED_LENGTH`].
fn declared_length(column_type: ColumnType) -> Option<usize> {
    column_type.length.map(|length| {
        if length == MAX_LENGTH {
            MAX_DECLARED_LENGTH
        } else {
            length as usize
        }
    })
}

/// Build the write generator map for one table.
///
/// Generated columns are excluded; the database computes those itself.
pub fn generator_map_for_table(
    config: &Config,
    table: &Table,
) -> Result<GeneratorMap, GeneratorError> {
    let table_config = config.table(table.name());

    let mut map = GeneratorMap::with_capacity(table.columns().len());
    for column in table.columns() {
        if column.generated() {
            continue;
        }
        map.insert(
            column.name().to_string(),
            generator_for_column(
                table_config.and_then(|t| t.column(column.name())),
                column,
            )?,
        );
    }
    Ok(map)
}

/// Resolve the generator for one column, honoring its configuration block
/// when present. A column with `allow_commit_timestamp` always gets the
/// commit-timestamp generator, overriding everything else.
pub fn generator_for_column(
    column_config: Option<&ColumnConfig>,
    column: &Column,
) -> Result<Box<dyn Generator>, GeneratorError> {
    if column.allow_commit_timestamp() {
        return Ok(Box::new(CommitTimestampGenerator::new()));
    }

    let column_type = column.column_type();
    match column_config.and_then(|c| c.generator.as_ref()) {
        None => default_generator(GeneratorArgs::for_type(column_type)),
        Some(spec) => configured_generator(column_type, spec),
    }
}

fn configured_generator(
    column_type: ColumnType,
    spec: &GeneratorSpec,
) -> Result<Box<dyn Generator>, GeneratorError> {
    match spec.kind.as_deref() {
        Some("uuid") | Some("uuid_v4") => Ok(Box::new(UuidGenerator::new(column_type)?)),
        Some("hexavigesimal") => hexavigesimal_generator(column_type, spec),
        Some("combined") => combined_generator(column_type, spec),
        Some(other) => Err(GeneratorError::UnknownGeneratorType(other.to_string())),
        None => ranged_generator(column_type, spec),
    }
}

/// The range-driven default path: zero ranges fall through to the default
/// generator, one range constrains it, several ranges fan out into a
/// sub-range generator.
fn ranged_generator(
    column_type: ColumnType,
    spec: &GeneratorSpec,
) -> Result<Box<dyn Generator>, GeneratorError> {
    let mut base = GeneratorArgs::for_type(column_type);
    base.seed = spec.seed;
    base.length = spec.length;

    match spec.range.len() {
        0 => default_generator(base),
        1 => {
            let mut args = base.clone();
            apply_range(&mut args, &spec.range[0]);
            default_generator(args)
        }
        _ => {
            let mut generators = Vec::with_capacity(spec.range.len());
            for range in &spec.range {
                let mut args = base.clone();
                apply_range(&mut args, range);
                generators.push(default_generator(args)?);
            }
            Ok(Box::new(SubRangeGenerator::new(base.rng(), generators)?))
        }
    }
}

fn apply_range(args: &mut GeneratorArgs, range: &RangeSpec) {
    if range.begin.is_some() {
        args.begin = range.begin.clone();
    }
    if range.end.is_some() {
        args.end = range.end.clone();
    }
    if range.length.is_some() {
        args.length = range.length;
    }
    if let Some(static_value) = range.static_value {
        args.static_value = static_value;
    }
    if range.value.is_some() {
        args.value = range.value.clone();
    }
    if range.minimum.is_some() {
        args.minimum = range.minimum.clone();
    }
    if range.maximum.is_some() {
        args.maximum = range.maximum.clone();
    }
    if args.minimum.is_some() || args.maximum.is_some() {
        args.ranged = true;
    }
}

/// The default generator for a column type, with string/bytes lengths
/// inherited from the declaration and array columns wrapped with a
/// ten-element default.
fn default_generator(mut args: GeneratorArgs) -> Result<Box<dyn Generator>, GeneratorError> {
    let column_type = args.column_type;

    // Remember what the configuration asked for before inheriting the
    // column's declared length; arrays size off the configured value only.
    let configured_length = args.length;
    if args.length.is_none()
        && matches!(column_type.base, ColumnKind::String | ColumnKind::Bytes)
    {
        args.length = declared_length(column_type);
    }

    let scalar: Box<dyn Generator> = match column_type.base {
        ColumnKind::Bool => Box::new(BooleanGenerator::new(&args)?),
        ColumnKind::String => Box::new(StringGenerator::new(&args)?),
        ColumnKind::Int64 => Box::new(Int64Generator::new(&args)?),
        ColumnKind::Float64 => Box::new(Float64Generator::new(&args)?),
        ColumnKind::Bytes => Box::new(RandomBytesGenerator::new(&args)?),
        ColumnKind::Timestamp => Box::new(TimestampGenerator::new(&args)?),
        ColumnKind::Date => Box::new(DateGenerator::new(&args)?),
        ColumnKind::Numeric => Box::new(NumericGenerator::new(&args)?),
        ColumnKind::Json => Box::new(JsonGenerator::new(&args)?),
    };

    if column_type.array {
        let length = configured_length.unwrap_or(DEFAULT_ARRAY_LENGTH);
        return Ok(Box::new(ArrayGenerator::new(scalar, length)?));
    }
    Ok(scalar)
}

fn hexavigesimal_generator(
    column_type: ColumnType,
    spec: &GeneratorSpec,
) -> Result<Box<dyn Generator>, GeneratorError> {
    let length = effective_length(column_type, spec, "hexavigesimal")?;
    let (minimum, maximum) = spec_bounds(spec, length)?;

    Ok(Box::new(HexavigesimalGenerator::new(HexavigesimalConfig {
        minimum,
        maximum,
        length,
        key_range: key_range(spec),
    })))
}

fn combined_generator(
    column_type: ColumnType,
    spec: &GeneratorSpec,
) -> Result<Box<dyn Generator>, GeneratorError> {
    let string_length = effective_length(column_type, spec, "combined")?;
    let prefix_length = spec.prefix_length.ok_or(GeneratorError::InvalidPrefixLength {
        prefix: 0,
        total: string_length,
    })?;
    let (minimum, maximum) = spec_bounds(spec, prefix_length)?;

    Ok(Box::new(CombinedGenerator::new(CombinedConfig {
        minimum,
        maximum,
        prefix_length,
        string_length,
        key_range: key_range(spec),
        seed: spec.seed,
    })?))
}

fn effective_length(
    column_type: ColumnType,
    spec: &GeneratorSpec,
    what: &'static str,
) -> Result<usize, GeneratorError> {
    spec.length
        .or(declared_length(column_type))
        .filter(|l| *l > 0)
        .ok_or(GeneratorError::InvalidLength(what))
}

/// Numeric bounds for deterministic key generators: taken from the first
/// configured range when present, otherwise the full capacity of the
/// encoded width.
fn spec_bounds(spec: &GeneratorSpec, length: usize) -> Result<(u64, u64), GeneratorError> {
    let default_max = HexavigesimalGenerator::max_value(length, 26);
    let range = spec.range.first();

    let minimum = match range.and_then(|r| r.minimum.as_ref()) {
        Some(v) => int_value(v, "minimum")?.max(0) as u64,
        None => 0,
    };
    let maximum = match range.and_then(|r| r.maximum.as_ref()) {
        Some(v) => int_value(v, "maximum")?.max(0) as u64,
        None => default_max,
    };
    Ok((minimum, maximum))
}

fn key_range(spec: &GeneratorSpec) -> Option<(String, String)> {
    spec.key_range
        .as_ref()
        .map(|kr| (kr.start.clone(), kr.end.clone()))
}
