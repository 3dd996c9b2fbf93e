//! Concrete generator implementations, one module per family.

pub mod array;
pub mod boolean;
pub mod bytes;
pub mod combined;
pub mod commit_timestamp;
pub mod date;
pub mod float64;
pub mod hexavigesimal;
pub mod int64;
pub mod json;
pub mod numeric;
pub mod static_value;
pub mod string;
pub mod subrange;
pub mod thread_partition;
pub mod timestamp;
pub mod uuid;

pub use array::ArrayGenerator;
pub use boolean::BooleanGenerator;
pub use bytes::RandomBytesGenerator;
pub use combined::{CombinedConfig, CombinedGenerator};
pub use commit_timestamp::CommitTimestampGenerator;
pub use date::DateGenerator;
pub use float64::Float64Generator;
pub use hexavigesimal::{HexavigesimalConfig, HexavigesimalGenerator};
pub use int64::Int64Generator;
pub use json::JsonGenerator;
pub use numeric::NumericGenerator;
pub use static_value::StaticGenerator;
pub use string::StringGenerator;
pub use subrange::SubRangeGenerator;
pub use thread_partition::{ThreadDataConfig, ThreadDataGenerator};
pub use timestamp::TimestampGenerator;
pub use uuid::UuidGenerator;
