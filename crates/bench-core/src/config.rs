//! YAML configuration model.
//!
//! Values are merged from three layers: crate defaults, the configuration
//! file, and `SPANNER_BENCH_*` environment variables (dots in key paths
//! become underscores, so `operations.total` is `SPANNER_BENCH_OPERATIONS_TOTAL`).
//! Command-line flags are applied on top by the CLI layer.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duration::{parse_duration, serde_duration};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "SPANNER_BENCH_";

/// Operation multiplier applied to interleaved child tables that carry no
/// explicit per-table operation count.
pub const DEFAULT_TABLE_OPERATIONS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing configuration file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("environment override {key}: {message}")]
    Env { key: String, message: String },

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// A scalar configuration value for generator ranges.
///
/// Replaces duck typing with a closed set of shapes; dates, timestamps and
/// byte strings arrive as `Text` and are coerced by the generator factory,
/// which rejects incompatible shapes up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub project: String,
    pub instance: String,
    pub database: String,
    pub threads: usize,
    pub num_conns: usize,
    /// Wall-clock cap for a whole run; zero means no cap.
    #[serde(with = "serde_duration")]
    pub max_execution_time: Duration,
    pub batch: bool,
    pub batch_size: usize,
    pub operations: OperationsConfig,
    pub pool: PoolConfig,
    pub tables: Vec<TableConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: String::new(),
            instance: String::new(),
            database: String::new(),
            threads: 10,
            num_conns: num_cpus::get(),
            max_execution_time: Duration::ZERO,
            batch: true,
            batch_size: 5,
            operations: OperationsConfig::default(),
            pool: PoolConfig::default(),
            tables: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperationsConfig {
    pub total: u64,
    /// Read weight; the operation selector normalizes read vs write.
    pub read: u64,
    /// Write weight.
    pub write: u64,
    /// TABLESAMPLE percentage used to seed point-read keys.
    pub sample_size: f64,
    pub read_stale: bool,
    #[serde(with = "serde_duration")]
    pub staleness: Duration,
    pub partial_keys: bool,
}

impl Default for OperationsConfig {
    fn default() -> Self {
        Self {
            total: 10_000,
            read: 50,
            write: 50,
            sample_size: 50.0,
            read_stale: false,
            staleness: Duration::from_secs(15),
            partial_keys: false,
        }
    }
}

/// Session-pool settings, passed through to whatever driver adapter is
/// wired in. The engine itself treats these as opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    pub max_opened: u64,
    pub min_opened: u64,
    pub max_idle: u64,
    pub write_sessions: f64,
    pub healthcheck_workers: usize,
    #[serde(with = "serde_duration")]
    pub healthcheck_interval: Duration,
    pub track_session_handles: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_opened: 1000,
            min_opened: 100,
            max_idle: 0,
            write_sessions: 0.2,
            healthcheck_workers: 10,
            healthcheck_interval: Duration::from_secs(50 * 60),
            track_session_handles: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    pub name: String,
    pub operations: Option<TableOperationsConfig>,
    pub columns: Vec<ColumnConfig>,
}

impl TableConfig {
    pub fn column(&self, name: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableOperationsConfig {
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnConfig {
    pub name: String,
    pub generator: Option<GeneratorSpec>,
}

/// Per-column generator settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSpec {
    /// Explicit generator selection ("uuid", "hexavigesimal", "combined");
    /// absent means the default generator for the column type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub seed: Option<u64>,
    pub length: Option<usize>,
    pub prefix_length: Option<usize>,
    pub threads: Option<usize>,
    pub range: Vec<RangeSpec>,
    pub key_range: Option<KeyRangeSpec>,
}

/// One declarative value range for a column generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RangeSpec {
    pub begin: Option<ConfigValue>,
    pub end: Option<ConfigValue>,
    pub length: Option<usize>,
    #[serde(rename = "static")]
    pub static_value: Option<bool>,
    pub value: Option<ConfigValue>,
    pub minimum: Option<ConfigValue>,
    pub maximum: Option<ConfigValue>,
}

/// Textual base-26 bounds for deterministic key generators.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyRangeSpec {
    pub start: String,
    pub end: String,
}

impl Config {
    /// Load the configuration from an optional file path, then apply
    /// environment overrides. A missing default file is not an error; the
    /// defaults stand.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p)?;
                serde_yaml::from_str(&text)?
            }
            None => {
                let default = Path::new("spanner-bench.yaml");
                if default.exists() {
                    let text = std::fs::read_to_string(default)?;
                    serde_yaml::from_str(&text)?
                } else {
                    Config::default()
                }
            }
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// The fully-qualified database path.
    pub fn db(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project, self.instance, self.database
        )
    }

    pub fn table(&self, name: &str) -> Option<&TableConfig> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Validate everything that must hold before a connection is attempted,
    /// reporting every problem rather than the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.project.is_empty() {
            problems.push("project can not be empty".to_string());
        }
        if self.instance.is_empty() {
            problems.push("instance can not be empty".to_string());
        }
        if self.database.is_empty() {
            problems.push("database can not be empty".to_string());
        }
        if self.threads == 0 {
            problems.push("threads must be > 0".to_string());
        }
        if self.batch && self.batch_size == 0 {
            problems.push("batch_size must be > 0 when batching".to_string());
        }
        if !(0.0..=1.0).contains(&self.pool.write_sessions) {
            problems.push("pool.write_sessions must be within [0, 1]".to_string());
        }
        if !(0.0..=100.0).contains(&self.operations.sample_size) {
            problems.push("operations.sample_size must be a percentage".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Overlay `SPANNER_BENCH_*` environment variables onto this config.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        fn lookup(key: &str) -> Option<(String, String)> {
            let full = format!("{ENV_PREFIX}{key}");
            std::env::var(&full).ok().map(|v| (full, v))
        }

        fn parse<T: std::str::FromStr>(key: String, raw: String) -> Result<T, ConfigError>
        where
            T::Err: std::fmt::Display,
        {
            raw.parse().map_err(|e: T::Err| ConfigError::Env {
                key,
                message: e.to_string(),
            })
        }

        fn duration(key: String, raw: String) -> Result<Duration, ConfigError> {
            parse_duration(&raw).map_err(|message| ConfigError::Env { key, message })
        }

        if let Some((_, v)) = lookup("PROJECT") {
            self.project = v;
        }
        if let Some((_, v)) = lookup("INSTANCE") {
            self.instance = v;
        }
        if let Some((_, v)) = lookup("DATABASE") {
            self.database = v;
        }
        if let Some((k, v)) = lookup("THREADS") {
            self.threads = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("NUM_CONNS") {
            self.num_conns = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("MAX_EXECUTION_TIME") {
            self.max_execution_time = duration(k, v)?;
        }
        if let Some((k, v)) = lookup("BATCH") {
            self.batch = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("BATCH_SIZE") {
            self.batch_size = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("OPERATIONS_TOTAL") {
            self.operations.total = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("OPERATIONS_READ") {
            self.operations.read = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("OPERATIONS_WRITE") {
            self.operations.write = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("OPERATIONS_SAMPLE_SIZE") {
            self.operations.sample_size = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("OPERATIONS_READ_STALE") {
            self.operations.read_stale = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("OPERATIONS_STALENESS") {
            self.operations.staleness = duration(k, v)?;
        }
        if let Some((k, v)) = lookup("OPERATIONS_PARTIAL_KEYS") {
            self.operations.partial_keys = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("POOL_MAX_OPENED") {
            self.pool.max_opened = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("POOL_MIN_OPENED") {
            self.pool.min_opened = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("POOL_MAX_IDLE") {
            self.pool.max_idle = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("POOL_WRITE_SESSIONS") {
            self.pool.write_sessions = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("POOL_HEALTHCHECK_WORKERS") {
            self.pool.healthcheck_workers = parse(k, v)?;
        }
        if let Some((k, v)) = lookup("POOL_HEALTHCHECK_INTERVAL") {
            self.pool.healthcheck_interval = duration(k, v)?;
        }
        if let Some((k, v)) = lookup("POOL_TRACK_SESSION_HANDLES") {
            self.pool.track_session_handles = parse(k, v)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.threads, 10);
        assert!(cfg.batch);
        assert_eq!(cfg.batch_size, 5);
        assert_eq!(cfg.max_execution_time, Duration::ZERO);
        assert_eq!(cfg.operations.total, 10_000);
        assert_eq!(cfg.operations.read, 50);
        assert_eq!(cfg.operations.write, 50);
        assert_eq!(cfg.operations.sample_size, 50.0);
        assert!(!cfg.operations.read_stale);
        assert_eq!(cfg.operations.staleness, Duration::from_secs(15));
        assert_eq!(cfg.pool.max_opened, 1000);
        assert_eq!(cfg.pool.min_opened, 100);
        assert_eq!(cfg.pool.write_sessions, 0.2);
        assert_eq!(cfg.pool.healthcheck_interval, Duration::from_secs(3000));
    }

    #[test]
    fn parses_full_yaml() {
        let yaml = r#"
project: demo-project
instance: demo-instance
database: demo-db
threads: 4
max_execution_time: 30s
operations:
  total: 500
  read: 80
  write: 20
  read_stale: true
  staleness: 10s
tables:
  - name: Singers
    operations:
      total: 250
    columns:
      - name: SingerId
        generator:
          type: combined
          length: 64
          prefix_length: 8
          key_range:
            start: AAAAAAAA
            end: AAAZZZZZ
      - name: Active
        generator:
          range:
            - static: true
              value: true
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.project, "demo-project");
        assert_eq!(cfg.threads, 4);
        assert_eq!(cfg.max_execution_time, Duration::from_secs(30));
        assert_eq!(cfg.operations.total, 500);
        assert!(cfg.operations.read_stale);

        let table = cfg.table("Singers").unwrap();
        assert_eq!(table.operations.as_ref().unwrap().total, 250);

        let id = table.column("SingerId").unwrap();
        let spec = id.generator.as_ref().unwrap();
        assert_eq!(spec.kind.as_deref(), Some("combined"));
        assert_eq!(spec.key_range.as_ref().unwrap().start, "AAAAAAAA");

        let active = table.column("Active").unwrap();
        let range = &active.generator.as_ref().unwrap().range[0];
        assert_eq!(range.static_value, Some(true));
        assert_eq!(range.value, Some(ConfigValue::Bool(true)));
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut cfg = Config::default();
        cfg.threads = 0;
        cfg.pool.write_sessions = 2.0;
        let err = cfg.validate().unwrap_err();
        match err {
            ConfigError::Invalid(problems) => {
                assert!(problems.iter().any(|p| p.contains("project")));
                assert!(problems.iter().any(|p| p.contains("instance")));
                assert!(problems.iter().any(|p| p.contains("database")));
                assert!(problems.iter().any(|p| p.contains("threads")));
                assert!(problems.iter().any(|p| p.contains("write_sessions")));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn env_overrides_take_effect() {
        let mut cfg = Config::default();
        std::env::set_var("SPANNER_BENCH_OPERATIONS_TOTAL", "777");
        std::env::set_var("SPANNER_BENCH_OPERATIONS_STALENESS", "45s");
        let result = cfg.apply_env_overrides();
        std::env::remove_var("SPANNER_BENCH_OPERATIONS_TOTAL");
        std::env::remove_var("SPANNER_BENCH_OPERATIONS_STALENESS");
        result.unwrap();
        assert_eq!(cfg.operations.total, 777);
        assert_eq!(cfg.operations.staleness, Duration::from_secs(45));
    }

    #[test]
    fn config_value_shapes() {
        let v: ConfigValue = serde_yaml::from_str("42").unwrap();
        assert_eq!(v, ConfigValue::Int(42));
        let v: ConfigValue = serde_yaml::from_str("4.5").unwrap();
        assert_eq!(v, ConfigValue::Float(4.5));
        let v: ConfigValue = serde_yaml::from_str("true").unwrap();
        assert_eq!(v, ConfigValue::Bool(true));
        let v: ConfigValue = serde_yaml::from_str("\"2021-01-01\"").unwrap();
        assert_eq!(v, ConfigValue::Text("2021-01-01".into()));
    }
}
