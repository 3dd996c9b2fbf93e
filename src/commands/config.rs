//! `config dump` and `config init`.

use crate::cli::{Cli, ConfigAction};
use crate::commands::load_config;

const TEMPLATE: &str = r#"# spanner-bench configuration
project: my-project
instance: my-instance
database: my-database

# Worker threads per phase.
threads: 10

# Wall-clock cap for a whole run; 0s disables it.
max_execution_time: 0s

# Batched mutations for LOAD.
batch: true
batch_size: 5

operations:
  total: 10000
  # Relative weights for the RUN phase's read/write mix.
  read: 50
  write: 50
  # TABLESAMPLE percentage used to seed point-read keys.
  sample_size: 50
  read_stale: false
  staleness: 15s

pool:
  max_opened: 1000
  min_opened: 100
  max_idle: 0
  write_sessions: 0.2
  healthcheck_workers: 10
  healthcheck_interval: 50m

# Optional per-table settings.
#tables:
#  - name: Singers
#    operations:
#      total: 5000
#    columns:
#      - name: SingerId
#        generator:
#          type: combined
#          length: 64
#          prefix_length: 8
"#;

pub fn run(cli: &Cli, action: &ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Dump { validate } => {
            let config = load_config(cli)?;
            if *validate {
                config.validate()?;
            }
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
        ConfigAction::Init => {
            print!("{TEMPLATE}");
            Ok(())
        }
    }
}
