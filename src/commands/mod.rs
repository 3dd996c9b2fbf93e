//! Command handlers.

pub mod config;
pub mod load;
pub mod plumbing;
pub mod run;

use std::path::Path;

use bench_core::Config;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::cli::Cli;

/// Load the configuration file, apply environment overrides, then the
/// global identifier flags.
pub fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref().map(Path::new))?;

    if let Some(project) = &cli.project {
        config.project = project.clone();
    }
    if let Some(instance) = &cli.instance {
        config.instance = instance.clone();
    }
    if let Some(database) = &cli.database {
        config.database = database.clone();
    }

    Ok(config)
}

/// Cancel the token when the process receives an interrupt, so in-flight
/// driver calls observe `Canceled` and the workload aborts.
pub fn cancel_on_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, canceling");
            cancel.cancel();
        }
    });
}
