//! Connection resolution for live runs.

use std::sync::Arc;

use bench_core::{Config, Connection};

/// Resolve the driver connection for a live `load`/`run` invocation.
///
/// The engine is generic over [`Connection`]; this build ships only the
/// in-process backend used by the test-suite and the plumbing commands, so
/// live runs fail until a network driver adapter is wired in here.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn Connection>> {
    anyhow::bail!(
        "no database driver is linked into this build (target {}); \
         the engine runs against any bench_core::Connection implementation",
        config.db()
    )
}
