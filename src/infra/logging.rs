//! Tracing subscriber setup shared by the binaries.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

/// Console logging filtered by `RUST_LOG` (default: `info`).
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
