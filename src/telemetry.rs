// region:    --- Imports
use anyhow::Result;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

// endregion: --- Imports

// region:    --- Telemetry

pub fn init() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .without_time()
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

// endregion: --- Telemetry
