use strand_config::{StrandGlobalConfig, STRAND_CONFIG_ENV};
use strand_libs::{anyhow::Result, tracing, tracing_subscriber};

/// Installs the fmt subscriber filtered by `LOG_LEVEL`. Calling it again is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("LOG_LEVEL"))
        .try_init();
}

/// Loads the global config from `STRAND_CONFIG` when it is set, the defaults
/// apply otherwise.
pub fn init_global_config() -> Result<()> {
    if std::env::var_os(STRAND_CONFIG_ENV).is_none() {
        tracing::info!("{} not set, using default container config", STRAND_CONFIG_ENV);
        return Ok(());
    }
    StrandGlobalConfig::set_from_env()?;
    Ok(())
}
