// Path: crates/telemetry/src/init.rs
use tracing::Subscriber;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Output encoding of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Settings for [`init_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Line encoding.
    pub format: LogFormat,
    /// Filter directives used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            default_filter: "info".to_string(),
        }
    }
}

/// Initializes the global `tracing` subscriber for structured JSON logging.
pub fn init_tracing() -> Result<(), anyhow::Error> {
    init_with(&TelemetryConfig::default())
}

/// Initializes the global `tracing` subscriber from `config`.
///
/// `RUST_LOG` takes precedence over `config.default_filter`. Fails if a
/// global subscriber or `log` logger is already installed.
pub fn init_with(config: &TelemetryConfig) -> Result<(), anyhow::Error> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.default_filter)?,
    };
    let registry = Registry::default().with(filter);
    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(UtcTime::rfc_3339());
    match config.format {
        LogFormat::Json => install(registry.with(base.json())),
        LogFormat::Pretty => install(registry.with(base.pretty())),
    }
}

fn install<S>(subscriber: S) -> Result<(), anyhow::Error>
where
    S: Subscriber + Send + Sync + 'static,
{
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Installs a test-friendly subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call has an effect.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_json_at_info() {
        let config = TelemetryConfig::default();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.default_filter, "info");
    }

    #[test]
    fn test_subscriber_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
        tracing::debug!(target: "nimiq_telemetry", "still running");
        assert!(init_tracing().is_err());
    }
}
