use regimen_core::config::{AppConfig, LoadOptions, LogFormat};
use regimen_core::{ActivityEvent, ActivitySink};

/// Initialize the global tracing subscriber from the effective config.
///
/// Best-effort: an unloadable config or an already-installed subscriber
/// leaves logging untouched, and the failing command reports the real error
/// through its envelope.
pub fn init_logging_best_effort() {
    let Ok(config) = AppConfig::load(LoadOptions::default()) else {
        return;
    };
    init_logging(&config);
}

pub fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt().with_target(false).with_max_level(log_level);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Forwards wizard activity events into the tracing pipeline.
pub struct TracingActivitySink;

impl ActivitySink for TracingActivitySink {
    fn emit(&self, event: ActivityEvent) {
        tracing::info!(
            event_name = %event.event_type,
            category = ?event.category,
            outcome = ?event.outcome,
            session_id = event.session_id.as_deref().unwrap_or("unknown"),
            correlation_id = %event.correlation_id,
            "activity event recorded"
        );
    }
}
