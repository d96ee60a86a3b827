use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with file and console logging
///
/// Two layers share the registry:
/// 1. Console (stdout): INFO and above, kept readable during development
/// 2. Daily-rolling file under ./logs: DEBUG and above for diagnosis
///
/// The returned WorkerGuard keeps the non-blocking file writer's
/// background thread alive; hold it in main() for the process lifetime so
/// buffered log lines are flushed on shutdown.
pub fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    // One file per day: webblog_backend.log.2026-08-25, .2026-08-26, ...
    let file_appender = rolling::daily("./logs", "webblog_backend.log");

    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // No ANSI escapes in files
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(EnvFilter::new("debug"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(false)
        .with_filter(EnvFilter::new("info"));

    // init() sets the global default subscriber and panics if called twice
    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!("Tracing initialized (console=INFO+, file=DEBUG+)");

    guard
}
