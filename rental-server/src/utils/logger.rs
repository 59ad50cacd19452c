//! Logging Infrastructure
//!
//! Structured logging setup. Console output by default; daily rolling
//! file output when a log directory is configured and exists.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger with console output
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger, optionally writing to a rolling daily file
///
/// `RUST_LOG` overrides `log_level` when set.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir
        && Path::new(dir).exists()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "rental-server");
        subscriber.with_writer(file_appender).with_ansi(false).init();
        return;
    }

    subscriber.init();
}
