//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional file output
///
/// `log_level` accepts a bare level (`info`) or a full filter
/// (`rbac_server=debug,sqlx=warn`). `RUST_LOG` wins when set.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    let file_appender = log_dir
        .map(Path::new)
        .filter(|p| std::fs::create_dir_all(p).is_ok())
        .map(|p| tracing_appender::rolling::daily(p, "rbac-server"));

    // try_init: a second call (tests, embedding) is not an error
    let _ = match (file_appender, json) {
        (Some(appender), true) => builder.json().with_writer(appender).try_init(),
        (Some(appender), false) => builder.with_ansi(false).with_writer(appender).try_init(),
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };
}
