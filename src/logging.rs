///! Tracing setup: console output plus a daily rolling log file.

use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keeps the non-blocking writer alive; dropping it flushes the file.
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

pub fn init_logging(log_dir: impl AsRef<Path>, prefix: &str, level: &str) -> LoggerGuard {
    let level = match level {
        "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => "info",
    };

    let builder = EnvFilter::builder().with_default_directive(level.parse().unwrap());

    let console_filter = builder
        .clone()
        .parse_lossy(&std::env::var("RUST_LOG").unwrap_or_default());
    let file_filter = builder.parse_lossy(&std::env::var("RUST_LOG").unwrap_or_default());

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir.as_ref())
        .expect("Failed to create file appender");
    let (non_blocking, guard) = NonBlocking::new(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(file_filter);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .init();

    LoggerGuard(guard)
}
