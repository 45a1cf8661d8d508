use crate::app::ACCESS_LOG_TARGET;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const APP_LOG_FILE: &str = "app.log";
pub const ACCESS_LOG_FILE: &str = "access.log";

/// Sends application events to `app.log` and access events to `access.log`
/// under `log_dir`. The returned guards flush the writers on drop.
pub fn init_file_logging(log_dir: &Path) -> std::io::Result<[WorkerGuard; 2]> {
    std::fs::create_dir_all(log_dir)?;

    let (app_writer, app_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, APP_LOG_FILE));
    let (access_writer, access_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, ACCESS_LOG_FILE));

    let app_layer = fmt::layer()
        .with_writer(app_writer)
        .with_ansi(false)
        .with_filter(filter::filter_fn(|meta| meta.target() != ACCESS_LOG_TARGET));
    let access_layer = fmt::layer()
        .with_writer(access_writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(filter::filter_fn(|meta| meta.target() == ACCESS_LOG_TARGET));

    tracing_subscriber::registry()
        .with(env_filter())
        .with(app_layer)
        .with(access_layer)
        .init();

    Ok([app_guard, access_guard])
}

pub fn init_stderr_logging() {
    fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
