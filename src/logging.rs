use std::io;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Directives for the stdout layer when `RUST_LOG` is unset
const STDOUT_DIRECTIVES: &str = "info,signature=info,reconcile=info,db_query=warn,sqlx=off";

/// Directives for the rolling file layer
const FILE_DIRECTIVES: &str = "info,signature=debug,reconcile=debug,db_query=debug,sqlx=warn";

pub fn configure_logging() {
    // Stdout log configuration, overridable through RUST_LOG
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(STDOUT_DIRECTIVES));
    let stdout_log = fmt::layer()
        .with_writer(io::stdout)
        .with_filter(stdout_filter);

    // File log configuration
    let file_appender = rolling::daily("logs", "gazette.log");
    let file_log = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::new(FILE_DIRECTIVES));

    tracing_subscriber::Registry::default()
        .with(stdout_log)
        .with(file_log)
        .init();
}
