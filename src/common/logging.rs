use anyhow::Result;
use clap::ValueEnum;
use std::io;
use tracing::Level;
use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum LogLevel {
    No,
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::No => LevelFilter::OFF,
            LogLevel::Debug => LevelFilter::from_level(Level::DEBUG),
            LogLevel::Info => LevelFilter::from_level(Level::INFO),
            LogLevel::Warning => LevelFilter::from_level(Level::WARN),
            LogLevel::Error => LevelFilter::from_level(Level::ERROR),
        }
    }
}

/// Installs the global subscriber. Logs go to stdout unless `log_file` names a
/// daily rolling file, in which case the returned guard must outlive the server.
pub fn init_logger(
    log_level: LogLevel,
    log_file: &str,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = EnvFilter::from_default_env().add_directive(log_level.to_level_filter().into());

    let (writer, guard) = if log_file.is_empty() {
        (BoxMakeWriter::new(io::stdout), None)
    } else {
        let (non_blocking, guard) = tracing_appender::non_blocking(rolling::daily(".", log_file));
        (BoxMakeWriter::new(non_blocking), Some(guard))
    };

    let subscriber = fmt()
        .with_writer(writer)
        .with_ansi(guard.is_none())
        .with_env_filter(env_filter)
        .with_file(false)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}
