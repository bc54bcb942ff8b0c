use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::common::logging::LogLevel;

/// Runtime settings. Every flag falls back to an environment variable, which may
/// come from a `.env` file.
#[derive(Parser, Debug, Clone)]
#[command(name = "sensor-hub", version, about = "Sensor reading ingestion and dashboard service")]
pub struct Settings {
    /// SQLite database file holding the readings
    #[arg(long = "database", env = "CONNECTION_STRING", default_value = "sensors.db3")]
    pub database: PathBuf,
    #[arg(long = "host", env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(long = "port", env = "PORT", default_value = "5000")]
    pub port: u16,
    /// Maximum amount of pooled database connections
    #[arg(long = "pool-size", env = "POOL_SIZE", default_value = "8")]
    pub pool_size: u32,
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
    #[arg(long = "log-file", default_value = "")]
    pub log_file: String,
}

impl Settings {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let settings = Settings::try_parse_from([
            "sensor-hub",
            "--database",
            "/tmp/readings.db3",
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(settings.database, PathBuf::from("/tmp/readings.db3"));
        assert_eq!(settings.listen_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(Settings::try_parse_from(["sensor-hub", "--port", "http"]).is_err());
    }
}
