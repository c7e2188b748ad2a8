//! Command-line and environment configuration.
//!
//! Every option can be given as a flag or through its environment variable;
//! flags win.

use clap::{Parser, ValueEnum};
use std::time::Duration;

pub const DEFAULT_ELASTIC_URL: &str = "http://localhost:9200";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    Elastic,
    /// Keeps documents in process memory; nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Health-check job registration service")]
pub struct Settings {
    /// Elasticsearch endpoint holding health-check documents
    #[arg(long, env = "ELASTIC_URL", default_value = DEFAULT_ELASTIC_URL)]
    pub elastic_url: String,

    /// Index the documents are written to
    #[arg(long, env = "ELASTIC_INDEX", default_value = "documents")]
    pub index: String,

    /// HTTP listen port
    #[arg(long, env = "PORT", default_value_t = 8099)]
    pub port: u16,

    /// Seconds to wait between attempts to reach the store at startup
    #[arg(long, env = "STORE_RETRY_DELAY_SECS", default_value_t = 3)]
    pub retry_delay_secs: u64,

    #[arg(long, env = "STORE_BACKEND", value_enum, default_value_t = StoreBackend::Elastic)]
    pub store: StoreBackend,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Settings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
