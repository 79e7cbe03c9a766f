//! Process configuration, read from command-line flags or the environment.

use clap::Parser;
use std::net::SocketAddr;

#[derive(Debug, Clone, Parser)]
#[command(name = "hit_counter", version, about = "Unique-visitor hit counter")]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "HIT_COUNTER_BIND", default_value = "127.0.0.1:7071")]
    pub bind: SocketAddr,

    /// Database the hit and site tables live in
    #[arg(long, env = "HIT_COUNTER_DATABASE_ID", default_value = "hit-counter")]
    pub database_id: String,

    #[arg(long, env = "HIT_COUNTER_HIT_TABLE", default_value = "hits")]
    pub hit_table: String,

    #[arg(long, env = "HIT_COUNTER_SITE_TABLE", default_value = "sites")]
    pub site_table: String,

    /// Sites to register at startup (repeatable or comma separated)
    #[arg(long = "site", env = "HIT_COUNTER_SITES", value_delimiter = ',')]
    pub sites: Vec<String>,

    /// Default tracing filter, overridden by RUST_LOG
    #[arg(long, env = "HIT_COUNTER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
