pub mod parser;
pub mod types;

pub use parser::parse_config;
pub use types::{
    NetworkConfig, RunnerConfig, VeriomConfig, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_USER_AGENT, DEFAULT_WORKERS,
};
