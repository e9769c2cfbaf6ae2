use serde::{Deserialize, Serialize};

/// Defaults used when neither the CLI nor a config file says otherwise.
pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_USER_AGENT: &str =
    concat!("veriom/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct VeriomConfig {
    pub runner: Option<RunnerConfig>,
    pub network: Option<NetworkConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RunnerConfig {
    /// Concurrent probe slots.
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct NetworkConfig {
    /// Whole-request timeout for HTTP probes, seconds.
    pub timeout_secs: Option<u64>,
    /// Connect timeout for raw TCP probes, seconds.
    pub connect_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl VeriomConfig {
    pub fn workers(&self) -> Option<usize> {
        self.runner.as_ref().and_then(|r| r.workers)
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.network.as_ref().and_then(|n| n.timeout_secs)
    }

    pub fn connect_timeout_secs(&self) -> Option<u64> {
        self.network.as_ref().and_then(|n| n.connect_timeout_secs)
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.network.as_ref().and_then(|n| n.user_agent.as_deref())
    }
}
