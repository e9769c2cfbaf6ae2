use thiserror::Error;

#[derive(Debug, Error)]
pub enum VeriomError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    InputData(String),

    #[error("Output sink error: {0}")]
    OutputSink(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
