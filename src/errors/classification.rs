use super::types::VeriomError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Fatal errors abort the whole run; the rest are recovered per-probe
    /// and surface as a verdict on the affected row only.
    pub fatal: bool,
}

impl VeriomError {
    /// Classify this error to determine its type and whether it ends the run.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Fatal before or during the run
            VeriomError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                fatal: true,
            },
            VeriomError::InputData(_) => ErrorClassification {
                error_type: "InputDataError",
                fatal: true,
            },
            VeriomError::OutputSink(_) => ErrorClassification {
                error_type: "OutputSinkError",
                fatal: true,
            },
            VeriomError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                fatal: true,
            },

            // Recovered inside a single probe unit
            VeriomError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                fatal: false,
            },
            VeriomError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                fatal: false,
            },

            VeriomError::Io(_) => ErrorClassification {
                error_type: "IoError",
                fatal: true,
            },
            VeriomError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                fatal: true,
            },
            VeriomError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                fatal: true,
            },
        }
    }
}
