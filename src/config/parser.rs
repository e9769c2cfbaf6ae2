use std::path::Path;
use crate::errors::VeriomError;
use super::types::VeriomConfig;

const MAX_TIMEOUT_SECS: u64 = 120;

pub async fn parse_config(path: &Path) -> Result<VeriomConfig, VeriomError> {
    if !path.exists() {
        return Err(VeriomError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(VeriomError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: VeriomConfig = serde_yaml::from_str(&content)?;

    validate_limits(&config)?;

    Ok(config)
}

/// Semantic validation of the parsed values.
fn validate_limits(config: &VeriomConfig) -> Result<(), VeriomError> {
    if let Some(workers) = config.workers() {
        if workers == 0 {
            return Err(VeriomError::Config("runner.workers must be >= 1".into()));
        }
    }

    for (name, value) in [
        ("network.timeout_secs", config.timeout_secs()),
        ("network.connect_timeout_secs", config.connect_timeout_secs()),
    ] {
        if let Some(secs) = value {
            if secs == 0 || secs > MAX_TIMEOUT_SECS {
                return Err(VeriomError::Config(format!(
                    "{} must be between 1 and {}",
                    name, MAX_TIMEOUT_SECS
                )));
            }
        }
    }

    Ok(())
}
