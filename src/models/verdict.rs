use serde::{Deserialize, Serialize};

/// Whether a probe actually ran against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Executed,
    Skipped,
    Error,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Executed => "Executed",
            Self::Skipped => "Skipped",
            Self::Error => "Error",
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the probe concluded about the finding from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExploitStatus {
    /// The misconfiguration is reachable and abusable by an anonymous client.
    Exploitable,
    /// The target answered but denied the anonymous access path.
    Secure,
    /// The probe ran but the outcome is inconclusive.
    Unknown,
    /// The probe failed at the transport level.
    Error,
    /// No safe automated external check exists for this finding type.
    ManualCheckRequired,
}

impl ExploitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exploitable => "Exploitable",
            Self::Secure => "Secure",
            Self::Unknown => "Unknown",
            Self::Error => "Error",
            Self::ManualCheckRequired => "Manual Check Required",
        }
    }
}

impl std::fmt::Display for ExploitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The judgement produced for one finding.
///
/// Constructed only through the named constructors so the status pairing
/// stays legal: a skipped probe can only report `Unknown` or
/// `ManualCheckRequired`, an executed probe everything except
/// `ManualCheckRequired`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    execution: ExecutionStatus,
    exploit: ExploitStatus,
    message: String,
}

impl Verdict {
    /// Probe ran and the target is abusable anonymously.
    pub fn exploitable(message: impl Into<String>) -> Self {
        Self {
            execution: ExecutionStatus::Executed,
            exploit: ExploitStatus::Exploitable,
            message: message.into(),
        }
    }

    /// Probe ran and the anonymous path is denied.
    pub fn secure(message: impl Into<String>) -> Self {
        Self {
            execution: ExecutionStatus::Executed,
            exploit: ExploitStatus::Secure,
            message: message.into(),
        }
    }

    /// Probe ran but the result is inconclusive.
    pub fn inconclusive(message: impl Into<String>) -> Self {
        Self {
            execution: ExecutionStatus::Executed,
            exploit: ExploitStatus::Unknown,
            message: message.into(),
        }
    }

    /// Probe ran and failed at the transport level.
    pub fn probe_error(message: impl Into<String>) -> Self {
        Self {
            execution: ExecutionStatus::Executed,
            exploit: ExploitStatus::Error,
            message: message.into(),
        }
    }

    /// Probe could not derive what it needed and did not run.
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            execution: ExecutionStatus::Skipped,
            exploit: ExploitStatus::Unknown,
            message: message.into(),
        }
    }

    /// No automated external check exists for this finding type.
    pub fn manual_check(message: impl Into<String>) -> Self {
        Self {
            execution: ExecutionStatus::Skipped,
            exploit: ExploitStatus::ManualCheckRequired,
            message: message.into(),
        }
    }

    pub fn execution(&self) -> ExecutionStatus {
        self.execution
    }

    pub fn exploit(&self) -> ExploitStatus {
        self.exploit
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Only verdicts that demonstrated anonymous access are reportable hits.
    pub fn is_exploitable(&self) -> bool {
        matches!(self.exploit, ExploitStatus::Exploitable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_keep_status_pairing_legal() {
        for v in [
            Verdict::exploitable("m"),
            Verdict::secure("m"),
            Verdict::inconclusive("m"),
            Verdict::probe_error("m"),
        ] {
            assert_eq!(v.execution(), ExecutionStatus::Executed);
            assert_ne!(v.exploit(), ExploitStatus::ManualCheckRequired);
        }

        for v in [Verdict::skipped("m"), Verdict::manual_check("m")] {
            assert_eq!(v.execution(), ExecutionStatus::Skipped);
            assert!(matches!(
                v.exploit(),
                ExploitStatus::Unknown | ExploitStatus::ManualCheckRequired
            ));
        }
    }

    #[test]
    fn test_output_vocabulary() {
        assert_eq!(ExecutionStatus::Executed.as_str(), "Executed");
        assert_eq!(ExecutionStatus::Skipped.as_str(), "Skipped");
        assert_eq!(ExploitStatus::ManualCheckRequired.as_str(), "Manual Check Required");
        assert_eq!(ExploitStatus::Exploitable.as_str(), "Exploitable");
    }

    #[test]
    fn test_is_exploitable() {
        assert!(Verdict::exploitable("open").is_exploitable());
        assert!(!Verdict::secure("denied").is_exploitable());
        assert!(!Verdict::manual_check("manual").is_exploitable());
    }
}
