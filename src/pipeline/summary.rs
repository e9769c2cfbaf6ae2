use serde::Serialize;
use crate::models::{ExecutionStatus, ExploitStatus};

/// Tallies for one completed run. Every submitted finding lands in exactly
/// one execution bucket and one exploit bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub executed: usize,
    pub skipped: usize,
    pub execution_errors: usize,
    pub exploitable: usize,
    pub secure: usize,
    pub unknown: usize,
    pub probe_errors: usize,
    pub manual_check: usize,
    pub duration_ms: u64,
}

impl RunSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn tally(&mut self, execution: ExecutionStatus, exploit: ExploitStatus) {
        match execution {
            ExecutionStatus::Executed => self.executed += 1,
            ExecutionStatus::Skipped => self.skipped += 1,
            ExecutionStatus::Error => self.execution_errors += 1,
        }
        match exploit {
            ExploitStatus::Exploitable => self.exploitable += 1,
            ExploitStatus::Secure => self.secure += 1,
            ExploitStatus::Unknown => self.unknown += 1,
            ExploitStatus::Error => self.probe_errors += 1,
            ExploitStatus::ManualCheckRequired => self.manual_check += 1,
        }
    }

    /// Findings accounted for so far across the execution buckets.
    pub fn completed(&self) -> usize {
        self.executed + self.skipped + self.execution_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_buckets() {
        let mut s = RunSummary::new(3);
        s.tally(ExecutionStatus::Executed, ExploitStatus::Exploitable);
        s.tally(ExecutionStatus::Executed, ExploitStatus::Secure);
        s.tally(ExecutionStatus::Skipped, ExploitStatus::ManualCheckRequired);

        assert_eq!(s.total, 3);
        assert_eq!(s.executed, 2);
        assert_eq!(s.skipped, 1);
        assert_eq!(s.exploitable, 1);
        assert_eq!(s.secure, 1);
        assert_eq!(s.manual_check, 1);
        assert_eq!(s.completed(), 3);
    }
}
