use super::finding::Finding;
use super::verdict::Verdict;

/// Output column names appended to every input row.
pub const COL_VERIFY_EXECUTION: &str = "Verify_Execution";
pub const COL_VERIFY_EXPLOIT: &str = "Verify_Exploit";
pub const COL_VERIFY_RESULT: &str = "Verify_Result";

pub const VERDICT_COLUMNS: [&str; 3] =
    [COL_VERIFY_EXECUTION, COL_VERIFY_EXPLOIT, COL_VERIFY_RESULT];

/// One finding merged with the verdict it earned. Created exactly once per
/// input row and written exactly once; the sink resolves column values by
/// name so the output keeps the input's column order.
#[derive(Debug, Clone)]
pub struct OutputRecord {
    finding: Finding,
    verdict: Verdict,
}

impl OutputRecord {
    pub fn new(finding: Finding, verdict: Verdict) -> Self {
        Self { finding, verdict }
    }

    pub fn finding(&self) -> &Finding {
        &self.finding
    }

    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Value for a named output column: the three verdict columns resolve
    /// from the verdict, everything else passes through from the finding.
    pub fn value_for(&self, column: &str) -> &str {
        match column {
            COL_VERIFY_EXECUTION => self.verdict.execution().as_str(),
            COL_VERIFY_EXPLOIT => self.verdict.exploit().as_str(),
            COL_VERIFY_RESULT => self.verdict.message(),
            other => self.finding.get(other),
        }
    }
}
