use std::fs::File;
use std::path::Path;
use async_trait::async_trait;
use tokio::sync::Mutex;
use crate::errors::VeriomError;
use crate::models::record::{OutputRecord, VERDICT_COLUMNS};
use tracing::info;

/// Destination for completed output records. Implementations must
/// serialize concurrent writers so records never interleave; any write
/// failure is fatal to the run.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn write(&self, record: &OutputRecord) -> Result<(), VeriomError>;
}

/// CSV sink: header written exactly once at creation, then one
/// serialize+flush per record under the lock, so a killed process leaves a
/// parseable file with every completed row intact.
#[derive(Debug)]
pub struct CsvSink {
    columns: Vec<String>,
    writer: Mutex<csv::Writer<File>>,
}

impl CsvSink {
    /// Opens the output file and writes the header: the input columns plus
    /// the three verdict columns (appended only when the input did not
    /// already carry them).
    pub fn create(path: &Path, input_columns: &[String]) -> Result<Self, VeriomError> {
        let mut columns: Vec<String> = input_columns.to_vec();
        for col in VERDICT_COLUMNS {
            if !columns.iter().any(|c| c == col) {
                columns.push(col.to_string());
            }
        }

        let file = File::create(path).map_err(|e| {
            VeriomError::OutputSink(format!(
                "Cannot open output file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(&columns)
            .and_then(|_| writer.flush().map_err(csv::Error::from))
            .map_err(|e| VeriomError::OutputSink(format!("Failed to write header: {}", e)))?;

        info!(path = %path.display(), columns = columns.len(), "Output sink ready");
        Ok(Self {
            columns,
            writer: Mutex::new(writer),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

#[async_trait]
impl ResultSink for CsvSink {
    async fn write(&self, record: &OutputRecord) -> Result<(), VeriomError> {
        let row: Vec<&str> = self.columns.iter().map(|c| record.value_for(c)).collect();

        // Lock held for exactly one record's serialize+flush
        let mut writer = self.writer.lock().await;
        writer
            .write_record(&row)
            .and_then(|_| writer.flush().map_err(csv::Error::from))
            .map_err(|e| VeriomError::OutputSink(format!("Failed to write record: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Finding, Verdict};
    use crate::models::finding::COL_RULE_NAME;

    #[tokio::test]
    async fn test_header_then_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let columns = vec![COL_RULE_NAME.to_string(), "Region".to_string()];
        let sink = CsvSink::create(&path, &columns).unwrap();

        let finding = Finding::from_pairs([(COL_RULE_NAME, "rule-a"), ("Region", "us-east-1")]);
        sink.write(&OutputRecord::new(finding, Verdict::secure("denied")))
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Rule Name,Region,Verify_Execution,Verify_Exploit,Verify_Result"
        );
        assert_eq!(lines.next().unwrap(), "rule-a,us-east-1,Executed,Secure,denied");
        assert_eq!(lines.next(), None);
    }

    #[tokio::test]
    async fn test_verdict_columns_not_duplicated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let columns = vec![COL_RULE_NAME.to_string(), "Verify_Execution".to_string()];
        let sink = CsvSink::create(&path, &columns).unwrap();
        assert_eq!(sink.columns().len(), 4);
    }

    #[test]
    fn test_unwritable_path_is_fatal() {
        let err = CsvSink::create(Path::new("/nonexistent-dir/out.csv"), &[]).unwrap_err();
        assert!(err.classify().fatal);
    }
}
