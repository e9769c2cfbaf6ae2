use std::collections::HashMap;
use std::path::{Path, PathBuf};
use crate::models::Finding;
use tracing::{info, warn};

/// The input table: header columns in file order plus one finding per row.
#[derive(Debug, Default)]
pub struct LoadedFindings {
    pub columns: Vec<String>,
    pub findings: Vec<Finding>,
}

impl LoadedFindings {
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }
}

/// CSV loader for finding exports. Read failures degrade to an empty set
/// (logged); the caller decides that an empty set is fatal. Tolerates a
/// leading UTF-8 byte-order marker, which several consoles prepend to
/// their exports.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub async fn load(&self) -> LoadedFindings {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Error reading input file");
                return LoadedFindings::default();
            }
        };

        let text = String::from_utf8_lossy(&raw);
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = match reader.headers() {
            Ok(headers) => headers.iter().map(str::to_string).collect(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Error reading CSV header");
                return LoadedFindings::default();
            }
        };

        let mut findings = Vec::new();
        for row in reader.records() {
            match row {
                Ok(record) => {
                    let fields: HashMap<String, String> = columns
                        .iter()
                        .zip(record.iter())
                        .map(|(col, value)| (col.clone(), value.to_string()))
                        .collect();
                    findings.push(Finding::new(fields));
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Skipping malformed CSV row");
                }
            }
        }

        info!(path = %self.path.display(), rows = findings.len(), "Loaded findings");
        LoadedFindings { columns, findings }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use super::*;

    async fn load_bytes(bytes: &[u8]) -> LoadedFindings {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        CsvLoader::new(file.path()).load().await
    }

    #[tokio::test]
    async fn test_load_basic() {
        let loaded = load_bytes(b"Rule Name,Resource ID\nrule-a,res-1\nrule-b,res-2\n").await;
        assert_eq!(loaded.columns, vec!["Rule Name", "Resource ID"]);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.findings[0].rule_name(), "rule-a");
        assert_eq!(loaded.findings[1].resource_id(), "res-2");
    }

    #[tokio::test]
    async fn test_load_strips_bom() {
        let loaded = load_bytes(b"\xef\xbb\xbfRule Name,Resource ID\nrule-a,res-1\n").await;
        assert_eq!(loaded.columns[0], "Rule Name");
        assert_eq!(loaded.findings[0].rule_name(), "rule-a");
    }

    #[tokio::test]
    async fn test_load_short_row_leaves_missing_columns_empty() {
        let loaded = load_bytes(b"Rule Name,Resource ID,Region\nrule-a,res-1\n").await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.findings[0].region(), "");
    }

    #[tokio::test]
    async fn test_load_missing_file_degrades_to_empty() {
        let loaded = CsvLoader::new("/nonexistent/input.csv").load().await;
        assert!(loaded.is_empty());
        assert!(loaded.columns.is_empty());
    }

    #[tokio::test]
    async fn test_load_header_only_is_empty() {
        let loaded = load_bytes(b"Rule Name,Resource ID\n").await;
        assert!(loaded.is_empty());
        assert_eq!(loaded.columns.len(), 2);
    }
}
