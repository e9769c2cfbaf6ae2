use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Column names the engine interprets; everything else is passed through.
pub const COL_RULE_NAME: &str = "Rule Name";
pub const COL_VIOLATION_TYPE: &str = "Violation Type";
pub const COL_RESOURCE_ID: &str = "Resource ID";
pub const COL_REGION: &str = "Region";
pub const COL_FINDINGS: &str = "Findings";

/// One reported indicator of misconfiguration: a single input row.
///
/// Every column survives as-is for pass-through to the output; the typed
/// accessors cover the columns the matcher and probes read. Immutable once
/// loaded — probes only ever see `&Finding`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Finding {
    fields: HashMap<String, String>,
}

impl Finding {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Convenience for tests and synthetic rows.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Column value, or empty string for a column this row does not carry.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn rule_name(&self) -> &str {
        self.get(COL_RULE_NAME)
    }

    pub fn violation_type(&self) -> &str {
        self.get(COL_VIOLATION_TYPE)
    }

    pub fn resource_id(&self) -> &str {
        self.get(COL_RESOURCE_ID)
    }

    pub fn region(&self) -> &str {
        self.get(COL_REGION)
    }

    /// Free-form findings text; some probes mine it for IPs or URLs.
    pub fn findings_text(&self) -> &str {
        self.get(COL_FINDINGS)
    }
}
