use std::collections::HashSet;
use async_trait::async_trait;
use crate::models::{Finding, Verdict};

pub mod azure_storage;
pub mod gcp_storage;
pub mod manual;
pub mod network;
pub mod registry;
pub mod s3;
pub mod services;

pub use registry::ProbeRegistry;

/// A pluggable verification strategy bound to a set of finding-type
/// identifiers.
///
/// `verify` never returns an error and never blocks indefinitely: ordinary
/// network failure, timeouts, and underivable targets all map to a
/// [`Verdict`], and every outbound call goes through a timeout-bounded
/// capability. Only genuine defects (panics) escape, and the pipeline
/// contains those per unit.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// The rule-name / violation-type identifiers this probe owns.
    fn ids(&self) -> &HashSet<&'static str>;

    /// Membership test used by the matcher.
    fn handles(&self, identifier: &str) -> bool {
        self.ids().contains(identifier)
    }

    /// Judge one finding from the unauthenticated attacker's vantage point.
    async fn verify(&self, finding: &Finding) -> Verdict;
}
