use std::sync::Arc;
use dashmap::DashMap;
use crate::models::Finding;
use crate::net::{HttpClient, TcpDialer};
use super::azure_storage::AzureStorageProbe;
use super::gcp_storage::GcpStorageProbe;
use super::manual::ManualProbe;
use super::network::NetworkProbe;
use super::s3::S3Probe;
use super::services::ServicesProbe;
use super::Probe;

/// Ordered collection of probes, built once at startup and immutable
/// afterwards. Registration order is significant: when two probes claim the
/// same identifier, the first registered wins.
pub struct ProbeRegistry {
    probes: Vec<Arc<dyn Probe>>,
    // identifier → first matching probe index; real exports repeat rule
    // names heavily, so lookups are memoized
    memo: DashMap<String, Option<usize>>,
}

impl ProbeRegistry {
    pub fn new(probes: Vec<Arc<dyn Probe>>) -> Self {
        Self {
            probes,
            memo: DashMap::new(),
        }
    }

    /// The built-in probe set, in its canonical registration order.
    pub fn builtin(http: Arc<dyn HttpClient>, tcp: Arc<dyn TcpDialer>) -> Self {
        Self::new(vec![
            Arc::new(S3Probe::new(http.clone())),
            Arc::new(AzureStorageProbe::new(http.clone())),
            Arc::new(GcpStorageProbe::new(http.clone())),
            Arc::new(NetworkProbe::new(tcp)),
            Arc::new(ServicesProbe::new(http)),
            Arc::new(ManualProbe::new()),
        ])
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// First registered probe claiming the finding's rule name or violation
    /// type; `None` when no probe owns either identifier.
    pub fn match_probe(&self, finding: &Finding) -> Option<Arc<dyn Probe>> {
        let by_rule = self.first_owner(finding.rule_name());
        let by_violation = self.first_owner(finding.violation_type());

        let index = match (by_rule, by_violation) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }?;

        Some(self.probes[index].clone())
    }

    fn first_owner(&self, identifier: &str) -> Option<usize> {
        if identifier.is_empty() {
            return None;
        }
        if let Some(hit) = self.memo.get(identifier) {
            return *hit;
        }
        let found = self.probes.iter().position(|p| p.handles(identifier));
        self.memo.insert(identifier.to_string(), found);
        found
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use async_trait::async_trait;
    use crate::models::{Finding, Verdict};
    use crate::models::finding::{COL_RULE_NAME, COL_VIOLATION_TYPE};
    use super::*;

    struct StaticProbe {
        name: &'static str,
        ids: HashSet<&'static str>,
    }

    impl StaticProbe {
        fn new(name: &'static str, ids: &[&'static str]) -> Arc<dyn Probe> {
            Arc::new(Self {
                name,
                ids: ids.iter().copied().collect(),
            })
        }
    }

    #[async_trait]
    impl Probe for StaticProbe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn ids(&self) -> &HashSet<&'static str> {
            &self.ids
        }

        async fn verify(&self, _finding: &Finding) -> Verdict {
            Verdict::manual_check("stub")
        }
    }

    fn finding_with_rule(rule: &str) -> Finding {
        Finding::from_pairs([(COL_RULE_NAME, rule)])
    }

    #[test]
    fn test_match_by_rule_name() {
        let registry = ProbeRegistry::new(vec![
            StaticProbe::new("a", &["rule-one"]),
            StaticProbe::new("b", &["rule-two"]),
        ]);
        let probe = registry.match_probe(&finding_with_rule("rule-two")).unwrap();
        assert_eq!(probe.name(), "b");
    }

    #[test]
    fn test_match_by_violation_type() {
        let registry = ProbeRegistry::new(vec![StaticProbe::new("a", &["vt-one"])]);
        let finding = Finding::from_pairs([
            (COL_RULE_NAME, "unclaimed rule"),
            (COL_VIOLATION_TYPE, "vt-one"),
        ]);
        assert_eq!(registry.match_probe(&finding).unwrap().name(), "a");
    }

    #[test]
    fn test_no_match_returns_none() {
        let registry = ProbeRegistry::new(vec![StaticProbe::new("a", &["rule-one"])]);
        assert!(registry.match_probe(&finding_with_rule("unknown")).is_none());
    }

    #[test]
    fn test_overlapping_identifier_first_registered_wins() {
        let registry = ProbeRegistry::new(vec![
            StaticProbe::new("first", &["shared-rule"]),
            StaticProbe::new("second", &["shared-rule"]),
        ]);
        for _ in 0..3 {
            let probe = registry.match_probe(&finding_with_rule("shared-rule")).unwrap();
            assert_eq!(probe.name(), "first");
        }
    }

    #[test]
    fn test_earlier_registration_wins_across_identifier_kinds() {
        // First probe claims the violation type, second claims the rule
        // name; registration order decides, not which column matched.
        let registry = ProbeRegistry::new(vec![
            StaticProbe::new("first", &["vt-shared"]),
            StaticProbe::new("second", &["rule-shared"]),
        ]);
        let finding = Finding::from_pairs([
            (COL_RULE_NAME, "rule-shared"),
            (COL_VIOLATION_TYPE, "vt-shared"),
        ]);
        assert_eq!(registry.match_probe(&finding).unwrap().name(), "first");
    }

    #[test]
    fn test_match_is_deterministic_and_memoized() {
        let registry = ProbeRegistry::new(vec![
            StaticProbe::new("a", &["rule-one"]),
            StaticProbe::new("b", &["rule-one", "rule-two"]),
        ]);
        let first = registry.match_probe(&finding_with_rule("rule-one")).unwrap();
        for _ in 0..10 {
            let again = registry.match_probe(&finding_with_rule("rule-one")).unwrap();
            assert_eq!(again.name(), first.name());
        }
    }

    #[test]
    fn test_builtin_registry_matches_known_rules() {
        use crate::net::{ConnectOutcome, HttpResponse};
        use crate::errors::VeriomError;

        struct NullHttp;
        #[async_trait]
        impl crate::net::HttpClient for NullHttp {
            async fn get(&self, _url: &str) -> Result<HttpResponse, VeriomError> {
                Err(VeriomError::Network("stub".into()))
            }
        }

        struct NullTcp;
        #[async_trait]
        impl crate::net::TcpDialer for NullTcp {
            async fn connect(&self, _host: &str, _port: u16) -> Result<ConnectOutcome, VeriomError> {
                Ok(ConnectOutcome::Closed)
            }
        }

        let registry = ProbeRegistry::builtin(Arc::new(NullHttp), Arc::new(NullTcp));
        assert_eq!(registry.len(), 6);

        let s3 = registry
            .match_probe(&finding_with_rule("S3 bucket configured for public access"))
            .unwrap();
        assert_eq!(s3.name(), "s3");

        let net = registry
            .match_probe(&finding_with_rule("AWS - Security Group allowing ingress to port 22"))
            .unwrap();
        assert_eq!(net.name(), "network");

        let manual = registry
            .match_probe(&finding_with_rule("BigQuery policy configured with 'allUsers' access"))
            .unwrap();
        assert_eq!(manual.name(), "manual");

        assert!(registry.match_probe(&finding_with_rule("made-up rule")).is_none());
    }
}
