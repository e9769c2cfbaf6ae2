use std::collections::HashSet;
use std::sync::Arc;
use async_trait::async_trait;
use crate::models::{Finding, Verdict};
use crate::net::HttpClient;
use super::Probe;

/// Anonymous listing attempt against a Cloud Storage bucket.
pub struct GcpStorageProbe {
    http: Arc<dyn HttpClient>,
    ids: HashSet<&'static str>,
}

impl GcpStorageProbe {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        let ids = HashSet::from([
            "Cloud Storage policy configured with 'allUsers' access",
            "Cloud Storage policy configured with 'allAuthenticatedUsers' access",
        ]);
        Self { http, ids }
    }
}

/// Bucket name from the common GCP addressing forms: the storage API URL,
/// a `gs://` URI, or a bare bucket name (anything without a slash).
pub fn bucket_from_resource(resource_id: &str) -> Option<&str> {
    let name = if let Some(rest) = resource_id.strip_prefix("//storage.googleapis.com/") {
        rest
    } else if let Some(rest) = resource_id.strip_prefix("gs://") {
        rest
    } else if !resource_id.contains('/') {
        resource_id
    } else {
        return None;
    };
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[async_trait]
impl Probe for GcpStorageProbe {
    fn name(&self) -> &'static str {
        "gcp-storage"
    }

    fn ids(&self) -> &HashSet<&'static str> {
        &self.ids
    }

    async fn verify(&self, finding: &Finding) -> Verdict {
        let Some(bucket) = bucket_from_resource(finding.resource_id()) else {
            return Verdict::skipped("Could not extract bucket name from Resource ID.");
        };

        let url = format!("https://storage.googleapis.com/{}/", bucket);

        match self.http.get(&url).await {
            Ok(resp) => match resp.status {
                // Public keys come back as an XML listing
                200 => Verdict::exploitable(format!(
                    "Bucket is publicly listable. GET {} returned 200 OK.",
                    url
                )),
                // 'allAuthenticatedUsers' still needs a token, so the
                // unauthenticated perspective reads as Secure.
                403 => Verdict::secure(
                    "Access Denied (403). Buckets with 'allAuthenticatedUsers' might still require auth token, so this is Secure from Unauthenticated perspective.",
                ),
                404 => Verdict::inconclusive(format!("Bucket not found (404). URL: {}", url)),
                other => Verdict::inconclusive(format!("Received unexpected status {}.", other)),
            },
            Err(e) => Verdict::probe_error(format!("Connection failed: {}", e)),
        }
    }
}
