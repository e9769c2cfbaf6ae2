use std::collections::HashSet;
use std::sync::Arc;
use async_trait::async_trait;
use crate::models::{Finding, Verdict};
use crate::net::HttpClient;
use super::Probe;
use tracing::debug;

const S3_ARN_PREFIX: &str = "arn:aws:s3:::";

/// Unauthenticated read against the bucket's public HTTP endpoints.
pub struct S3Probe {
    http: Arc<dyn HttpClient>,
    ids: HashSet<&'static str>,
}

impl S3Probe {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        let ids = HashSet::from([
            "S3 bucket policy with global write, read, or delete permissions",
            "S3 bucket configured for public access",
            "S3 bucket with Sensitive Data configured for public access",
            "S3 bucket with Sensitive Data configured for any authenticated user access",
            "S3 bucket with Block Public Access setting disabled",
            "S3 Bucket ACL allows READ access to ANY authenticated user",
            "S3 bucket policy allows public write access",
            "S3 bucket policy allows public read access",
            "S3 bucket configured for any authenticated user access",
        ]);
        Self { http, ids }
    }

    /// Candidate public endpoints: the global hostname first, then the
    /// region-qualified one.
    fn candidate_urls(bucket: &str, region: &str) -> [String; 2] {
        let region = if region.is_empty() { "us-east-1" } else { region };
        [
            format!("http://{}.s3.amazonaws.com", bucket),
            format!("http://{}.s3.{}.amazonaws.com", bucket, region),
        ]
    }
}

/// Bucket name from the resource identifier, stripping the ARN prefix when
/// present. Heuristic: anything non-empty that is not an S3 ARN is assumed
/// to already be a bucket name.
pub fn bucket_name_from_resource(resource_id: &str) -> Option<&str> {
    let name = resource_id
        .strip_prefix(S3_ARN_PREFIX)
        .unwrap_or(resource_id);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[async_trait]
impl Probe for S3Probe {
    fn name(&self) -> &'static str {
        "s3"
    }

    fn ids(&self) -> &HashSet<&'static str> {
        &self.ids
    }

    async fn verify(&self, finding: &Finding) -> Verdict {
        let Some(bucket) = bucket_name_from_resource(finding.resource_id()) else {
            return Verdict::skipped("Could not extract bucket name from Resource ID.");
        };

        let urls = Self::candidate_urls(bucket, finding.region());
        for url in &urls {
            match self.http.get(url).await {
                Ok(resp) => match resp.status {
                    200 => {
                        return Verdict::exploitable(format!(
                            "Bucket is publicly accessible. GET {} returned 200 OK.",
                            url
                        ));
                    }
                    403 => {
                        // Exists but denies anonymous listing: not public.
                        return Verdict::secure(format!(
                            "Bucket exists but returned 403 Forbidden on root (Access Denied). Endpoint: {}",
                            url
                        ));
                    }
                    // NoSuchBucket on this endpoint; try the next one
                    404 => continue,
                    other => {
                        return Verdict::inconclusive(format!(
                            "Received unexpected status code {} from {}",
                            other, url
                        ));
                    }
                },
                Err(e) => {
                    debug!(bucket, url = url.as_str(), error = %e, "S3 endpoint unreachable");
                    continue;
                }
            }
        }

        Verdict::inconclusive(format!(
            "Could not connect to bucket endpoint or bucket does not exist. URLs tested: {}",
            urls.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_name_from_arn() {
        assert_eq!(
            bucket_name_from_resource("arn:aws:s3:::example-bucket"),
            Some("example-bucket")
        );
    }

    #[test]
    fn test_bucket_name_passthrough() {
        assert_eq!(bucket_name_from_resource("my-bucket"), Some("my-bucket"));
    }

    #[test]
    fn test_bucket_name_empty() {
        assert_eq!(bucket_name_from_resource(""), None);
        assert_eq!(bucket_name_from_resource("arn:aws:s3:::"), None);
    }

    #[test]
    fn test_candidate_urls_default_region() {
        let urls = S3Probe::candidate_urls("b", "");
        assert_eq!(urls[0], "http://b.s3.amazonaws.com");
        assert_eq!(urls[1], "http://b.s3.us-east-1.amazonaws.com");
    }

    #[test]
    fn test_candidate_urls_explicit_region() {
        let urls = S3Probe::candidate_urls("b", "eu-west-1");
        assert_eq!(urls[1], "http://b.s3.eu-west-1.amazonaws.com");
    }
}
