use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use async_trait::async_trait;
use regex::Regex;
use crate::models::{Finding, Verdict};
use crate::net::HttpClient;
use super::Probe;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s]+").unwrap());

/// Generic endpoint probe for managed services whose public URL, when one
/// exists, shows up in the findings text rather than the resource id.
pub struct ServicesProbe {
    http: Arc<dyn HttpClient>,
    ids: HashSet<&'static str>,
}

impl ServicesProbe {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        let ids = HashSet::from([
            "AWS - ECR Repository is Publicly Accessible",
            "ECR repository is configured to be publicly exposed",
            "AWS - Lambda Function with Public Access",
            "Lambda function is configured to be publicly exposed",
            "Cloud Run Service is accessible by any users or any authenticated user",
        ]);
        Self { http, ids }
    }

    async fn check_http(&self, url: &str) -> Verdict {
        match self.http.get(url).await {
            Ok(resp) if resp.status < 400 => Verdict::exploitable(format!(
                "Endpoint {} returned {}. Publicly accessible.",
                url, resp.status
            )),
            Ok(resp) => Verdict::secure(format!("Endpoint {} returned {}.", url, resp.status)),
            Err(e) => Verdict::probe_error(format!("Failed to connect to {}: {}", url, e)),
        }
    }
}

/// First http(s) URL embedded in free-form text.
pub fn extract_url(text: &str) -> Option<&str> {
    URL_RE.find(text).map(|m| m.as_str())
}

#[async_trait]
impl Probe for ServicesProbe {
    fn name(&self) -> &'static str {
        "services"
    }

    fn ids(&self) -> &HashSet<&'static str> {
        &self.ids
    }

    async fn verify(&self, finding: &Finding) -> Verdict {
        // Pulling from a repository-made-public needs an authenticated
        // docker client; there is no safe anonymous HTTP equivalent.
        if finding.rule_name().contains("ECR") {
            return Verdict::skipped(
                "Verification of ECR public access requires an authenticated registry client.",
            );
        }

        match extract_url(finding.findings_text()) {
            Some(url) => {
                let url = url.to_string();
                self.check_http(&url).await
            }
            None => Verdict::skipped(
                "Verifier requires known public endpoint/URL which could not be found in Resource ID or Findings.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_url_present() {
        assert_eq!(
            extract_url("Function URL: https://abc.lambda-url.us-east-1.on.aws/ is public"),
            Some("https://abc.lambda-url.us-east-1.on.aws/")
        );
    }

    #[test]
    fn test_extract_url_http_scheme() {
        assert_eq!(extract_url("see http://example.com/x"), Some("http://example.com/x"));
    }

    #[test]
    fn test_extract_url_absent() {
        assert_eq!(extract_url("no endpoint recorded"), None);
    }
}
