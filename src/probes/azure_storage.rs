use std::collections::HashSet;
use std::sync::Arc;
use async_trait::async_trait;
use crate::models::{Finding, Verdict};
use crate::net::HttpClient;
use super::Probe;

/// Anonymous blob-listing attempt against an Azure storage container.
pub struct AzureStorageProbe {
    http: Arc<dyn HttpClient>,
    ids: HashSet<&'static str>,
}

impl AzureStorageProbe {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        let ids = HashSet::from([
            "Storage Account blob container configured with public access",
            "Storage Account container storing activity logs is publicly accessible",
            "Azure Disk configured with PUBLIC network access enabled",
            "Azure Disk public network access is enabled",
        ]);
        Self { http, ids }
    }
}

/// Storage account and container names out of an ARM resource path:
/// `/subscriptions/../storageAccounts/{account}/../containers/{container}`.
pub fn parse_account_container(resource_id: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = resource_id.split('/').collect();
    let account = parts
        .iter()
        .position(|p| *p == "storageAccounts")
        .and_then(|i| parts.get(i + 1).copied())
        .filter(|s| !s.is_empty())?;
    let container = parts
        .iter()
        .position(|p| *p == "containers")
        .and_then(|i| parts.get(i + 1).copied())
        .filter(|s| !s.is_empty())?;
    Some((account, container))
}

#[async_trait]
impl Probe for AzureStorageProbe {
    fn name(&self) -> &'static str {
        "azure-storage"
    }

    fn ids(&self) -> &HashSet<&'static str> {
        &self.ids
    }

    async fn verify(&self, finding: &Finding) -> Verdict {
        let Some((account, container)) = parse_account_container(finding.resource_id()) else {
            return Verdict::skipped(
                "Could not extract storage account and container name from Resource ID.",
            );
        };

        // Anonymous container listing is the strongest public-access signal.
        let url = format!(
            "https://{}.blob.core.windows.net/{}?restype=container&comp=list",
            account, container
        );

        match self.http.get(&url).await {
            Ok(resp) => match resp.status {
                200 => Verdict::exploitable(format!(
                    "Container is publicly listable. GET {} returned 200 OK.",
                    url
                )),
                403 => Verdict::secure(format!(
                    "Access Denied (403). Public access likely disabled. URL: {}",
                    url
                )),
                404 => Verdict::inconclusive(format!("Container not found (404). URL: {}", url)),
                other => Verdict::inconclusive(format!(
                    "Received unexpected status {}. URL: {}",
                    other, url
                )),
            },
            Err(e) => Verdict::probe_error(format!("Connection failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_arm_path() {
        let id = "/subscriptions/abc/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/prodlogs/blobServices/default/containers/activity";
        assert_eq!(parse_account_container(id), Some(("prodlogs", "activity")));
    }

    #[test]
    fn test_parse_missing_container() {
        let id = "/subscriptions/abc/providers/Microsoft.Storage/storageAccounts/prodlogs";
        assert_eq!(parse_account_container(id), None);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_account_container("not-an-arm-path"), None);
        assert_eq!(parse_account_container(""), None);
    }
}
