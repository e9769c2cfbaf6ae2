use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use crate::errors::VeriomError;
use tracing::debug;

/// The slice of an HTTP response the probes care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
}

/// Outbound HTTP capability injected into probes. Implementations must
/// bound every call with a timeout; a hung endpoint surfaces as
/// `VeriomError::Timeout`, any other transport failure as
/// `VeriomError::Network`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, VeriomError>;
}

/// Production client on reqwest with a per-call timeout baked into the
/// underlying client.
pub struct ReqwestHttp {
    client: Client,
}

impl ReqwestHttp {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, VeriomError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| VeriomError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, VeriomError> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                VeriomError::Timeout(format!("GET {} timed out", url))
            } else {
                VeriomError::Network(format!("GET {} failed: {}", url, e))
            }
        })?;

        let status = resp.status().as_u16();
        debug!(url, status, "HTTP probe response");
        Ok(HttpResponse { status })
    }
}
