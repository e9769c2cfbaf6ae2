use std::io::ErrorKind;
use std::time::Duration;
use async_trait::async_trait;
use tokio::net::TcpStream;
use crate::errors::VeriomError;
use tracing::debug;

/// Result of a raw connect attempt against a target port.
///
/// Refused and timed-out connects are `Closed` — from the attacker's
/// vantage point a filtered port and a closed port look the same. Name
/// resolution and socket-level failures are errors, not `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Open,
    Closed,
}

/// Outbound TCP capability injected into probes, bounded by a connect
/// timeout.
#[async_trait]
pub trait TcpDialer: Send + Sync {
    async fn connect(&self, host: &str, port: u16) -> Result<ConnectOutcome, VeriomError>;
}

/// Production dialer on tokio's TcpStream.
pub struct TokioDialer {
    connect_timeout: Duration,
}

impl TokioDialer {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl TcpDialer for TokioDialer {
    async fn connect(&self, host: &str, port: u16) -> Result<ConnectOutcome, VeriomError> {
        let attempt = TcpStream::connect((host, port));
        match tokio::time::timeout(self.connect_timeout, attempt).await {
            Ok(Ok(_stream)) => {
                debug!(host, port, "TCP connect succeeded");
                Ok(ConnectOutcome::Open)
            }
            Ok(Err(e)) => match e.kind() {
                ErrorKind::ConnectionRefused
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::TimedOut => {
                    debug!(host, port, error = %e, "TCP connect rejected");
                    Ok(ConnectOutcome::Closed)
                }
                _ => Err(VeriomError::Network(format!(
                    "Socket error connecting to {}:{}: {}",
                    host, port, e
                ))),
            },
            Err(_) => {
                debug!(host, port, "TCP connect timed out");
                Ok(ConnectOutcome::Closed)
            }
        }
    }
}
