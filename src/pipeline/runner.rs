use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use futures::FutureExt;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use crate::errors::VeriomError;
use crate::models::{ExecutionStatus, ExploitStatus, Finding, OutputRecord, Verdict};
use crate::probes::ProbeRegistry;
use crate::report::ResultSink;
use super::events::PipelineEvent;
use super::summary::RunSummary;
use tracing::{debug, error, warn};

/// Executes probes for a batch of findings under bounded concurrency and
/// streams one output record per finding to the sink in completion order.
///
/// Guarantees: every submitted finding yields exactly one record; a
/// misbehaving probe only affects its own record; the sink is the single
/// serialization point; a sink failure aborts the run.
pub struct VerificationRunner {
    registry: Arc<ProbeRegistry>,
    sink: Arc<dyn ResultSink>,
    workers: usize,
    cancel_token: CancellationToken,
    event_tx: Option<mpsc::UnboundedSender<PipelineEvent>>,
}

impl VerificationRunner {
    pub fn new(registry: Arc<ProbeRegistry>, sink: Arc<dyn ResultSink>, workers: usize) -> Self {
        Self {
            registry,
            sink,
            workers: workers.max(1),
            cancel_token: CancellationToken::new(),
            event_tx: None,
        }
    }

    /// Replace the runner's cancel token with an external one (e.g. wired
    /// to Ctrl-C) so cancelling it actually stops the run.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Attach an event channel for streaming progress to a renderer.
    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<PipelineEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    pub async fn run(&self, findings: Vec<Finding>) -> Result<RunSummary, VeriomError> {
        if findings.is_empty() {
            return Err(VeriomError::InputData(
                "No data found or error reading input file.".into(),
            ));
        }

        let total = findings.len();
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let completed = Arc::new(AtomicUsize::new(0));
        let mut join_set: JoinSet<Result<(ExecutionStatus, ExploitStatus), VeriomError>> =
            JoinSet::new();

        self.emit(PipelineEvent::Started {
            total,
            workers: self.workers,
        });

        for finding in findings {
            let registry = self.registry.clone();
            let sink = self.sink.clone();
            let semaphore = semaphore.clone();
            let cancel = self.cancel_token.clone();
            let completed = completed.clone();
            let event_tx = self.event_tx.clone();

            join_set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| VeriomError::Internal("Worker semaphore closed".into()))?;

                let verdict = if cancel.is_cancelled() {
                    // Drained without probing so the row set stays complete
                    Verdict::skipped("Run cancelled before this finding was probed.")
                } else {
                    Self::judge(&registry, &finding).await
                };

                let statuses = (verdict.execution(), verdict.exploit());
                let exploit = verdict.exploit();
                let rule_name = finding.rule_name().to_string();
                let record = OutputRecord::new(finding, verdict);
                sink.write(&record).await?;

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(rule = %rule_name, status = %exploit, done, total, "Probe completed");
                if let Some(tx) = event_tx {
                    let _ = tx.send(PipelineEvent::ProbeCompleted {
                        rule_name,
                        exploit,
                        completed: done,
                        total,
                    });
                }

                Ok(statuses)
            });
        }

        let mut summary = RunSummary::new(total);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok((execution, exploit))) => summary.tally(execution, exploit),
                Ok(Err(e)) => {
                    // Sink failure: output integrity is gone, stop the run
                    error!(error = %e, "Result sink failed, aborting run");
                    self.cancel_token.cancel();
                    join_set.shutdown().await;
                    self.emit(PipelineEvent::Failed {
                        error: e.to_string(),
                    });
                    return Err(e);
                }
                Err(join_err) => {
                    // Probe panics are caught per-unit; reaching this means
                    // the task infrastructure itself failed
                    error!(error = %join_err, "Verification task panicked outside probe boundary");
                }
            }
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;
        self.emit(PipelineEvent::Completed {
            total: summary.total,
            exploitable: summary.exploitable,
        });
        Ok(summary)
    }

    /// Resolve and execute the probe for one finding. Match-misses become
    /// manual-check verdicts; probe panics become error verdicts for this
    /// finding only.
    async fn judge(registry: &ProbeRegistry, finding: &Finding) -> Verdict {
        let Some(probe) = registry.match_probe(finding) else {
            return Verdict::manual_check("Manual Check Required");
        };

        match AssertUnwindSafe(probe.verify(finding)).catch_unwind().await {
            Ok(verdict) => verdict,
            Err(_) => {
                warn!(
                    probe = probe.name(),
                    rule = finding.rule_name(),
                    "Probe panicked, converting to error verdict"
                );
                Verdict::probe_error(format!(
                    "Probe '{}' failed unexpectedly while verifying this finding.",
                    probe.name()
                ))
            }
        }
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }
}
