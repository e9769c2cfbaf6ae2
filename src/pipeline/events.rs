use crate::models::ExploitStatus;

/// Progress events streamed from the runner to whatever is rendering the
/// run (the CLI progress bar). Emission never blocks the probe path: the
/// channel is unbounded and send failures are ignored.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    Started {
        total: usize,
        workers: usize,
    },
    ProbeCompleted {
        rule_name: String,
        exploit: ExploitStatus,
        completed: usize,
        total: usize,
    },
    Completed {
        total: usize,
        exploitable: usize,
    },
    Failed {
        error: String,
    },
}
