use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use crate::models::ExploitStatus;
use crate::pipeline::PipelineEvent;

/// Renders pipeline events as an indicatif progress bar. Lives on its own
/// task fed by the runner's event channel, so rendering never touches the
/// probe path.
pub struct VerifyProgress {
    bar: Option<ProgressBar>,
    exploitable: usize,
}

impl VerifyProgress {
    pub fn new() -> Self {
        Self {
            bar: None,
            exploitable: 0,
        }
    }

    pub fn handle_event(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Started { total, workers } => {
                let bar = ProgressBar::new(*total as u64);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("  {bar:30.cyan/dark_gray} {pos}/{len} findings | {msg}")
                        .unwrap()
                        .progress_chars("█▓░"),
                );
                bar.set_message(format!("{} workers", workers));
                self.bar = Some(bar);
            }
            PipelineEvent::ProbeCompleted { exploit, .. } => {
                if *exploit == ExploitStatus::Exploitable {
                    self.exploitable += 1;
                }
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                    if self.exploitable > 0 {
                        bar.set_message(format!(
                            "{} exploitable",
                            style(self.exploitable).red().bold()
                        ));
                    }
                }
            }
            PipelineEvent::Completed { total, exploitable } => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_with_message(format!(
                        "{} verified, {} exploitable",
                        total, exploitable
                    ));
                }
            }
            PipelineEvent::Failed { error } => {
                if let Some(bar) = self.bar.take() {
                    bar.abandon_with_message(format!("Failed: {}", error));
                }
            }
        }
    }
}

impl Default for VerifyProgress {
    fn default() -> Self {
        Self::new()
    }
}
