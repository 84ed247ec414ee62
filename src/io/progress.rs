//! Progress display for multi-run invocations with a rolling window of runs

use std::sync::LazyLock;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::io::configuration::{MAX_VISIBLE_RUNS, PROGRESS_BAR_WIDTH};

static RUN_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>14} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Runs: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum RunStatus {
    Running,
    Done(String),
    Failed(String),
}

#[derive(Debug, Clone)]
struct RunState {
    seed: i32,
    status: RunStatus,
}

/// Coordinates progress display for a batch of layout runs
///
/// A batch bar counts finished runs; below it the most recent runs are
/// listed with their seed and outcome.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    run_bars: Vec<ProgressBar>,
    run_states: Vec<RunState>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            run_bars: Vec::new(),
            run_states: Vec::new(),
        }
    }

    /// Create the batch bar and run lines for `run_count` runs
    pub fn initialize(&mut self, run_count: usize) {
        let batch_bar = ProgressBar::new(run_count as u64);
        batch_bar.set_style(BATCH_STYLE.clone());
        self.batch_bar = Some(self.multi_progress.add(batch_bar));

        for _ in 0..run_count.min(MAX_VISIBLE_RUNS) {
            let bar = ProgressBar::new(0);
            bar.set_style(RUN_STYLE.clone());
            self.run_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Mark a run as started
    pub fn start_run(&mut self, index: usize, seed: i32) {
        if index >= self.run_states.len() {
            self.run_states.resize(
                index + 1,
                RunState {
                    seed: 0,
                    status: RunStatus::Running,
                },
            );
        }
        if let Some(state) = self.run_states.get_mut(index) {
            *state = RunState {
                seed,
                status: RunStatus::Running,
            };
        }
        self.update_bars();
    }

    /// Mark a run as finished with a short summary
    pub fn complete_run(&mut self, index: usize, summary: &str, elapsed: Duration) {
        self.finish_run(
            index,
            RunStatus::Done(format!("{summary} in {elapsed:.2?}")),
        );
    }

    /// Mark a run as failed
    pub fn fail_run(&mut self, index: usize, reason: &str) {
        self.finish_run(index, RunStatus::Failed(reason.to_string()));
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All runs processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Number of runs marked as failed
    pub fn failed_runs(&self) -> usize {
        self.run_states
            .iter()
            .filter(|state| matches!(state.status, RunStatus::Failed(_)))
            .count()
    }

    fn finish_run(&mut self, index: usize, status: RunStatus) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(state) = self.run_states.get_mut(index) {
            state.status = status;
        }
        self.update_bars();
    }

    /// Show the most recent runs on the available lines
    fn update_bars(&self) {
        let start_idx = self.run_states.len().saturating_sub(self.run_bars.len());
        let visible = self.run_states.get(start_idx..).unwrap_or(&[]);

        for (bar, state) in self.run_bars.iter().zip(visible) {
            bar.set_prefix(format!("seed {}", state.seed));
            bar.set_message(match &state.status {
                RunStatus::Running => "generating".to_string(),
                RunStatus::Done(summary) => format!("✓ {summary}"),
                RunStatus::Failed(reason) => format!("✗ {reason}"),
            });
        }
    }
}
