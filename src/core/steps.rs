//! Per-step failure policies for the install and self-update orchestrators.
//!
//! Both orchestrators are linear plans of named steps. Rather than letting
//! "log and continue" fall out implicitly from scattered `match` arms, each
//! [`Step`] declares its [`FailurePolicy`] in one table and the
//! [`StepRunner`] applies it uniformly: a failed `Continue` step is logged
//! and the plan moves on (later steps that structurally depend on its
//! output fail and get logged on their own); a failed `Abort` step marks
//! the run aborted and every remaining step is recorded as skipped without
//! running.
//!
//! The runner records a [`StepReport`] per step so callers and tests can
//! inspect exactly what happened during a run.

use colored::Colorize;
use std::future::Future;
use tracing::{debug, warn};

/// The named steps of the install and self-update plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Fetch the latest release and compare against the stored marker.
    CheckVersion,
    /// Download the release's first asset into the staging directory and
    /// persist the new version marker.
    FetchAsset,
    /// Discover the target application directory under the user data area.
    LocateTarget,
    /// Remove the fixed content subtree under the target directory.
    PurgeContent,
    /// Extract the staged archive into the extraction directory.
    ExtractArchive,
    /// Mirror the extracted tree into the target directory.
    CopyContent,
    /// Remove the staging directory.
    CleanupStaging,
    /// Copy the downloaded installer next to the current executable as the
    /// updater helper.
    StageHelper,
    /// Launch the staged helper detached with the completion signal.
    LaunchHelper,
}

/// What the runner does with the rest of the plan when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and keep running subsequent steps.
    Continue,
    /// Log the failure and skip every remaining step.
    Abort,
}

impl Step {
    /// Human-readable label used in console output and reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::CheckVersion => "version check",
            Self::FetchAsset => "asset retrieval",
            Self::LocateTarget => "target discovery",
            Self::PurgeContent => "content purge",
            Self::ExtractArchive => "archive extraction",
            Self::CopyContent => "content copy",
            Self::CleanupStaging => "staging cleanup",
            Self::StageHelper => "helper staging",
            Self::LaunchHelper => "helper launch",
        }
    }

    /// The policy table.
    ///
    /// Every install step continues on failure: a partial run is reported,
    /// not rolled back. The self-update hand-off is the exception — without
    /// a staged helper there is nothing meaningful left to do, so staging
    /// and launch abort the remainder.
    pub const fn failure_policy(self) -> FailurePolicy {
        match self {
            Self::StageHelper | Self::LaunchHelper => FailurePolicy::Abort,
            _ => FailurePolicy::Continue,
        }
    }
}

/// Terminal state of one step in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The step ran and succeeded.
    Completed,
    /// The step ran and failed; the error was logged.
    Failed,
    /// The step never ran because an earlier `Abort` step failed.
    Skipped,
}

/// Record of one step's outcome within a run.
#[derive(Debug)]
pub struct StepReport {
    /// Which step this report describes.
    pub step: Step,
    /// How the step ended.
    pub status: StepStatus,
    /// Rendered error chain for failed steps.
    pub error: Option<String>,
}

/// Drives a linear step plan, applying each step's failure policy.
///
/// Steps are handed to [`run`](Self::run) as futures; the runner awaits
/// them in order, logs failures to the console and the tracing layer, and
/// yields each step's output as an `Option` so orchestrators can thread
/// values between steps without re-checking policies themselves.
#[derive(Debug, Default)]
pub struct StepRunner {
    reports: Vec<StepReport>,
    aborted: bool,
}

impl StepRunner {
    /// Create a runner with an empty report log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one step of the plan.
    ///
    /// Returns `Some(output)` when the step completed, `None` when it
    /// failed or was skipped. Failures are printed to standard output (the
    /// installer's user surface) and recorded in the report log; an
    /// `Abort`-policy failure additionally poisons the rest of the plan.
    pub async fn run<T, F>(&mut self, step: Step, operation: F) -> Option<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        if self.aborted {
            debug!(step = step.label(), "skipping step after earlier abort");
            self.reports.push(StepReport { step, status: StepStatus::Skipped, error: None });
            return None;
        }

        match operation.await {
            Ok(output) => {
                debug!(step = step.label(), "step completed");
                self.reports.push(StepReport { step, status: StepStatus::Completed, error: None });
                Some(output)
            }
            Err(error) => {
                warn!(step = step.label(), "step failed: {error:#}");
                println!("{}", format!("Error during {}: {error:#}", step.label()).red());
                if step.failure_policy() == FailurePolicy::Abort {
                    self.aborted = true;
                }
                self.reports.push(StepReport {
                    step,
                    status: StepStatus::Failed,
                    error: Some(format!("{error:#}")),
                });
                None
            }
        }
    }

    /// Record a step that completed outside the runner (e.g. the version
    /// check, which never fails by contract).
    pub fn record_completed(&mut self, step: Step) {
        self.reports.push(StepReport { step, status: StepStatus::Completed, error: None });
    }

    /// Whether an `Abort`-policy step has failed.
    #[must_use]
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// The per-step reports accumulated so far, in plan order.
    #[must_use]
    pub fn reports(&self) -> &[StepReport] {
        &self.reports
    }

    /// Consume the runner and return its reports.
    #[must_use]
    pub fn into_reports(self) -> Vec<StepReport> {
        self.reports
    }
}
