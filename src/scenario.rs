// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-scenario execution state machine and run-wide aggregation.

use derive_more::with_trait::Display;

use crate::outcome::Outcome;

/// Execution status of a single scenario.
#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
#[display("{self:?}")]
pub enum Status {
    /// No step or hook [`Outcome`] has been recorded yet.
    #[default]
    NotStarted,

    /// At least one [`Outcome`] has been recorded, none terminal yet.
    Running,

    /// Every recorded [`Outcome`] was [`Outcome::Passed`].
    Passed,

    /// At least one [`Outcome::Failed`] was recorded.
    Failed,

    /// No failures, but at least one not-fully-executable [`Outcome`]
    /// ([`Outcome::Pending`], [`Outcome::Undefined`] or
    /// [`Outcome::Ambiguous`]) was recorded.
    Pending,
}

impl Status {
    /// Indicates whether this [`Status`] is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Passed | Self::Failed | Self::Pending)
    }
}

/// State machine tracking a single scenario through its execution.
///
/// The embedding runner feeds it every step and hook [`Outcome`] of the
/// scenario via [`Progress::record()`], consults [`Progress::should_skip()`]
/// before invoking the next step, and seals the scenario with
/// [`Progress::finish()`] once `AfterScenario` hooks have completed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Progress {
    /// Current [`Status`] of the scenario.
    status: Status,

    /// Indicates whether any [`Outcome::Failed`] has been recorded.
    failed: bool,

    /// Indicates whether any [`Outcome`] other than [`Outcome::Passed`] or
    /// [`Outcome::Failed`] has been recorded.
    pending: bool,

    /// Indicates whether the remaining steps should be skipped.
    skipping: bool,
}

impl Progress {
    /// Creates a new [`Progress`] in the [`Status::NotStarted`] state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the [`Outcome`] of one step or hook invocation.
    ///
    /// First recorded [`Outcome`] moves the scenario into
    /// [`Status::Running`]. Recording into a terminal [`Status`] is a no-op.
    ///
    /// An [`Outcome::Ambiguous`] marks the scenario [`Status::Pending`], but
    /// doesn't skip its remaining steps, as those still execute meaningfully.
    pub fn record(&mut self, outcome: &Outcome) {
        if self.status.is_terminal() {
            return;
        }
        self.status = Status::Running;

        match outcome {
            Outcome::Passed => {}
            Outcome::Failed(_) => {
                self.failed = true;
                self.skipping = true;
            }
            Outcome::Pending(_) | Outcome::Undefined => {
                self.pending = true;
                self.skipping = true;
            }
            Outcome::Ambiguous(_) => {
                self.pending = true;
            }
        }
    }

    /// Indicates whether the embedding runner should stop invoking this
    /// scenario's remaining steps.
    #[must_use]
    pub const fn should_skip(&self) -> bool {
        self.skipping
    }

    /// Seals this scenario with its terminal [`Status`] and returns it.
    ///
    /// Idempotent: once sealed, the terminal [`Status`] never changes.
    pub fn finish(&mut self) -> Status {
        if !self.status.is_terminal() {
            self.status = if self.failed {
                Status::Failed
            } else if self.pending {
                Status::Pending
            } else {
                Status::Passed
            };
        }
        self.status
    }

    /// Returns the current [`Status`] of the scenario.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }
}

/// Aggregated terminal [`Status`]es of a whole run.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunSummary {
    /// Number of [`Status::Passed`] scenarios.
    pub passed: usize,

    /// Number of [`Status::Failed`] scenarios.
    pub failed: usize,

    /// Number of [`Status::Pending`] scenarios.
    pub pending: usize,
}

impl RunSummary {
    /// Creates a new empty [`RunSummary`].
    #[must_use]
    pub const fn new() -> Self {
        Self { passed: 0, failed: 0, pending: 0 }
    }

    /// Records the terminal [`Status`] of one scenario.
    ///
    /// Non-terminal [`Status`]es are ignored.
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Pending => self.pending += 1,
            Status::NotStarted | Status::Running => {}
        }
    }

    /// Returns the number of scenarios recorded in this [`RunSummary`].
    #[must_use]
    pub const fn scenarios(&self) -> usize {
        self.passed + self.failed + self.pending
    }

    /// Indicates whether the run passed as a whole, being the conjunction of
    /// all its scenarios' terminal [`Status`]es.
    #[must_use]
    pub const fn run_passed(&self) -> bool {
        self.failed == 0
    }

    /// Indicates whether any scenario of the run finished as
    /// [`Status::Pending`].
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending > 0
    }
}

#[cfg(test)]
mod tests {
    use super::{Outcome, Progress, RunSummary, Status};
    use crate::{outcome::Failure, step::AmbiguousMatch};

    fn failed() -> Outcome {
        Outcome::Failed(Failure::from_panic(Box::new("boom")))
    }

    #[test]
    fn starts_not_started_and_runs_on_first_outcome() {
        let mut progress = Progress::new();
        assert_eq!(progress.status(), Status::NotStarted);
        assert!(!progress.should_skip());

        progress.record(&Outcome::Passed);
        assert_eq!(progress.status(), Status::Running);
        assert!(!progress.should_skip());
    }

    #[test]
    fn all_passed_finishes_passed() {
        let mut progress = Progress::new();
        progress.record(&Outcome::Passed);
        progress.record(&Outcome::Passed);

        assert_eq!(progress.finish(), Status::Passed);
        assert_eq!(progress.status(), Status::Passed);
    }

    #[test]
    fn empty_scenario_finishes_passed() {
        assert_eq!(Progress::new().finish(), Status::Passed);
    }

    #[test]
    fn failure_skips_the_rest_and_finishes_failed() {
        let mut progress = Progress::new();
        progress.record(&Outcome::Passed);
        progress.record(&failed());

        assert!(progress.should_skip());
        assert_eq!(progress.finish(), Status::Failed);
    }

    #[test]
    fn pending_and_undefined_skip_the_rest() {
        for outcome in [Outcome::Pending(None), Outcome::Undefined] {
            let mut progress = Progress::new();
            progress.record(&outcome);

            assert!(progress.should_skip(), "{outcome:?}");
            assert_eq!(progress.finish(), Status::Pending, "{outcome:?}");
        }
    }

    #[test]
    fn ambiguous_marks_pending_without_skipping() {
        let mut progress = Progress::new();
        progress.record(&Outcome::Ambiguous(AmbiguousMatch {
            possible_matches: Vec::new(),
        }));

        assert!(!progress.should_skip());
        assert_eq!(progress.finish(), Status::Pending);
    }

    #[test]
    fn failure_outweighs_pending() {
        let mut progress = Progress::new();
        progress.record(&Outcome::Pending(Some("later".into())));
        progress.record(&failed());

        assert_eq!(progress.finish(), Status::Failed);
    }

    #[test]
    fn terminal_status_is_final() {
        let mut progress = Progress::new();
        progress.record(&Outcome::Passed);
        assert_eq!(progress.finish(), Status::Passed);

        progress.record(&failed());
        assert_eq!(progress.status(), Status::Passed);
        assert_eq!(progress.finish(), Status::Passed);
        assert!(!progress.should_skip());
    }

    #[test]
    fn summary_counts_terminal_statuses_only() {
        let mut summary = RunSummary::new();
        summary.record(Status::Passed);
        summary.record(Status::Passed);
        summary.record(Status::Failed);
        summary.record(Status::Pending);
        summary.record(Status::Running);
        summary.record(Status::NotStarted);

        assert_eq!(summary.scenarios(), 4);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.pending, 1);
        assert!(!summary.run_passed());
        assert!(summary.has_pending());
    }

    #[test]
    fn run_passes_iff_no_scenario_failed() {
        let mut summary = RunSummary::new();
        summary.record(Status::Passed);
        summary.record(Status::Pending);

        assert!(summary.run_passed());
        assert!(summary.has_pending());
    }
}
