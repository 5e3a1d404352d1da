//! Per-feature [`Scenario`] statistics.
//!
//! [`Scenario`]: gherkin::Scenario

use crate::event::{self, ResultCode};

/// Numbers of [`Scenario`]s per [`ResultCode`].
///
/// [`Scenario`]: gherkin::Scenario
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of passed [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub passed: usize,

    /// Number of skipped [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub skipped: usize,

    /// Number of pending [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub pending: usize,

    /// Number of [`Scenario`]s with undefined [`Step`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    /// [`Step`]: gherkin::Step
    pub undefined: usize,

    /// Number of failed [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub failed: usize,
}

impl Stats {
    /// Creates new [`Stats`] with all counts set to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { passed: 0, skipped: 0, pending: 0, undefined: 0, failed: 0 }
    }

    /// Returns total number of [`Scenario`]s these [`Stats`] have been
    /// collected for.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.skipped + self.pending + self.undefined + self.failed
    }

    /// Number of [`Scenario`]s reported as JUnit `errors`: the pending and the
    /// undefined ones.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub const fn errors(&self) -> usize {
        self.pending + self.undefined
    }

    /// Counts one more [`Scenario`] with the given [`ResultCode`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub fn record(&mut self, result: ResultCode) {
        let counter = match result {
            ResultCode::Passed => &mut self.passed,
            ResultCode::Skipped => &mut self.skipped,
            ResultCode::Pending => &mut self.pending,
            ResultCode::Undefined => &mut self.undefined,
            ResultCode::Failed => &mut self.failed,
        };
        *counter += 1;
    }
}

/// Source of [`Scenario`] counts of the current [`Feature`].
///
/// The JUnit writer only reads the counts when a [`Feature`] finishes. Every
/// event is shown to [`Statistics::observe()`] before the writer handles it,
/// so implementors may collect the counts themselves.
///
/// [`Feature`]: gherkin::Feature
/// [`Scenario`]: gherkin::Scenario
pub trait Statistics {
    /// Observes the given event.
    fn observe(&mut self, event: &event::Suite) {
        _ = event;
    }

    /// Returns [`Stats`] of the [`Feature`] being currently executed.
    ///
    /// [`Feature`]: gherkin::Feature
    fn scenario_stats(&self) -> Stats;
}

impl<T: Statistics + ?Sized> Statistics for Box<T> {
    fn observe(&mut self, event: &event::Suite) {
        (**self).observe(event);
    }

    fn scenario_stats(&self) -> Stats {
        (**self).scenario_stats()
    }
}

/// [`Statistics`] counting finished [`Scenario`]s, reset whenever a new
/// [`Feature`] starts.
///
/// [`Feature`]: gherkin::Feature
/// [`Scenario`]: gherkin::Scenario
#[derive(Clone, Copy, Debug, Default)]
pub struct ScenarioTally(Stats);

impl ScenarioTally {
    /// Creates a new [`ScenarioTally`] with all counts set to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self(Stats::new())
    }
}

impl Statistics for ScenarioTally {
    fn observe(&mut self, event: &event::Suite) {
        use event::{Feature, Scenario, Suite};

        match event {
            Suite::Feature(_, Feature::Started) => self.0 = Stats::new(),
            Suite::Feature(_, Feature::Scenario(_, Scenario::Finished { result, .. })) => {
                self.0.record(*result);
            }
            _ => {}
        }
    }

    fn scenario_stats(&self) -> Stats {
        self.0
    }
}
