//! Step-level results.

use derive_more::with_trait::Display;

use super::Info;

/// Outcome code of a [`Step`], a [`Scenario`] or a [`Feature`].
///
/// [`Feature`]: gherkin::Feature
/// [`Scenario`]: gherkin::Scenario
/// [`Step`]: gherkin::Step
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ResultCode {
    /// Everything went fine.
    #[display("passed")]
    Passed,

    /// Execution was skipped, e.g. because a previous step failed.
    #[display("skipped")]
    Skipped,

    /// Step definition exists, but isn't implemented yet.
    #[display("pending")]
    Pending,

    /// No step definition matches.
    #[display("undefined")]
    Undefined,

    /// Execution failed.
    #[display("failed")]
    Failed,
}

impl ResultCode {
    /// Name of the JUnit testcase child node reporting this outcome, if any.
    ///
    /// [`Pending`] and [`Undefined`] steps are reported as `error`s, [`Failed`]
    /// ones as `failure`s, while [`Passed`] and [`Skipped`] ones aren't
    /// reported at all.
    ///
    /// [`Failed`]: ResultCode::Failed
    /// [`Passed`]: ResultCode::Passed
    /// [`Pending`]: ResultCode::Pending
    /// [`Skipped`]: ResultCode::Skipped
    /// [`Undefined`]: ResultCode::Undefined
    #[must_use]
    pub const fn node_kind(self) -> Option<crate::report::NodeKind> {
        use crate::report::NodeKind;

        match self {
            Self::Passed | Self::Skipped => None,
            Self::Pending | Self::Undefined => Some(NodeKind::Error),
            Self::Failed => Some(NodeKind::Failure),
        }
    }
}

/// Result of executing a single [`Step`].
///
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug)]
pub struct StepOutcome {
    /// [`ResultCode`] of the [`Step`].
    ///
    /// [`Step`]: gherkin::Step
    pub result: ResultCode,

    /// Captured failure, if the [`Step`] raised one.
    ///
    /// [`Step`]: gherkin::Step
    pub error: Option<Info>,
}

impl StepOutcome {
    /// Creates a [`StepOutcome`] without any captured failure.
    #[must_use]
    pub const fn new(result: ResultCode) -> Self {
        Self { result, error: None }
    }

    /// Creates a [`ResultCode::Passed`] [`StepOutcome`].
    #[must_use]
    pub const fn passed() -> Self {
        Self::new(ResultCode::Passed)
    }

    /// Creates a [`ResultCode::Failed`] [`StepOutcome`] carrying the given
    /// captured failure.
    #[must_use]
    pub fn failed(error: Info) -> Self {
        Self { result: ResultCode::Failed, error: Some(error) }
    }

    /// Attaches the given captured failure to this [`StepOutcome`].
    #[must_use]
    pub fn with_error(mut self, error: Info) -> Self {
        self.error = Some(error);
        self
    }
}
