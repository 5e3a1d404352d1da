//! Scenario-level events.

use super::{Hooks, ResultCode, Source, StepOutcome};

/// Event specific to a particular [Scenario] or an [Example] of a
/// [Scenario Outline].
///
/// [Example]: https://cucumber.io/docs/gherkin/reference#examples
/// [Scenario]: https://cucumber.io/docs/gherkin/reference#example
/// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
#[derive(Clone, Debug)]
pub enum Scenario {
    /// [`Scenario`] execution being started.
    ///
    /// [`Scenario`]: gherkin::Scenario
    Started,

    /// [`Scenario`] setup hooks have been run.
    ///
    /// [`Scenario`]: gherkin::Scenario
    Setup(Hooks),

    /// Setup hooks of a [`Step`] have been run.
    ///
    /// [`Step`]: gherkin::Step
    StepSetup(Source<gherkin::Step>, Hooks),

    /// [`Step`] has been executed, and its teardown hooks have been run.
    ///
    /// [`Step`]: gherkin::Step
    Step(Source<gherkin::Step>, StepOutcome, Hooks),

    /// [`Scenario`] execution being finished.
    ///
    /// [`Scenario`]: gherkin::Scenario
    Finished {
        /// [Scenario Outline] this [`Scenario`] is an example of, if any.
        ///
        /// [`Scenario`]: gherkin::Scenario
        /// [Scenario Outline]: https://cucumber.io/docs/gherkin/reference#scenario-outline
        outline: Option<Source<gherkin::Scenario>>,

        /// Overall [`ResultCode`] of the [`Scenario`].
        ///
        /// [`Scenario`]: gherkin::Scenario
        result: ResultCode,

        /// Results of the [`Scenario`] teardown hooks.
        ///
        /// [`Scenario`]: gherkin::Scenario
        teardown: Hooks,
    },
}

impl Scenario {
    /// Constructs an event of a [`Step`] being executed without any teardown
    /// hooks.
    ///
    /// [`Step`]: gherkin::Step
    #[must_use]
    pub fn step(step: impl Into<Source<gherkin::Step>>, outcome: StepOutcome) -> Self {
        Self::Step(step.into(), outcome, Hooks::none())
    }

    /// Constructs an event of a regular (non-outline) [`Scenario`] being
    /// finished without any teardown hooks.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub const fn finished(result: ResultCode) -> Self {
        Self::Finished { outline: None, result, teardown: Hooks::none() }
    }

    /// Constructs an event of an example of the given `outline` being finished
    /// without any teardown hooks.
    #[must_use]
    pub fn example_finished(
        outline: impl Into<Source<gherkin::Scenario>>,
        result: ResultCode,
    ) -> Self {
        Self::Finished {
            outline: Some(outline.into()),
            result,
            teardown: Hooks::none(),
        }
    }
}
