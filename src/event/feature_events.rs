//! Feature-level events.

use super::{Hooks, ResultCode, Scenario, Source};

/// Event specific to a particular [Feature].
///
/// [Feature]: https://cucumber.io/docs/gherkin/reference#feature
#[derive(Clone, Debug)]
pub enum Feature {
    /// [`Feature`] execution being started.
    ///
    /// [`Feature`]: gherkin::Feature
    Started,

    /// [`Feature`] setup hooks have been run.
    ///
    /// [`Feature`]: gherkin::Feature
    Setup(Hooks),

    /// [`Scenario`] event.
    Scenario(Source<gherkin::Scenario>, Scenario),

    /// [`Feature`] execution being finished.
    ///
    /// [`Feature`]: gherkin::Feature
    Finished {
        /// Overall [`ResultCode`] of the [`Feature`].
        ///
        /// [`Feature`]: gherkin::Feature
        result: ResultCode,

        /// Results of the [`Feature`] teardown hooks.
        ///
        /// [`Feature`]: gherkin::Feature
        teardown: Hooks,
    },
}

impl Feature {
    /// Constructs an event of a [`Feature`] being finished without any
    /// teardown hooks.
    ///
    /// [`Feature`]: gherkin::Feature
    #[must_use]
    pub const fn finished(result: ResultCode) -> Self {
        Self::Finished { result, teardown: Hooks::none() }
    }
}
