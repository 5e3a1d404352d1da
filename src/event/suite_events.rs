//! Top-level suite events.

use super::{Feature, Hooks, Scenario, Source};

/// Description of a test suite: one complete run of the runner, producing one
/// report file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuiteInfo {
    /// Name of the suite.
    pub name: String,
}

impl SuiteInfo {
    /// Creates a new [`SuiteInfo`] with the given `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Top-level suite event.
#[derive(Clone, Debug)]
pub enum Suite {
    /// Suite execution being started.
    Started(Source<SuiteInfo>),

    /// Suite setup hooks have been run.
    Setup(Hooks),

    /// [`Feature`] event.
    Feature(Source<gherkin::Feature>, Feature),

    /// Suite execution being finished.
    Finished {
        /// Results of the suite teardown hooks.
        teardown: Hooks,
    },
}

impl Suite {
    /// Constructs an event of a suite with the given `name` being started.
    #[must_use]
    pub fn started(name: impl Into<String>) -> Self {
        Self::Started(Source::new(SuiteInfo::new(name)))
    }

    /// Constructs an event of a suite being finished without any teardown
    /// hooks.
    #[must_use]
    pub const fn finished() -> Self {
        Self::Finished { teardown: Hooks::none() }
    }

    /// Constructs an event of a [`Feature`] being started.
    ///
    /// [`Feature`]: gherkin::Feature
    #[must_use]
    pub fn feature_started(feat: impl Into<Source<gherkin::Feature>>) -> Self {
        Self::Feature(feat.into(), Feature::Started)
    }

    /// Constructs a [`Suite`] event from the given [`Scenario`] event.
    #[must_use]
    pub fn scenario(
        feat: impl Into<Source<gherkin::Feature>>,
        scenario: impl Into<Source<gherkin::Scenario>>,
        event: Scenario,
    ) -> Self {
        Self::Feature(feat.into(), Feature::Scenario(scenario.into(), event))
    }

    /// Short name of this event's kind, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Started(_) => "suite started",
            Self::Setup(_) => "suite setup",
            Self::Feature(_, ev) => match ev {
                Feature::Started => "feature started",
                Feature::Setup(_) => "feature setup",
                Feature::Scenario(_, ev) => match ev {
                    Scenario::Started => "scenario started",
                    Scenario::Setup(_) => "scenario setup",
                    Scenario::StepSetup(..) => "step setup",
                    Scenario::Step(..) => "step finished",
                    Scenario::Finished { .. } => "scenario finished",
                },
                Feature::Finished { .. } => "feature finished",
            },
            Self::Finished { .. } => "suite finished",
        }
    }
}
