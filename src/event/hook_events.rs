//! Setup and teardown hook results.

use super::{Info, Source};

/// Single setup or teardown hook call executed around a suite, a feature, a
/// scenario or a step.
#[derive(Clone, Debug)]
pub struct HookCall {
    /// Name of the hook callee, as shown in reports.
    pub name: String,

    /// [`Step`] the hook was scoped to, for step-level hooks.
    ///
    /// [`Step`]: gherkin::Step
    pub step: Option<Source<gherkin::Step>>,

    /// Captured failure, if the hook raised one.
    pub error: Option<Info>,
}

impl HookCall {
    /// Creates a successful [`HookCall`].
    #[must_use]
    pub fn passed(name: impl Into<String>) -> Self {
        Self { name: name.into(), step: None, error: None }
    }

    /// Creates a failed [`HookCall`].
    #[must_use]
    pub fn failed(name: impl Into<String>, error: Info) -> Self {
        Self { name: name.into(), step: None, error: Some(error) }
    }

    /// Scopes this [`HookCall`] to the given [`Step`].
    ///
    /// [`Step`]: gherkin::Step
    #[must_use]
    pub fn on_step(mut self, step: Source<gherkin::Step>) -> Self {
        self.step = Some(step);
        self
    }

    /// Indicates whether this [`HookCall`] has failed.
    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Results of all the hooks executed at a single setup or teardown point.
#[derive(Clone, Debug, Default)]
pub struct Hooks(pub Vec<HookCall>);

impl Hooks {
    /// Creates an empty (and so successful) [`Hooks`] result.
    #[must_use]
    pub const fn none() -> Self {
        Self(Vec::new())
    }

    /// Indicates whether any of the hook calls has failed.
    #[must_use]
    pub fn has_failed(&self) -> bool {
        self.0.iter().any(HookCall::has_failed)
    }

    /// Iterates over the failed hook calls only.
    pub fn failures(&self) -> impl Iterator<Item = &HookCall> {
        self.0.iter().filter(|call| call.has_failed())
    }

    /// Returns [`Some`] with these [`Hooks`] if any of them failed, or [`None`]
    /// otherwise.
    #[must_use]
    pub fn into_failed(self) -> Option<Self> {
        self.has_failed().then_some(self)
    }
}

impl From<Vec<HookCall>> for Hooks {
    fn from(calls: Vec<HookCall>) -> Self {
        Self(calls)
    }
}

impl FromIterator<HookCall> for Hooks {
    fn from_iter<I: IntoIterator<Item = HookCall>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
