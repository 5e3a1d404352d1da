//! Durations of [`Feature`]s and [`Scenario`]s.
//!
//! [`Feature`]: gherkin::Feature
//! [`Scenario`]: gherkin::Scenario

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use crate::event::{self, Source};

/// Source of durations for the `time` attributes of a report.
///
/// Every event is shown to [`Durations::observe()`] before the writer handles
/// it, so implementors may measure the durations themselves. A [`None`]
/// duration omits the `time` attribute.
pub trait Durations {
    /// Observes the given event.
    fn observe(&mut self, event: &event::Suite) {
        _ = event;
    }

    /// Returns the duration of the given finished [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    fn scenario(
        &self,
        feature: &Source<gherkin::Feature>,
        scenario: &Source<gherkin::Scenario>,
    ) -> Option<Duration>;

    /// Returns the duration of the given finished [`Feature`].
    ///
    /// [`Feature`]: gherkin::Feature
    fn feature(&self, feature: &Source<gherkin::Feature>) -> Option<Duration>;
}

impl<T: Durations + ?Sized> Durations for Box<T> {
    fn observe(&mut self, event: &event::Suite) {
        (**self).observe(event);
    }

    fn scenario(
        &self,
        feature: &Source<gherkin::Feature>,
        scenario: &Source<gherkin::Scenario>,
    ) -> Option<Duration> {
        (**self).scenario(feature, scenario)
    }

    fn feature(&self, feature: &Source<gherkin::Feature>) -> Option<Duration> {
        (**self).feature(feature)
    }
}

/// [`Durations`] not measuring anything, so no `time` attribute is emitted.
#[derive(Clone, Copy, Debug, Default)]
pub struct Untimed;

impl Durations for Untimed {
    fn scenario(
        &self,
        _: &Source<gherkin::Feature>,
        _: &Source<gherkin::Scenario>,
    ) -> Option<Duration> {
        None
    }

    fn feature(&self, _: &Source<gherkin::Feature>) -> Option<Duration> {
        None
    }
}

/// [`Durations`] measuring wall-clock time between the `Started` and the
/// `Finished` events of every [`Feature`] and [`Scenario`].
///
/// [`Feature`]: gherkin::Feature
/// [`Scenario`]: gherkin::Scenario
#[derive(Debug, Default)]
pub struct Stopwatch {
    /// Timings of [`Feature`]s of the current suite.
    ///
    /// [`Feature`]: gherkin::Feature
    features: HashMap<Source<gherkin::Feature>, Timing>,

    /// Timings of [`Scenario`]s of the current [`Feature`].
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Scenario`]: gherkin::Scenario
    scenarios: HashMap<Source<gherkin::Scenario>, Timing>,
}

/// Start of a measured node, and its duration once it has finished.
#[derive(Clone, Copy, Debug)]
struct Timing {
    started: Instant,
    elapsed: Option<Duration>,
}

impl Timing {
    fn start() -> Self {
        Self { started: Instant::now(), elapsed: None }
    }

    fn stop(&mut self) {
        self.elapsed = Some(self.started.elapsed());
    }
}

impl Stopwatch {
    /// Creates a new [`Stopwatch`] without any measurement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Durations for Stopwatch {
    fn observe(&mut self, event: &event::Suite) {
        use event::{Feature, Scenario, Suite};

        match event {
            Suite::Started(_) => self.features.clear(),
            Suite::Feature(feat, Feature::Started) => {
                self.scenarios.clear();
                _ = self.features.insert(feat.clone(), Timing::start());
            }
            Suite::Feature(feat, Feature::Finished { .. }) => {
                if let Some(t) = self.features.get_mut(feat) {
                    t.stop();
                }
            }
            Suite::Feature(_, Feature::Scenario(sc, Scenario::Started)) => {
                _ = self.scenarios.insert(sc.clone(), Timing::start());
            }
            Suite::Feature(_, Feature::Scenario(sc, Scenario::Finished { .. })) => {
                if let Some(t) = self.scenarios.get_mut(sc) {
                    t.stop();
                }
            }
            Suite::Setup(_)
            | Suite::Finished { .. }
            | Suite::Feature(
                _,
                Feature::Setup(_)
                | Feature::Scenario(
                    _,
                    Scenario::Setup(_) | Scenario::StepSetup(..) | Scenario::Step(..),
                ),
            ) => {}
        }
    }

    fn scenario(
        &self,
        _: &Source<gherkin::Feature>,
        scenario: &Source<gherkin::Scenario>,
    ) -> Option<Duration> {
        self.scenarios.get(scenario)?.elapsed
    }

    fn feature(&self, feature: &Source<gherkin::Feature>) -> Option<Duration> {
        self.features.get(feature)?.elapsed
    }
}
