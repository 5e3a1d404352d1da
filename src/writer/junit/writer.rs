//! Main JUnit XML writer implementation.

use std::time::Duration;

use crate::{
    event::{self, Hooks, ResultCode, Source},
    report::{Report, SuiteHandle},
    writer::{
        Durations, PanicPresenter, Presenter, ScenarioTally, Statistics, Untimed,
        output::ReportWriter,
    },
    Error, Result, Writer,
};

use super::{
    accumulator::{hook_nodes, EventAccumulator},
    cli::Config,
    naming::{collapse_title, OutlineNamer},
};

/// [JUnit XML report][1] [`Writer`] implementation, writing a file per suite
/// with a `<testsuite>` per [`Feature`] and a `<testcase>` per [`Scenario`].
///
/// # Ordering
///
/// Events must be delivered in the happened-before order of the runner:
/// [`Feature`]s of a suite one by one, and [`Scenario`]s of a [`Feature`]
/// one by one, each finished before the next one or the [`Feature`] footer.
/// Any other order is rejected with an [`Error::Ordering`].
///
/// [`Feature`]: gherkin::Feature
/// [`Scenario`]: gherkin::Scenario
/// [1]: https://llg.cubic.org/docs/junit
#[derive(Debug)]
pub struct JUnit<S = ScenarioTally, D = Untimed, P = PanicPresenter> {
    /// [`Config`] of this [`Writer`].
    config: Config,

    /// Provider of [`Scenario`] counts per [`Feature`].
    ///
    /// [`Feature`]: gherkin::Feature
    /// [`Scenario`]: gherkin::Scenario
    stats: S,

    /// Provider of durations.
    durations: D,

    /// Renderer of captured failures.
    presenter: P,

    /// Currently running suite, if any.
    run: Option<Run>,

    /// Buffered notifications of the current [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    accumulator: EventAccumulator,

    /// Namer of `Scenario Outline` examples.
    namer: OutlineNamer,
}

/// Report of a running suite.
#[derive(Debug)]
struct Run {
    /// Document being built.
    report: Report,

    /// Destination of the [`Run::report`].
    output: ReportWriter,

    /// Currently open [`Feature`], if any.
    ///
    /// [`Feature`]: gherkin::Feature
    feature: Option<OpenFeature>,
}

/// [`Feature`] whose `<testsuite>` is open.
///
/// [`Feature`]: gherkin::Feature
#[derive(Debug)]
struct OpenFeature {
    /// The [`Feature`] itself.
    ///
    /// [`Feature`]: gherkin::Feature
    source: Source<gherkin::Feature>,

    /// Its `<testsuite>`.
    suite: SuiteHandle,

    /// Normalized path of the [`Feature`] file, naming the `<testsuite>` and
    /// its `<testcase>` classes.
    ///
    /// [`Feature`]: gherkin::Feature
    name: String,

    /// [`Scenario`] being run, from its first event till its `Finished` one.
    ///
    /// [`Scenario`]: gherkin::Scenario
    scenario: Option<Source<gherkin::Scenario>>,
}

impl JUnit {
    /// Creates a new [`JUnit`] [`Writer`] counting [`Scenario`]s itself, not
    /// measuring durations and presenting failures as panic messages.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn new(config: impl Into<Config>) -> Self {
        Self::with_collaborators(config, ScenarioTally::new(), Untimed, PanicPresenter)
    }
}

impl<S, D, P> JUnit<S, D, P>
where
    S: Statistics,
    D: Durations,
    P: Presenter,
{
    /// Creates a new [`JUnit`] [`Writer`] with the given collaborators.
    #[must_use]
    pub fn with_collaborators(
        config: impl Into<Config>,
        stats: S,
        durations: D,
        presenter: P,
    ) -> Self {
        Self {
            config: config.into(),
            stats,
            durations,
            presenter,
            run: None,
            accumulator: EventAccumulator::new(),
            namer: OutlineNamer::new(),
        }
    }

    /// Replaces the [`Statistics`] provider.
    #[must_use]
    pub fn with_statistics<T: Statistics>(self, stats: T) -> JUnit<T, D, P> {
        JUnit::with_collaborators(self.config, stats, self.durations, self.presenter)
    }

    /// Replaces the [`Durations`] provider.
    #[must_use]
    pub fn with_durations<T: Durations>(self, durations: T) -> JUnit<S, T, P> {
        JUnit::with_collaborators(self.config, self.stats, durations, self.presenter)
    }

    /// Replaces the [`Presenter`].
    #[must_use]
    pub fn with_presenter<T: Presenter>(self, presenter: T) -> JUnit<S, D, T> {
        JUnit::with_collaborators(self.config, self.stats, self.durations, presenter)
    }

    /// Returns the [`Config`] of this [`Writer`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the [`Report`] of the currently running suite, if any.
    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.run.as_ref().map(|r| &r.report)
    }

    /// Describes the current state, for [`Error::Ordering`]s.
    const fn state(&self) -> &'static str {
        match &self.run {
            None => "no suite is running",
            Some(Run { feature: None, .. }) => "no feature is open",
            Some(Run { feature: Some(OpenFeature { scenario: None, .. }), .. }) => {
                "a feature is open"
            }
            Some(Run { feature: Some(_), .. }) => "a scenario is open",
        }
    }

    /// Checks whether the given `event` may happen in the current state.
    fn accepts(&self, event: &event::Suite) -> bool {
        use event::{Feature, Suite};

        match (&self.run, event) {
            (None, Suite::Started(_)) => true,
            (None, _) | (Some(_), Suite::Started(_)) => false,
            (Some(Run { feature: None, .. }), ev) => matches!(
                ev,
                Suite::Setup(_) | Suite::Finished { .. } | Suite::Feature(_, Feature::Started),
            ),
            (Some(Run { feature: Some(open), .. }), Suite::Feature(feat, ev))
                if open.source == *feat =>
            {
                match ev {
                    Feature::Started => false,
                    Feature::Scenario(sc, _) => {
                        open.scenario.as_ref().map_or(true, |cur| cur == sc)
                    }
                    Feature::Setup(_) | Feature::Finished { .. } => open.scenario.is_none(),
                }
            }
            (Some(_), _) => false,
        }
    }

    fn ordering_error(&self, event: &event::Suite) -> Error {
        Error::Ordering { event: event.kind(), state: self.state() }
    }

    fn handle_suite_started(&mut self, info: &event::SuiteInfo) {
        let Config { output, prefix, suffix, .. } = &self.config;
        let writer = ReportWriter::open(output.clone(), &info.name, prefix, suffix);
        let report = Report::new(
            Some(info.name.clone()),
            std::iter::empty::<(String, Option<String>)>(),
        );

        self.accumulator = EventAccumulator::new();
        self.namer.reset();
        self.run = Some(Run { report, output: writer, feature: None });
    }

    fn handle_feature_started(run: &mut Run, feat: Source<gherkin::Feature>, config: &Config) {
        let name = feat.path.as_deref().map_or_else(
            || feat.name.clone(),
            |p| config.paths.strip(&p.to_string_lossy()).to_owned(),
        );
        let suite = run.report.open_testsuite(std::iter::empty::<(String, Option<String>)>());
        run.feature = Some(OpenFeature { source: feat, suite, name, scenario: None });
    }

    fn handle_scenario_finished(
        &mut self,
        scenario: &Source<gherkin::Scenario>,
        outline: Option<&Source<gherkin::Scenario>>,
        result: ResultCode,
        teardown: &Hooks,
    ) {
        let nodes = self.accumulator.flush(result, teardown, &self.presenter);
        let name = match outline {
            Some(outline) => self.namer.next_example(outline),
            None => collapse_title(&scenario.name),
        };

        let Some(Run { report, feature: Some(feat), .. }) = &mut self.run else {
            return;
        };

        if nodes.is_empty() && !self.config.success {
            tracing::trace!(scenario = %name, "omitted successful scenario");
            return;
        }

        let time = self.durations.scenario(&feat.source, scenario);
        let case = report.open_testcase(
            feat.suite,
            [
                ("name", Some(name.clone())),
                ("classname", Some(feat.name.clone())),
                ("time", time.map(format_time)),
            ],
        );
        tracing::trace!(scenario = %name, %result, children = nodes.len(), "flushed scenario");
        for node in nodes {
            report.append_child(case, node);
        }
    }

    fn handle_feature_finished(&mut self, teardown: &Hooks) -> Result<()> {
        if self.accumulator.discard_feature_setup() {
            tracing::warn!("feature setup failed with no scenario to report it on");
        }
        self.append_teardown(teardown, "feature");

        let Some(run) = &mut self.run else {
            return Ok(());
        };
        let Some(feat) = run.feature.take() else {
            return Ok(());
        };

        let stats = self.stats.scenario_stats();
        let time = self.durations.feature(&feat.source);
        run.report.set_testsuite_attrs(
            feat.suite,
            [
                ("name", Some(feat.name)),
                ("tests", Some(stats.total().to_string())),
                ("skipped", Some(stats.skipped.to_string())),
                ("failures", Some(stats.failed.to_string())),
                ("errors", Some(stats.errors().to_string())),
                ("time", time.map(format_time)),
            ],
        );

        run.output.flush(&run.report)
    }

    fn handle_suite_finished(&mut self, teardown: &Hooks) -> Result<()> {
        if self.accumulator.discard_pending() {
            tracing::warn!("suite setup failed with no scenario to report it on");
        }
        self.append_teardown(teardown, "suite");

        match self.run.take() {
            Some(run) => run.output.flush(&run.report),
            None => Ok(()),
        }
    }

    /// Appends the failed `teardown` hooks to the last `<testcase>` of the
    /// running suite.
    fn append_teardown(&mut self, teardown: &Hooks, of: &str) {
        if !teardown.has_failed() {
            return;
        }
        let Some(run) = &mut self.run else {
            return;
        };
        let Some(case) = run.report.last_testcase() else {
            tracing::warn!("{of} teardown failed with no testcase to report it on");
            return;
        };
        for node in hook_nodes(teardown, &self.presenter) {
            run.report.append_child(case, node);
        }
    }
}

impl<S, D, P> Writer for JUnit<S, D, P>
where
    S: Statistics,
    D: Durations,
    P: Presenter,
{
    fn handle_event(&mut self, event: event::Suite) -> Result<()> {
        use event::{Feature, Scenario, Suite};

        if !self.accepts(&event) {
            return Err(self.ordering_error(&event));
        }

        self.stats.observe(&event);
        self.durations.observe(&event);
        self.presenter.observe(&event);

        match event {
            Suite::Started(info) => self.handle_suite_started(&info),
            Suite::Setup(hooks) => self.accumulator.suite_setup(hooks),
            Suite::Feature(feat, ev) => match ev {
                Feature::Started => {
                    self.namer.reset();
                    if let Some(run) = &mut self.run {
                        Self::handle_feature_started(run, feat, &self.config);
                    }
                }
                Feature::Setup(hooks) => self.accumulator.feature_setup(hooks),
                Feature::Scenario(sc, ev) => {
                    if let Some(Run { feature: Some(open), .. }) = &mut self.run {
                        open.scenario =
                            (!matches!(ev, Scenario::Finished { .. })).then(|| sc.clone());
                    }
                    match ev {
                        Scenario::Started => {}
                        Scenario::Setup(hooks) => self.accumulator.scenario_setup(hooks),
                        Scenario::StepSetup(step, hooks) => {
                            self.accumulator.step_setup(&step, hooks);
                        }
                        Scenario::Step(step, outcome, teardown) => {
                            self.accumulator.step(step, outcome, teardown);
                        }
                        Scenario::Finished { outline, result, teardown } => {
                            self.handle_scenario_finished(
                                &sc,
                                outline.as_ref(),
                                result,
                                &teardown,
                            );
                        }
                    }
                }
                Feature::Finished { teardown, .. } => {
                    return self.handle_feature_finished(&teardown);
                }
            },
            Suite::Finished { teardown } => return self.handle_suite_finished(&teardown),
        }
        Ok(())
    }
}

/// Formats a `time` attribute as seconds with millisecond precision.
fn format_time(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::event::{HookCall, StepOutcome, Suite};

    struct Fixture {
        feature: Source<gherkin::Feature>,
        scenarios: Vec<Source<gherkin::Scenario>>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut feature = gherkin::Feature::parse(
                "Feature: Writer\n\
                 \n  Scenario: passes\n    Given ok\n\
                 \n  Scenario: fails\n    Given broken\n",
                gherkin::GherkinEnv::default(),
            )
            .expect("valid feature");
            feature.path = Some("/base/features/writer.feature".into());
            let scenarios = feature.scenarios.iter().cloned().map(Source::new).collect();
            Self { feature: Source::new(feature), scenarios }
        }

        fn step(&self, sc: usize) -> Source<gherkin::Step> {
            Source::new(self.scenarios[sc].steps[0].clone())
        }

        fn scenario(&self, sc: usize, ev: event::Scenario) -> Suite {
            Suite::scenario(self.feature.clone(), self.scenarios[sc].clone(), ev)
        }

        fn run_scenario(&self, sc: usize, outcome: StepOutcome) -> Vec<Suite> {
            let result = outcome.result;
            vec![
                self.scenario(sc, event::Scenario::Started),
                self.scenario(sc, event::Scenario::step(self.step(sc), outcome)),
                self.scenario(sc, event::Scenario::finished(result)),
            ]
        }
    }

    fn config() -> Config {
        Config::new().base_path("/base")
    }

    fn feed(writer: &mut JUnit, events: impl IntoIterator<Item = Suite>) {
        for ev in events {
            writer.handle_event(ev).unwrap();
        }
    }

    #[test]
    fn builds_testsuite_per_feature() {
        let fx = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let mut writer = JUnit::new(config().output(dir.path()));

        feed(&mut writer, [Suite::started("default"), Suite::feature_started(fx.feature.clone())]);
        feed(&mut writer, fx.run_scenario(0, StepOutcome::passed()));
        feed(&mut writer, fx.run_scenario(1, StepOutcome::failed(Arc::new("boom"))));
        feed(
            &mut writer,
            [Suite::Feature(fx.feature.clone(), event::Feature::finished(ResultCode::Failed))],
        );

        let report = writer.report().unwrap();
        let suite = &report.testsuites()[0];
        assert_eq!(suite.attrs.get("package"), Some("default"));
        assert_eq!(suite.attrs.get("name"), Some("features.writer"));
        assert_eq!(suite.attrs.get("tests"), Some("2"));
        assert_eq!(suite.attrs.get("failures"), Some("1"));
        assert_eq!(suite.attrs.get("skipped"), Some("0"));
        assert_eq!(suite.attrs.get("errors"), Some("0"));
        assert_eq!(suite.attrs.get("time"), None);

        let names: Vec<_> = suite.testcases.iter().map(|c| c.attrs.get("name")).collect();
        assert_eq!(names, [Some("passes"), Some("fails")]);
        assert_eq!(
            suite.testcases[1].attrs.get("classname"),
            Some("default.features.writer"),
        );
        assert!(suite.testcases[0].children.is_empty());
        assert_eq!(suite.testcases[1].children[0].message(), Some("[L 7] Given broken"));
    }

    #[test]
    fn omits_successes_when_configured() {
        let fx = Fixture::new();
        let mut writer = JUnit::new(config().success(false));

        feed(&mut writer, [Suite::started("default"), Suite::feature_started(fx.feature.clone())]);
        feed(&mut writer, fx.run_scenario(0, StepOutcome::passed()));
        feed(&mut writer, fx.run_scenario(1, StepOutcome::new(ResultCode::Pending)));

        let suite = &writer.report().unwrap().testsuites()[0];
        assert_eq!(suite.testcases.len(), 1);
        assert_eq!(suite.testcases[0].attrs.get("name"), Some("fails"));
    }

    #[test]
    fn attributes_suite_setup_to_first_scenario_only() {
        let fx = Fixture::new();
        let mut writer = JUnit::new(config());

        feed(
            &mut writer,
            [
                Suite::started("default"),
                Suite::Setup(Hooks::from(vec![HookCall::failed("boot", Arc::new("down"))])),
                Suite::feature_started(fx.feature.clone()),
            ],
        );
        feed(&mut writer, fx.run_scenario(0, StepOutcome::passed()));
        feed(&mut writer, fx.run_scenario(1, StepOutcome::passed()));

        let suite = &writer.report().unwrap().testsuites()[0];
        assert_eq!(suite.testcases[0].children.len(), 1);
        assert_eq!(suite.testcases[0].children[0].message(), Some("boot"));
        assert_eq!(suite.testcases[0].children[0].body.as_deref(), Some("down"));
        assert!(suite.testcases[1].children.is_empty());
    }

    #[test]
    fn attaches_teardown_failures_to_last_testcase() {
        let fx = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let mut writer = JUnit::new(config().output(dir.path()));
        let failed = |name: &str| Hooks::from(vec![HookCall::failed(name, Arc::new("x"))]);

        feed(&mut writer, [Suite::started("default"), Suite::feature_started(fx.feature.clone())]);
        feed(&mut writer, fx.run_scenario(0, StepOutcome::passed()));
        feed(
            &mut writer,
            [Suite::Feature(
                fx.feature.clone(),
                event::Feature::Finished {
                    result: ResultCode::Passed,
                    teardown: failed("after feature"),
                },
            )],
        );

        let case = &writer.report().unwrap().testsuites()[0].testcases[0];
        assert_eq!(case.children[0].message(), Some("after feature"));
    }

    #[test]
    fn rejects_out_of_order_events() {
        let fx = Fixture::new();
        let mut writer = JUnit::new(config());

        let err = writer.handle_event(Suite::feature_started(fx.feature.clone())).unwrap_err();
        assert!(err.is_ordering());
        assert_eq!(err.to_string(), "unexpected feature started event while no suite is running");

        writer.handle_event(Suite::started("default")).unwrap();
        let err = writer.handle_event(Suite::started("again")).unwrap_err();
        assert!(err.is_ordering());

        let err = writer
            .handle_event(fx.scenario(0, event::Scenario::Started))
            .unwrap_err();
        assert_eq!(err.to_string(), "unexpected scenario started event while no feature is open");

        writer.handle_event(Suite::feature_started(fx.feature.clone())).unwrap();
        let err = writer
            .handle_event(Suite::feature_started(fx.feature.clone()))
            .unwrap_err();
        assert_eq!(err.to_string(), "unexpected feature started event while a feature is open");

        let err = writer.handle_event(Suite::finished()).unwrap_err();
        assert!(err.is_ordering());
    }

    #[test]
    fn rejects_events_of_another_feature() {
        let fx = Fixture::new();
        let other = Fixture::new();
        let mut writer = JUnit::new(config());

        feed(&mut writer, [Suite::started("default"), Suite::feature_started(fx.feature.clone())]);

        let err = writer
            .handle_event(other.scenario(0, event::Scenario::Started))
            .unwrap_err();
        assert!(err.is_ordering());
    }

    #[test]
    fn rejects_feature_footer_while_scenario_runs() {
        let fx = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let mut writer = JUnit::new(config().output(dir.path()));
        let failed = |name: &str| Hooks::from(vec![HookCall::failed(name, Arc::new("x"))]);

        feed(
            &mut writer,
            [
                Suite::started("default"),
                Suite::feature_started(fx.feature.clone()),
                fx.scenario(1, event::Scenario::Setup(failed("before scenario"))),
                fx.scenario(
                    1,
                    event::Scenario::step(fx.step(1), StepOutcome::failed(Arc::new("boom"))),
                ),
            ],
        );

        let err = writer
            .handle_event(Suite::Feature(
                fx.feature.clone(),
                event::Feature::finished(ResultCode::Failed),
            ))
            .unwrap_err();
        assert!(err.is_ordering());
        assert_eq!(
            err.to_string(),
            "unexpected feature finished event while a scenario is open",
        );

        // The scenario is still open, so its buffers end up on its testcase.
        feed(&mut writer, [fx.scenario(1, event::Scenario::finished(ResultCode::Failed))]);
        feed(&mut writer, fx.run_scenario(0, StepOutcome::passed()));

        let suite = &writer.report().unwrap().testsuites()[0];
        let messages: Vec<_> =
            suite.testcases[0].children.iter().map(|n| n.message()).collect();
        assert_eq!(messages, [Some("before scenario"), Some("[L 7] Given broken")]);
        assert!(suite.testcases[1].children.is_empty());
    }

    #[test]
    fn rejects_events_of_another_scenario() {
        let fx = Fixture::new();
        let mut writer = JUnit::new(config());

        feed(
            &mut writer,
            [
                Suite::started("default"),
                Suite::feature_started(fx.feature.clone()),
                fx.scenario(0, event::Scenario::Started),
            ],
        );

        for ev in [
            event::Scenario::Started,
            event::Scenario::step(fx.step(1), StepOutcome::passed()),
            event::Scenario::finished(ResultCode::Passed),
        ] {
            let err = writer.handle_event(fx.scenario(1, ev)).unwrap_err();
            assert!(err.is_ordering());
            assert!(err.to_string().ends_with("while a scenario is open"));
        }
        let err = writer
            .handle_event(Suite::Feature(
                fx.feature.clone(),
                event::Feature::Setup(Hooks::none()),
            ))
            .unwrap_err();
        assert!(err.is_ordering());

        feed(&mut writer, [fx.scenario(0, event::Scenario::finished(ResultCode::Passed))]);
        feed(&mut writer, fx.run_scenario(1, StepOutcome::passed()));

        let names: Vec<_> = writer.report().unwrap().testsuites()[0]
            .testcases
            .iter()
            .map(|c| c.attrs.get("name"))
            .collect();
        assert_eq!(names, [Some("passes"), Some("fails")]);
    }

    #[test]
    fn formats_time_with_millis() {
        assert_eq!(format_time(Duration::from_millis(1500)), "1.500");
        assert_eq!(format_time(Duration::ZERO), "0.000");
    }
}
