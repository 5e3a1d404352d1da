//! Buffering of [`Scenario`] notifications until the [`Scenario`] finishes.
//!
//! Hooks and steps report their results as they go, but a `<testcase>` can
//! only be created once its [`Scenario`] is finished. [`EventAccumulator`]
//! keeps everything in between and renders the children of the `<testcase>`
//! in a fixed order, regardless of the order the notifications arrived in.
//!
//! [`Scenario`]: gherkin::Scenario

use std::collections::BTreeMap;

use crate::{
    event::{HookCall, Hooks, ResultCode, Source, StepOutcome},
    report::{Node, NodeKind},
    writer::Presenter,
};

/// Message of the node marking a skipped [`Scenario`].
///
/// [`Scenario`]: gherkin::Scenario
const SKIPPED_MESSAGE: &str = "Scenario skipped";

/// Notifications of a [`Step`] buffered until its [`Scenario`] finishes.
///
/// [`Scenario`]: gherkin::Scenario
/// [`Step`]: gherkin::Step
#[derive(Debug, Default)]
struct PendingStep {
    /// Failed setup hooks of the [`Step`].
    ///
    /// [`Step`]: gherkin::Step
    setup: Option<Hooks>,

    /// Result of the [`Step`] along with its teardown hooks.
    ///
    /// [`Step`]: gherkin::Step
    completed: Option<(Source<gherkin::Step>, StepOutcome, Hooks)>,
}

/// Accumulator of setup, step and teardown notifications, flushed into
/// `<testcase>` children once a [`Scenario`] finishes.
///
/// A suite or feature setup failure has no `<testcase>` of its own, so it's
/// attributed to the first [`Scenario`] flushed after it.
///
/// [`Scenario`]: gherkin::Scenario
#[derive(Debug, Default)]
pub struct EventAccumulator {
    /// Failed suite setup, not yet attributed to any [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    suite_setup: Option<Hooks>,

    /// Failed feature setup, not yet attributed to any [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    feature_setup: Option<Hooks>,

    /// Failed setup of the current [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    scenario_setup: Option<Hooks>,

    /// [`PendingStep`]s of the current [`Scenario`] by their line.
    ///
    /// [`Scenario`]: gherkin::Scenario
    steps: BTreeMap<usize, PendingStep>,
}

impl EventAccumulator {
    /// Creates a new empty [`EventAccumulator`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the suite setup, if it has failed.
    pub fn suite_setup(&mut self, hooks: Hooks) {
        self.suite_setup = hooks.into_failed();
    }

    /// Records the feature setup, if it has failed.
    pub fn feature_setup(&mut self, hooks: Hooks) {
        self.feature_setup = hooks.into_failed();
    }

    /// Records the setup of the current [`Scenario`], if it has failed.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub fn scenario_setup(&mut self, hooks: Hooks) {
        self.scenario_setup = hooks.into_failed();
    }

    /// Records the setup of the given [`Step`], if it has failed.
    ///
    /// [`Step`]: gherkin::Step
    pub fn step_setup(&mut self, step: &Source<gherkin::Step>, hooks: Hooks) {
        if let Some(hooks) = hooks.into_failed() {
            self.steps.entry(step.position.line).or_default().setup = Some(hooks);
        }
    }

    /// Records the result of the given [`Step`] along with its teardown.
    ///
    /// [`Step`]: gherkin::Step
    pub fn step(&mut self, step: Source<gherkin::Step>, outcome: StepOutcome, teardown: Hooks) {
        let line = step.position.line;
        self.steps.entry(line).or_default().completed = Some((step, outcome, teardown));
    }

    /// Forgets the feature setup failure not attributed to any [`Scenario`].
    ///
    /// Returns whether there was one.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub fn discard_feature_setup(&mut self) -> bool {
        self.feature_setup.take().is_some()
    }

    /// Forgets all the setup failures not attributed to any [`Scenario`].
    ///
    /// Returns whether there were any.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub fn discard_pending(&mut self) -> bool {
        let suite = self.suite_setup.take().is_some();
        let feature = self.discard_feature_setup();
        self.clear_scenario();
        suite || feature
    }

    /// Renders the children of the `<testcase>` of the just finished
    /// [`Scenario`] and clears the buffers of the [`Scenario`].
    ///
    /// The order is:
    /// 1. suite setup failures;
    /// 2. feature setup failures;
    /// 3. scenario setup failures;
    /// 4. for each step, by its line: setup failures, result, teardown
    ///    failures;
    /// 5. `<skipped>` marker, if the [`Scenario`] is skipped;
    /// 6. scenario teardown failures.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub fn flush(
        &mut self,
        result: ResultCode,
        teardown: &Hooks,
        presenter: &impl Presenter,
    ) -> Vec<Node> {
        let mut nodes = Vec::new();

        for hooks in [self.suite_setup.take(), self.feature_setup.take(), self.scenario_setup.take()]
            .into_iter()
            .flatten()
        {
            nodes.extend(hook_nodes(&hooks, presenter));
        }

        for (_, PendingStep { setup, completed }) in std::mem::take(&mut self.steps) {
            if let Some(setup) = setup {
                nodes.extend(hook_nodes(&setup, presenter));
            }
            if let Some((step, outcome, teardown)) = completed {
                nodes.extend(step_node(&step, &outcome, presenter));
                nodes.extend(hook_nodes(&teardown, presenter));
            }
        }

        if result == ResultCode::Skipped {
            nodes.push(Node::new(NodeKind::Skipped, SKIPPED_MESSAGE));
        }
        nodes.extend(hook_nodes(teardown, presenter));

        nodes
    }

    fn clear_scenario(&mut self) {
        self.scenario_setup = None;
        self.steps.clear();
    }
}

/// Renders a `<failure>` for every failed call of the given `hooks`.
pub fn hook_nodes<'h>(
    hooks: &'h Hooks,
    presenter: &'h impl Presenter,
) -> impl Iterator<Item = Node> + 'h {
    hooks.failures().map(|call| {
        Node::new(NodeKind::Failure, hook_message(call))
            .with_body(call.error.as_ref().map(|e| presenter.present(e)))
    })
}

/// Renders the node of a [`Step`] result, unless it has passed or has been
/// skipped.
///
/// [`Step`]: gherkin::Step
fn step_node(
    step: &gherkin::Step,
    outcome: &StepOutcome,
    presenter: &impl Presenter,
) -> Option<Node> {
    let kind = outcome.result.node_kind()?;
    let message = format!("[L {}] {}", step.position.line, step_title(step));
    Some(Node::new(kind, message).with_body(outcome.error.as_ref().map(|e| presenter.present(e))))
}

/// Message of a failed hook call: its name, followed by the [`Step`] it ran
/// around, if any.
///
/// [`Step`]: gherkin::Step
fn hook_message(call: &HookCall) -> String {
    match &call.step {
        Some(step) => format!("{}: {}", call.name, step_title(step)),
        None => call.name.clone(),
    }
}

/// [`Step`] keyword followed by its text.
///
/// [`Step`]: gherkin::Step
fn step_title(step: &gherkin::Step) -> String {
    format!("{} {}", step.keyword.trim(), step.value.trim())
        .trim()
        .to_owned()
}
