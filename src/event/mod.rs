// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Lifecycle notifications delivered by the host runner.
//!
//! The top-level enum here is [`Suite`]. Each event enum contains variants
//! indicating what stage of execution the runner is at, and variants with
//! detailed content about the precise sub-event.
//!
//! Events are delivered in a happened-before order: a [`Feature`] is always
//! `Started` before any of its [`Scenario`]s, and every [`Scenario`] is
//! `Finished` before its [`Feature`] is.

pub mod feature_events;
pub mod hook_events;
pub mod scenario_events;
pub mod source;
pub mod step_events;
pub mod suite_events;

pub use feature_events::Feature;
pub use hook_events::{HookCall, Hooks};
pub use scenario_events::Scenario;
pub use source::Source;
pub use step_events::{ResultCode, StepOutcome};
pub use suite_events::{Suite, SuiteInfo};

/// Alias for a [`catch_unwind()`] error, carrying the failure of a step or a
/// hook.
///
/// [`catch_unwind()`]: std::panic::catch_unwind()
pub type Info = std::sync::Arc<dyn std::any::Any + Send + Sync + 'static>;
