// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for outputting [`Suite`] events.
//!
//! [`Suite`]: crate::event::Suite

pub mod duration;
pub mod junit;
pub mod output;
pub mod present;
pub mod stats;

use crate::{event, Result};

#[doc(inline)]
pub use self::{
    duration::{Durations, Stopwatch, Untimed},
    junit::JUnit,
    output::ReportWriter,
    present::{PanicPresenter, Presenter},
    stats::{ScenarioTally, Statistics, Stats},
};

/// Writer of [`Suite`] events to some output.
///
/// The runner produces events in a [happened-before] order, and a [`Writer`]
/// is allowed to reject events violating it.
///
/// [`Suite`]: event::Suite
/// [happened-before]: https://en.wikipedia.org/wiki/Happened-before
pub trait Writer {
    /// Handles the given [`Suite`] event.
    ///
    /// # Errors
    ///
    /// If the event arrives out of order, or its output can't be written.
    ///
    /// [`Suite`]: event::Suite
    fn handle_event(&mut self, event: event::Suite) -> Result<()>;
}

impl<T: Writer + ?Sized> Writer for &mut T {
    fn handle_event(&mut self, event: event::Suite) -> Result<()> {
        (**self).handle_event(event)
    }
}
