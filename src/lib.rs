// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Jenkins-flavoured [JUnit XML report][1] writer for Cucumber-style test
//! runners.
//!
//! The runner feeds its lifecycle [`event`]s into a [`JUnit`] [`Writer`],
//! which writes a report file per suite:
//! - a `<testsuite>` per feature file;
//! - a `<testcase>` per scenario (or `Scenario Outline` example);
//! - a `<failure>`, `<error>` or `<skipped>` child per failed hook, failed
//!   step or skipped scenario.
//!
//! ```no_run
//! use jenkins_junit::{event::Suite, Config, JUnit, Writer as _};
//!
//! # fn main() -> jenkins_junit::Result<()> {
//! let mut junit = JUnit::new(Config::new().output("target/junit"));
//! junit.handle_event(Suite::started("default"))?;
//! // ...features and scenarios...
//! junit.handle_event(Suite::finished())?;
//! # Ok(())
//! # }
//! ```
//!
//! [1]: https://llg.cubic.org/docs/junit

pub mod error;
pub mod event;
pub mod path;
pub mod report;
pub mod writer;

pub use gherkin;

#[doc(inline)]
pub use self::{
    error::{Error, Result},
    path::PathNormalizer,
    report::Report,
    writer::{
        junit::{Cli, Config},
        JUnit, Writer,
    },
};
