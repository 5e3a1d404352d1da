//! [JUnit XML report][1] [`Writer`] implementation.
//!
//! The implementation is split across several modules:
//!
//! - [`cli`]: CLI options and the [`Config`] they turn into
//! - [`accumulator`]: buffering and ordering of [`Scenario`] notifications
//! - [`naming`]: names of `<testcase>`s
//! - [`writer`]: the [`JUnit`] state machine driving everything
//!
//! [`Scenario`]: gherkin::Scenario
//! [`Writer`]: crate::Writer
//! [1]: https://llg.cubic.org/docs/junit

pub mod accumulator;
pub mod cli;
pub mod naming;
pub mod writer;

pub use self::{
    accumulator::EventAccumulator,
    cli::{Cli, Config},
    writer::JUnit,
};
