// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of the reporting layer.
//!
//! Only infrastructure problems are errors here. Failed, pending, undefined
//! or skipped tests are regular report content and never surface as an
//! [`Error`].

use std::io;

use derive_more::with_trait::{Display, Error as StdError, From};

/// Error of writing a JUnit report.
///
/// All the variants are fatal: a report that can't be written indicates a
/// misconfiguration, so nothing is retried.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// No output directory has been configured, while there is a report to
    /// write.
    #[display("the `output_path` option must be specified for the JUnit writer")]
    #[from(ignore)]
    MissingOutputPath,

    /// I/O error while creating or writing the report file.
    #[display("I/O error: {_0}")]
    Io(io::Error),

    /// Failed to serialize the report as XML.
    #[display("XML generation failed: {_0}")]
    Xml(quick_xml::Error),

    /// Events have been delivered in an order violating the lifecycle
    /// contract, e.g. a scenario outside of any feature.
    #[display("unexpected {event} event while {state}")]
    #[from(ignore)]
    Ordering {
        /// Kind of the offending event.
        event: &'static str,

        /// Description of the writer state the event arrived in.
        state: &'static str,
    },
}

impl Error {
    /// Indicates whether this [`Error`] is caused by a missing configuration.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingOutputPath)
    }

    /// Indicates whether this [`Error`] is a violation of the events order.
    #[must_use]
    pub const fn is_ordering(&self) -> bool {
        matches!(self, Self::Ordering { .. })
    }
}

/// Result type alias for the reporting operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn is_std_error() {
        fn boxed(err: Error) -> Box<dyn std::error::Error + Send + Sync> {
            Box::new(err)
        }

        let err = boxed(Error::MissingOutputPath);
        assert!(err.downcast_ref::<Error>().is_some_and(Error::is_configuration));
    }

    #[test]
    fn displays_configuration_error() {
        let err = Error::MissingOutputPath;

        assert!(err.is_configuration());
        assert!(err.to_string().contains("`output_path`"));
        assert!(err.source().is_none());
    }

    #[test]
    fn keeps_io_error_as_source() {
        let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();

        assert!(err.to_string().contains("denied"));
        assert!(err.source().is_some());
        assert!(!err.is_configuration());
    }

    #[test]
    fn displays_ordering_violation() {
        let err = Error::Ordering { event: "scenario finished", state: "no feature is open" };

        assert!(err.is_ordering());
        assert_eq!(
            err.to_string(),
            "unexpected scenario finished event while no feature is open",
        );
    }
}
