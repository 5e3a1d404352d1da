// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! In-memory [JUnit XML report][1] document.
//!
//! The document is a strict tree: `testsuites` → `testsuite` → `testcase` →
//! `failure`/`error`/`skipped`. Nodes are addressed with plain index handles
//! ([`SuiteHandle`], [`CaseHandle`]) handed out when they're opened, so there
//! are no back-references into the tree.
//!
//! [1]: https://llg.cubic.org/docs/junit

mod serialize;

use std::io;

use derive_more::with_trait::Display;
use linked_hash_map::LinkedHashMap;

use crate::Result;

/// Insertion-ordered attributes of a report node.
///
/// Empty values are never stored, so they're never emitted as `attr=""`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Attributes(LinkedHashMap<String, String>);

impl Attributes {
    /// Creates empty [`Attributes`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the attribute `name` to `value`, unless `value` is absent or
    /// empty. An already present attribute keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Option<String>>) {
        match value.into() {
            Some(value) if !value.is_empty() => {
                let name = name.into();
                if let Some(old) = self.0.get_mut(&name) {
                    *old = value;
                } else {
                    _ = self.0.insert(name, value);
                }
            }
            _ => {}
        }
    }

    /// Merges all the given `attrs` into these [`Attributes`], skipping absent
    /// and empty values.
    pub fn merge<K, V>(&mut self, attrs: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<Option<String>>,
    {
        for (name, value) in attrs {
            self.set(name, value);
        }
    }

    /// Returns the value of the attribute `name`, if it's set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterates over all the attributes in their insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Indicates whether no attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<Option<String>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        attrs.merge(iter);
        attrs
    }
}

/// Kind of a [`Testcase`] child node.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum NodeKind {
    /// `<failure>`: an assertion or a hook has failed.
    #[display("failure")]
    Failure,

    /// `<error>`: a step is pending or undefined.
    #[display("error")]
    Error,

    /// `<skipped>`: the scenario has been skipped.
    #[display("skipped")]
    Skipped,
}

impl NodeKind {
    /// XML tag name of this [`NodeKind`].
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Failure => "failure",
            Self::Error => "error",
            Self::Skipped => "skipped",
        }
    }
}

/// Child node of a [`Testcase`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    /// [`NodeKind`] of this [`Node`].
    pub kind: NodeKind,

    /// Attributes of this [`Node`] (usually just a `message`).
    pub attrs: Attributes,

    /// Free-text body, stored verbatim and escaped on serialization.
    pub body: Option<String>,
}

impl Node {
    /// Creates a new [`Node`] with the given `message` attribute.
    #[must_use]
    pub fn new(kind: NodeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            attrs: [("message", message.into())].into_iter().collect(),
            body: None,
        }
    }

    /// Attaches the given body to this [`Node`]. Empty bodies are dropped.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Option<String>>) -> Self {
        self.body = body.into().filter(|b| !b.is_empty());
        self
    }

    /// Returns the `message` attribute of this [`Node`].
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.attrs.get("message")
    }
}

/// `<testcase>` element: a single scenario or outline example.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Testcase {
    /// Attributes of this [`Testcase`].
    pub attrs: Attributes,

    /// Child nodes of this [`Testcase`], in emission order.
    pub children: Vec<Node>,
}

/// `<testsuite>` element: a single feature.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Testsuite {
    /// Attributes of this [`Testsuite`].
    pub attrs: Attributes,

    /// [`Testcase`]s of this [`Testsuite`], in emission order.
    pub testcases: Vec<Testcase>,
}

/// Handle of a [`Testsuite`] opened in a [`Report`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SuiteHandle(usize);

/// Handle of a [`Testcase`] opened in a [`Report`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CaseHandle {
    suite: usize,
    case: usize,
}

impl CaseHandle {
    /// Returns the [`SuiteHandle`] of the [`Testsuite`] owning the
    /// [`Testcase`].
    #[must_use]
    pub const fn suite(self) -> SuiteHandle {
        SuiteHandle(self.suite)
    }
}

/// [JUnit XML report][1] of a single suite run: the `<testsuites>` root.
///
/// [1]: https://llg.cubic.org/docs/junit
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Report {
    /// Name of the runner suite this [`Report`] is for.
    suite_name: Option<String>,

    /// Attributes of the `<testsuites>` root.
    attrs: Attributes,

    /// Opened [`Testsuite`]s, in emission order.
    testsuites: Vec<Testsuite>,
}

impl Report {
    /// Creates a new [`Report`] for the runner suite `suite_name`, with the
    /// given attributes on its `<testsuites>` root.
    #[must_use]
    pub fn new<K, V>(
        suite_name: impl Into<Option<String>>,
        attrs: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Option<String>>,
    {
        Self {
            suite_name: suite_name.into().filter(|n| !n.is_empty()),
            attrs: attrs.into_iter().collect(),
            testsuites: Vec::new(),
        }
    }

    /// Name of the runner suite this [`Report`] is for.
    #[must_use]
    pub fn suite_name(&self) -> Option<&str> {
        self.suite_name.as_deref()
    }

    /// Attributes of the `<testsuites>` root.
    #[must_use]
    pub const fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// All the [`Testsuite`]s of this [`Report`].
    #[must_use]
    pub fn testsuites(&self) -> &[Testsuite] {
        &self.testsuites
    }

    /// Appends a new `<testsuite>`, with its `package` set to the runner suite
    /// name, and then the given `attrs` merged in.
    pub fn open_testsuite<K, V>(
        &mut self,
        attrs: impl IntoIterator<Item = (K, V)>,
    ) -> SuiteHandle
    where
        K: Into<String>,
        V: Into<Option<String>>,
    {
        let handle = SuiteHandle(self.testsuites.len());
        self.testsuites.push(Testsuite::default());
        self.testsuites[handle.0]
            .attrs
            .set("package", self.suite_name.clone());
        self.set_testsuite_attrs(handle, attrs);
        handle
    }

    /// Merges the given `attrs` into the `<testsuite>` behind `handle`,
    /// skipping absent and empty values.
    ///
    /// A `name` has all its `/` replaced with `.`.
    ///
    /// # Panics
    ///
    /// If `handle` wasn't issued by this [`Report`].
    pub fn set_testsuite_attrs<K, V>(
        &mut self,
        handle: SuiteHandle,
        attrs: impl IntoIterator<Item = (K, V)>,
    ) where
        K: Into<String>,
        V: Into<Option<String>>,
    {
        let suite = &mut self.testsuites[handle.0];
        for (name, value) in attrs {
            let name = name.into();
            let value = value.into();
            let value = if name == "name" {
                value.map(|v| v.replace('/', "."))
            } else {
                value
            };
            suite.attrs.set(name, value);
        }
    }

    /// Appends a new `<testcase>` to the `<testsuite>` behind `handle`.
    ///
    /// A `classname` is prefixed with the runner suite name (if any) and has
    /// all its `/` replaced with `.`.
    ///
    /// # Panics
    ///
    /// If `handle` wasn't issued by this [`Report`].
    pub fn open_testcase<K, V>(
        &mut self,
        handle: SuiteHandle,
        attrs: impl IntoIterator<Item = (K, V)>,
    ) -> CaseHandle
    where
        K: Into<String>,
        V: Into<Option<String>>,
    {
        let mut case = Testcase::default();
        for (name, value) in attrs {
            let name = name.into();
            let value = value.into();
            let value = if name == "classname" {
                value.map(|v| self.classname(&v))
            } else {
                value
            };
            case.attrs.set(name, value);
        }

        let testcases = &mut self.testsuites[handle.0].testcases;
        testcases.push(case);
        CaseHandle { suite: handle.0, case: testcases.len() - 1 }
    }

    /// Appends a child [`Node`] to the `<testcase>` behind `handle`.
    ///
    /// # Panics
    ///
    /// If `handle` wasn't issued by this [`Report`].
    pub fn append_child(&mut self, handle: CaseHandle, node: Node) {
        self.testsuites[handle.suite].testcases[handle.case]
            .children
            .push(node);
    }

    /// Returns the [`Testsuite`] behind `handle`.
    #[must_use]
    pub fn testsuite(&self, handle: SuiteHandle) -> Option<&Testsuite> {
        self.testsuites.get(handle.0)
    }

    /// Returns the [`Testcase`] behind `handle`.
    #[must_use]
    pub fn testcase(&self, handle: CaseHandle) -> Option<&Testcase> {
        self.testsuites.get(handle.suite)?.testcases.get(handle.case)
    }

    /// Returns the handle of the most recently opened `<testcase>`, if any.
    #[must_use]
    pub fn last_testcase(&self) -> Option<CaseHandle> {
        self.testsuites.iter().enumerate().rev().find_map(|(suite, s)| {
            s.testcases
                .len()
                .checked_sub(1)
                .map(|case| CaseHandle { suite, case })
        })
    }

    /// Indicates whether no `<testsuite>` has any `<testcase>`, in which case
    /// the [`Report`] isn't worth writing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.testsuites.iter().all(|s| s.testcases.is_empty())
    }

    /// Serializes this [`Report`] as pretty-printed XML into the given
    /// `output`.
    ///
    /// # Errors
    ///
    /// If writing into the `output` fails.
    pub fn write_xml(&self, output: impl io::Write) -> Result<()> {
        serialize::serialize_report(self, output)
    }

    /// Serializes this [`Report`] as a pretty-printed XML [`String`].
    ///
    /// # Errors
    ///
    /// Never in practice, as the output is in-memory. The [`Result`] is kept
    /// for parity with [`Report::write_xml()`].
    pub fn to_xml(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_xml(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn classname(&self, classname: &str) -> String {
        self.suite_name
            .as_deref()
            .map_or_else(|| classname.to_owned(), |s| format!("{s}.{classname}"))
            .replace('/', ".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Attr = (&'static str, Option<String>);

    fn some(v: &str) -> Option<String> {
        Some(v.to_owned())
    }

    fn no_attrs() -> [Attr; 0] {
        []
    }

    #[test]
    fn skips_empty_attribute_values() {
        let attrs: Attributes =
            [("a", some("1")), ("b", None), ("c", some(""))].into_iter().collect();

        assert_eq!(attrs.iter().collect::<Vec<_>>(), [("a", "1")]);
    }

    #[test]
    fn merge_keeps_insertion_order() {
        let mut attrs: Attributes =
            [("name", some("x")), ("tests", some("0"))].into_iter().collect();
        attrs.merge([("time", some("1.000")), ("name", some("y"))]);

        assert_eq!(
            attrs.iter().collect::<Vec<_>>(),
            [("name", "y"), ("tests", "0"), ("time", "1.000")],
        );
    }

    #[test]
    fn testsuite_gets_package_and_dotted_name() {
        let mut report = Report::new(some("default"), no_attrs());
        let suite = report.open_testsuite(no_attrs());
        report.set_testsuite_attrs(suite, [("name", some("sub/foo")), ("time", None)]);

        let attrs = &report.testsuite(suite).unwrap().attrs;
        assert_eq!(
            attrs.iter().collect::<Vec<_>>(),
            [("package", "default"), ("name", "sub.foo")],
        );
    }

    #[test]
    fn testcase_classname_is_prefixed_with_suite_name() {
        let mut report = Report::new(some("web"), no_attrs());
        let suite = report.open_testsuite(no_attrs());
        let case = report.open_testcase(
            suite,
            [("name", some("Login")), ("classname", some("auth/login"))],
        );

        let attrs = &report.testcase(case).unwrap().attrs;
        assert_eq!(attrs.get("classname"), Some("web.auth.login"));
        assert_eq!(case.suite(), suite);
    }

    #[test]
    fn testcase_classname_without_suite_name() {
        let mut report = Report::new(None::<String>, no_attrs());
        let suite = report.open_testsuite(no_attrs());
        let case = report.open_testcase(suite, [("classname", some("a/b"))]);

        assert_eq!(report.testcase(case).unwrap().attrs.get("classname"), Some("a.b"));
        assert_eq!(
            report.testsuite(suite).unwrap().attrs.get("package"),
            None,
        );
    }

    #[test]
    fn emptiness_tracks_testcases_only() {
        let mut report = Report::new(some("s"), no_attrs());
        assert!(report.is_empty());
        assert_eq!(report.last_testcase(), None);

        let first = report.open_testsuite(no_attrs());
        assert!(report.is_empty());

        let case = report.open_testcase(first, [("name", some("a"))]);
        _ = report.open_testsuite(no_attrs());
        assert!(!report.is_empty());
        assert_eq!(report.last_testcase(), Some(case));
    }

    #[test]
    fn appends_children_in_order() {
        let mut report = Report::new(some("s"), no_attrs());
        let suite = report.open_testsuite(no_attrs());
        let case = report.open_testcase(suite, [("name", some("a"))]);
        report.append_child(case, Node::new(NodeKind::Failure, "first"));
        report.append_child(
            case,
            Node::new(NodeKind::Error, "second").with_body(String::new()),
        );

        let children = &report.testcase(case).unwrap().children;
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].message(), Some("first"));
        assert_eq!(children[1].kind, NodeKind::Error);
        assert_eq!(children[1].body, None);
    }
}
