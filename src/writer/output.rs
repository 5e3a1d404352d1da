//! Writing of [`Report`]s into per-suite files.

use std::{
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use atomicwrites::{AtomicFile, OverwriteBehavior};
use lazy_regex::{regex, Lazy, Regex};

use crate::{report::Report, Error, Result};

/// Extension of the written report files.
const EXTENSION: &str = "xml";

/// Destination of a single suite's [`Report`].
///
/// The file is fully rewritten on every [`ReportWriter::flush()`], so a crash
/// mid-run leaves the report of all the [`Feature`]s finished so far.
///
/// [`Feature`]: gherkin::Feature
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportWriter {
    /// Directory to write the report into, if configured.
    dir: Option<PathBuf>,

    /// Sanitized name of the report file.
    file_name: String,
}

impl ReportWriter {
    /// Prepares writing of the suite `suite_name` report into `output_dir`.
    ///
    /// Nothing is touched on the filesystem until the first
    /// [`ReportWriter::flush()`].
    #[must_use]
    pub fn open(
        output_dir: Option<impl Into<PathBuf>>,
        suite_name: &str,
        prefix: &str,
        suffix: &str,
    ) -> Self {
        let dir = output_dir.map(Into::into);
        let file_name = file_name(prefix, suite_name, suffix);
        tracing::debug!(?dir, %file_name, "opened JUnit report");
        Self { dir, file_name }
    }

    /// Name of the report file.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full path of the report file, if the output directory is configured.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.dir.as_deref().map(|d| d.join(&self.file_name))
    }

    /// Writes the whole `report`, atomically replacing the previous contents of
    /// the file.
    ///
    /// Does nothing if the `report` has no `<testcase>`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingOutputPath`] if there is something to write, but no
    ///   output directory is configured.
    /// - [`Error::Io`] if the directory or the file can't be written.
    pub fn flush(&self, report: &Report) -> Result<()> {
        if report.is_empty() {
            tracing::trace!(file_name = %self.file_name, "empty JUnit report, not written");
            return Ok(());
        }
        let dir = self.dir.as_deref().ok_or(Error::MissingOutputPath)?;

        let mut xml = Vec::new();
        report.write_xml(&mut xml)?;

        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        write_atomically(&path, &xml)?;

        tracing::debug!(path = %path.display(), bytes = xml.len(), "written JUnit report");
        Ok(())
    }
}

/// Replaces the file at `path` with `contents` via a temporary file.
fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(contents))
        .map_err(|err| match err {
            atomicwrites::Error::Internal(err) | atomicwrites::Error::User(err) => err,
        })
}

/// Builds the report file name from the suite name and the given affixes.
///
/// Every run of characters other than ASCII alphanumerics and `_` becomes a
/// single `_`, the outer `_` are trimmed and the result is lowercased.
///
/// ```
/// # use jenkins_junit::writer::output::file_name;
/// assert_eq!(file_name("CI-", "My Suite", "-v2.final"), "ci_my_suite_v2_final.xml");
/// ```
#[must_use]
pub fn file_name(prefix: &str, suite_name: &str, suffix: &str) -> String {
    static UNSAFE_CHARS: &Lazy<Regex> = regex!(r"[^[:alnum:]_]+");

    let raw = format!("{prefix}{suite_name}{suffix}");
    let name = UNSAFE_CHARS.replace_all(&raw, "_");
    format!("{}.{EXTENSION}", name.trim_matches('_').to_lowercase())
}
