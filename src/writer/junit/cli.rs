//! CLI configuration for JUnit XML writer.

use std::path::PathBuf;

use smart_default::SmartDefault;

use crate::path::PathNormalizer;

/// CLI options of a [`JUnit`] [`Writer`].
///
/// [`JUnit`]: super::JUnit
/// [`Writer`]: crate::Writer
#[derive(Clone, Debug, SmartDefault, clap::Args)]
#[group(skip)]
pub struct Cli {
    /// Directory to write JUnit XML reports into, one file per suite.
    #[arg(id = "junit-output", long = "junit-output", value_name = "dir")]
    pub output: Option<PathBuf>,

    /// Prefix of the report file names.
    #[arg(id = "junit-prefix", long = "junit-prefix", value_name = "str")]
    pub prefix: Option<String>,

    /// Suffix of the report file names.
    #[arg(id = "junit-suffix", long = "junit-suffix", value_name = "str")]
    pub suffix: Option<String>,

    /// Whether scenarios without any failure are reported as `<testcase>`s.
    #[arg(
        id = "junit-success",
        long = "junit-success",
        value_name = "true|false",
        default_value_t = true,
        action = clap::ArgAction::Set,
    )]
    #[default(true)]
    pub success: bool,

    /// Base path stripped from feature file paths in the report.
    #[arg(id = "junit-base-path", long = "junit-base-path", value_name = "dir")]
    pub base_path: Option<String>,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let Cli { output, prefix, suffix, success, base_path } = cli;
        Self {
            output,
            prefix: prefix.unwrap_or_default(),
            suffix: suffix.unwrap_or_default(),
            success,
            paths: PathNormalizer::new(base_path),
        }
    }
}

/// Configuration of a [`JUnit`] [`Writer`].
///
/// [`JUnit`]: super::JUnit
/// [`Writer`]: crate::Writer
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Directory to write reports into.
    pub output: Option<PathBuf>,

    /// Prefix of the report file names.
    pub prefix: String,

    /// Suffix of the report file names.
    pub suffix: String,

    /// Whether scenarios without any failure still get a `<testcase>`.
    #[default(true)]
    pub success: bool,

    /// Normalizer of feature file paths.
    pub paths: PathNormalizer,
}

impl Config {
    /// Creates a new default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory to write reports into.
    #[must_use]
    pub fn output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output = Some(dir.into());
        self
    }

    /// Sets the prefix of the report file names.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the suffix of the report file names.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Sets whether scenarios without any failure are reported.
    #[must_use]
    pub fn success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// Sets the base path stripped from feature file paths.
    #[must_use]
    pub fn base_path(mut self, base: impl Into<String>) -> Self {
        self.paths = PathNormalizer::new(Some(base.into()));
        self
    }
}
