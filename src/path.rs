//! Shortening of feature file paths into stable report names.

/// Extension of feature files, stripped from report names.
const FEATURE_EXTENSION: &str = ".feature";

/// Strips a configured base path and the `.feature` extension from feature
/// file paths, so report names don't depend on where the project is checked
/// out.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PathNormalizer {
    base: Option<String>,
}

impl PathNormalizer {
    /// Creates a new [`PathNormalizer`] stripping the given `base` path.
    #[must_use]
    pub fn new(base: impl Into<Option<String>>) -> Self {
        Self { base: base.into().filter(|b| !b.is_empty()) }
    }

    /// Strips the base path (with any leading path separators following it)
    /// and the `.feature` extension from the given `path`.
    ///
    /// A `path` not starting with the base path keeps its prefix.
    ///
    /// ```
    /// # use jenkins_junit::PathNormalizer;
    /// let paths = PathNormalizer::new(Some("/base".to_owned()));
    ///
    /// assert_eq!(paths.strip("/base/sub/foo.feature"), "sub/foo");
    /// assert_eq!(paths.strip("other/foo.feature"), "other/foo");
    /// ```
    #[must_use]
    pub fn strip<'p>(&self, path: &'p str) -> &'p str {
        let path = match self.base.as_deref() {
            Some(base) => path
                .strip_prefix(base)
                .map_or(path, |p| p.trim_start_matches(['/', '\\'])),
            None => path,
        };
        path.strip_suffix(FEATURE_EXTENSION).unwrap_or(path)
    }
}
