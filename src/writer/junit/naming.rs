//! Names of `<testcase>`s.

use itertools::Itertools as _;

use crate::event::Source;

/// Collapses a multi-line title into a single line: every line is trimmed and
/// the non-empty ones are joined with a single space.
#[must_use]
pub fn collapse_title(title: &str) -> String {
    title.lines().map(str::trim).filter(|l| !l.is_empty()).join(" ")
}

/// Names the examples of `Scenario Outline`s as `<outline title> #<n>`.
///
/// The `n` counter starts at 1 and grows while consecutive examples belong to
/// the same outline, restarting once another outline comes.
#[derive(Debug, Default)]
pub struct OutlineNamer {
    /// Outline of the last named example, with the number it got.
    last: Option<(Source<gherkin::Scenario>, usize)>,
}

impl OutlineNamer {
    /// Creates a new [`OutlineNamer`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the name of the next example of the given `outline`.
    pub fn next_example(&mut self, outline: &Source<gherkin::Scenario>) -> String {
        let n = match &mut self.last {
            Some((last, n)) if last == outline => {
                *n += 1;
                *n
            }
            _ => {
                self.last = Some((outline.clone(), 1));
                1
            }
        };
        format!("{} #{n}", collapse_title(&outline.name))
    }

    /// Forgets the last outline, so its next example is numbered from 1 again.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
