//! Source wrapper for gherkin types.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use derive_more::with_trait::{AsRef, Deref, From, Into};

/// Wrapper around a [`gherkin`] type ([`gherkin::Feature`],
/// [`gherkin::Scenario`], etc.), providing cheap [`Clone`], [`Hash`] and
/// [`PartialEq`] implementations for using it extensively in events.
///
/// Equality is identity: two [`Source`]s are equal only when they point to the
/// very same node, which is how the same outline is recognized across its
/// expanded examples.
#[derive(AsRef, Deref, From, Into)]
#[as_ref(forward)]
#[deref(forward)]
pub struct Source<T: ?Sized>(Arc<T>);

impl<T> Source<T> {
    /// Wraps the provided `value` into a new [`Source`].
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

// Manual implementation is required to omit the redundant `T: Clone` trait
// bound imposed by `#[derive(Clone)]`.
impl<T: ?Sized> Clone for Source<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

// Manual implementation is required to omit the redundant `T: Eq` trait bound
// imposed by `#[derive(Eq)]`.
impl<T: ?Sized> Eq for Source<T> {}

impl<T: ?Sized> PartialEq for Source<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Hash for Source<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).cast::<()>().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::Source;

    #[test]
    fn equality_is_identity() {
        let a = Source::new(String::from("outline"));
        let b = Source::new(String::from("outline"));

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn hashes_by_pointer() {
        let a = Source::new(1);
        let set: HashSet<_> = [a.clone(), a.clone(), Source::new(1)].into();

        assert_eq!(set.len(), 2);
        assert!(set.contains(&a));
    }

    #[test]
    fn derefs_to_inner_value() {
        let s = Source::new(String::from("feature"));

        assert_eq!(s.len(), 7);
        assert_eq!(format!("{s:?}"), "\"feature\"");
    }
}
