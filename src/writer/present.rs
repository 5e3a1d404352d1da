//! Presentation of captured failures as report text.

use std::borrow::Cow;

use crate::event::{self, Info};

/// Turns a failure captured from a step or a hook into the text body of a
/// `<failure>` or `<error>` node.
pub trait Presenter {
    /// Observes the given event.
    fn observe(&mut self, event: &event::Suite) {
        _ = event;
    }

    /// Renders the given captured failure.
    ///
    /// Empty output omits the node body.
    fn present(&self, error: &Info) -> String;
}

impl<T: Presenter + ?Sized> Presenter for Box<T> {
    fn observe(&mut self, event: &event::Suite) {
        (**self).observe(event);
    }

    fn present(&self, error: &Info) -> String {
        (**self).present(error)
    }
}

/// [`Presenter`] rendering panic payloads as their message.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanicPresenter;

impl Presenter for PanicPresenter {
    fn present(&self, error: &Info) -> String {
        coerce_error(error).into_owned()
    }
}

/// Coerces the given panic payload into a [`String`], if possible.
#[must_use]
pub fn coerce_error(err: &Info) -> Cow<'static, str> {
    (**err)
        .downcast_ref::<String>()
        .map(|s| s.clone().into())
        .or_else(|| (**err).downcast_ref::<&str>().map(|s| s.to_owned().into()))
        .unwrap_or_else(|| "(Could not resolve panic payload)".into())
}
