//! Host callback surface.
//!
//! A host receives exactly four kinds of notification:
//!
//! | Callback | When |
//! |----------|------|
//! | [`Handler::on_open`] | once, when the opening handshake completes |
//! | [`Handler::on_message`] | once per inbound text message while open |
//! | [`Handler::on_error`] | before `on_close` for a not-clean close, or on a transport failure |
//! | [`Handler::on_close`] | exactly once per connection, last |
//!
//! Callbacks run on the transport's thread and must return quickly. Hosts
//! that need to do real work should hand off, for example through
//! [`ChannelHandler`].

use std::sync::Arc;

use crate::close::CloseEvent;
use crate::error::Error;

#[cfg(feature = "async-tokio")]
mod channel;

#[cfg(feature = "async-tokio")]
pub use channel::{ChannelHandler, HostEvent, HostEvents, channel};

/// Receiver of connection callbacks.
///
/// Every method has an empty default so a host only implements what it
/// cares about.
pub trait Handler: Send + Sync + 'static {
    /// The connection is open.
    fn on_open(&self) {}

    /// A text message arrived.
    fn on_message(&self, _payload: String) {}

    /// Something went wrong. Always followed by `on_close` when caused by a
    /// close or a transport failure.
    fn on_error(&self, _error: &Error) {}

    /// The connection is closed. Nothing is delivered after this.
    fn on_close(&self, _event: &CloseEvent) {}
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn on_open(&self) {
        (**self).on_open();
    }

    fn on_message(&self, payload: String) {
        (**self).on_message(payload);
    }

    fn on_error(&self, error: &Error) {
        (**self).on_error(error);
    }

    fn on_close(&self, event: &CloseEvent) {
        (**self).on_close(event);
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn on_open(&self) {
        (**self).on_open();
    }

    fn on_message(&self, payload: String) {
        (**self).on_message(payload);
    }

    fn on_error(&self, error: &Error) {
        (**self).on_error(error);
    }

    fn on_close(&self, event: &CloseEvent) {
        (**self).on_close(event);
    }
}

type OpenFn = Box<dyn Fn() + Send + Sync>;
type MessageFn = Box<dyn Fn(String) + Send + Sync>;
type ErrorFn = Box<dyn Fn(&Error) + Send + Sync>;
type CloseFn = Box<dyn Fn(&CloseEvent) + Send + Sync>;

/// [`Handler`] assembled from optional closures.
///
/// Unset callbacks are skipped.
///
/// ```
/// use wsbridge::Callbacks;
///
/// let callbacks = Callbacks::new()
///     .with_open(|| println!("open"))
///     .with_message(|text| println!("got {text}"))
///     .with_close(|event| println!("closed with {}", event.code));
/// ```
#[derive(Default)]
pub struct Callbacks {
    open: Option<OpenFn>,
    message: Option<MessageFn>,
    error: Option<ErrorFn>,
    close: Option<CloseFn>,
}

impl Callbacks {
    /// Create an empty set of callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the open callback.
    #[must_use]
    pub fn with_open(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.open = Some(Box::new(f));
        self
    }

    /// Set the message callback.
    #[must_use]
    pub fn with_message(mut self, f: impl Fn(String) + Send + Sync + 'static) -> Self {
        self.message = Some(Box::new(f));
        self
    }

    /// Set the error callback.
    #[must_use]
    pub fn with_error(mut self, f: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Set the close callback.
    #[must_use]
    pub fn with_close(mut self, f: impl Fn(&CloseEvent) + Send + Sync + 'static) -> Self {
        self.close = Some(Box::new(f));
        self
    }
}

impl Handler for Callbacks {
    fn on_open(&self) {
        if let Some(f) = &self.open {
            f();
        }
    }

    fn on_message(&self, payload: String) {
        if let Some(f) = &self.message {
            f(payload);
        }
    }

    fn on_error(&self, error: &Error) {
        if let Some(f) = &self.error {
            f(error);
        }
    }

    fn on_close(&self, event: &CloseEvent) {
        if let Some(f) = &self.close {
            f(event);
        }
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("open", &self.open.is_some())
            .field("message", &self.message.is_some())
            .field("error", &self.error.is_some())
            .field("close", &self.close.is_some())
            .finish()
    }
}
