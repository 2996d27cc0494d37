//! Channel-backed handler for hosts that consume callbacks on their own task.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use super::Handler;
use crate::close::CloseEvent;
use crate::error::Error;

/// A callback, captured as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// `on_open` fired.
    Open,
    /// `on_message` fired.
    Message(String),
    /// `on_error` fired.
    Error(Error),
    /// `on_close` fired. Always the last event.
    Close(CloseEvent),
}

impl HostEvent {
    /// Returns `true` for [`HostEvent::Close`].
    #[must_use]
    pub const fn is_close(&self) -> bool {
        matches!(self, HostEvent::Close(_))
    }
}

/// Create a connected handler/receiver pair.
///
/// The receiver yields every callback in dispatch order and ends after the
/// close event.
#[must_use]
pub fn channel() -> (ChannelHandler, HostEvents) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        ChannelHandler {
            tx: Mutex::new(Some(tx)),
        },
        HostEvents { rx },
    )
}

/// [`Handler`] that forwards every callback into an unbounded channel.
///
/// Never blocks the transport thread.
#[derive(Debug)]
pub struct ChannelHandler {
    tx: Mutex<Option<mpsc::UnboundedSender<HostEvent>>>,
}

impl ChannelHandler {
    fn forward(&self, event: HostEvent) {
        let last = event.is_close();
        let mut guard = self.tx.lock();
        if let Some(tx) = guard.as_ref()
            && tx.send(event).is_err()
        {
            trace!("host event receiver dropped");
        }
        if last {
            // Dropping the sender ends the receiving stream.
            guard.take();
        }
    }
}

impl Handler for ChannelHandler {
    fn on_open(&self) {
        self.forward(HostEvent::Open);
    }

    fn on_message(&self, payload: String) {
        self.forward(HostEvent::Message(payload));
    }

    fn on_error(&self, error: &Error) {
        self.forward(HostEvent::Error(error.clone()));
    }

    fn on_close(&self, event: &CloseEvent) {
        self.forward(HostEvent::Close(event.clone()));
    }
}

/// Receiving half of [`channel`].
#[derive(Debug)]
pub struct HostEvents {
    rx: mpsc::UnboundedReceiver<HostEvent>,
}

impl HostEvents {
    /// Wait for the next event. Returns `None` once the close event has been
    /// received.
    pub async fn recv(&mut self) -> Option<HostEvent> {
        self.rx.recv().await
    }

    /// Take the next event if one is ready.
    pub fn try_recv(&mut self) -> Option<HostEvent> {
        self.rx.try_recv().ok()
    }
}

impl Stream for HostEvents {
    type Item = HostEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
