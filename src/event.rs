//! Transport events and the sink transports deliver them through.

use std::sync::Arc;

use crate::close::CloseCode;
use crate::connection::ConnectionState;
use crate::connection::bridge::Bridge;
use crate::error::Error;

/// Low-level event reported by a transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Opening handshake completed.
    Opened,
    /// A complete text message arrived.
    Message(String),
    /// The connection closed, with or without a closing handshake.
    Closed {
        /// Close code reported by the transport.
        code: CloseCode,
        /// Close reason reported by the transport.
        reason: String,
        /// `true` if the remote peer initiated the close.
        remote: bool,
    },
    /// The transport failed without a close code. Terminal: the transport
    /// delivers nothing after this.
    Error(Error),
}

/// Handle a transport uses to report events for one connection.
///
/// Each call is dispatched synchronously on the calling thread. Clones share
/// the same connection.
#[derive(Clone)]
pub struct EventSink {
    bridge: Arc<Bridge>,
}

impl EventSink {
    pub(crate) fn new(bridge: Arc<Bridge>) -> Self {
        Self { bridge }
    }

    /// Deliver one event.
    pub fn emit(&self, event: TransportEvent) {
        self.bridge.dispatch(event);
    }

    /// Report a completed opening handshake.
    pub fn opened(&self) {
        self.emit(TransportEvent::Opened);
    }

    /// Report an inbound text message.
    pub fn message(&self, payload: impl Into<String>) {
        self.emit(TransportEvent::Message(payload.into()));
    }

    /// Report a closed connection.
    pub fn closed(&self, code: CloseCode, reason: impl Into<String>, remote: bool) {
        self.emit(TransportEvent::Closed {
            code,
            reason: reason.into(),
            remote,
        });
    }

    /// Report a transport failure that carries no close code.
    pub fn error(&self, error: Error) {
        self.emit(TransportEvent::Error(error));
    }

    /// Current state of the connection this sink reports for.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.bridge.state()
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("state", &self.state())
            .finish()
    }
}
