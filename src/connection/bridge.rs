//! Event classification and dispatch.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::ReentrantMutex;
use tracing::{debug, trace, warn};

use crate::close::{CloseCode, CloseEvent};
use crate::connection::ConnectionState;
use crate::error::Error;
use crate::event::TransportEvent;
use crate::handler::Handler;

/// Lifecycle state machine sitting between a transport and a host handler.
///
/// State is only written from [`Bridge::dispatch`]. Reads go through an
/// atomic so a host can query the state from inside a callback.
pub(crate) struct Bridge {
    state: AtomicU8,
    serial: ReentrantMutex<()>,
    close: OnceLock<CloseEvent>,
    handler: Box<dyn Handler>,
}

impl Bridge {
    pub(crate) fn new(handler: impl Handler) -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::Connecting.as_u8()),
            serial: ReentrantMutex::new(()),
            close: OnceLock::new(),
            handler: Box::new(handler),
        }
    }

    pub(crate) fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Close record, once the connection is closed.
    pub(crate) fn close_event(&self) -> Option<&CloseEvent> {
        self.close.get()
    }

    /// Process one transport event and invoke the matching callbacks.
    pub(crate) fn dispatch(&self, event: TransportEvent) {
        let _serial = self.serial.lock();
        let state = self.state();

        match event {
            TransportEvent::Opened => {
                if self.transition(state, ConnectionState::Open) {
                    debug!("connection open");
                    self.handler.on_open();
                }
            }
            TransportEvent::Message(payload) => {
                if state.can_send() {
                    trace!(len = payload.len(), "message");
                    self.handler.on_message(payload);
                } else {
                    trace!(%state, len = payload.len(), "dropping message outside Open");
                }
            }
            TransportEvent::Closed {
                code,
                reason,
                remote,
            } => {
                if state.is_active() {
                    self.finish(state, CloseEvent::new(code, reason, remote), None);
                } else {
                    trace!(%code, "dropping close on closed connection");
                }
            }
            TransportEvent::Error(error) => {
                if state.is_active() {
                    let code = if state == ConnectionState::Connecting {
                        CloseCode::NeverConnected
                    } else {
                        CloseCode::Abnormal
                    };
                    let event = CloseEvent::synthesized(code, error.to_string());
                    self.finish(state, event, Some(error));
                } else {
                    trace!(%error, "dropping error on closed connection");
                }
            }
        }
    }

    /// Move to Closed, then report the error (if any) and the close.
    fn finish(&self, mut state: ConnectionState, event: CloseEvent, error: Option<Error>) {
        if state == ConnectionState::Open && self.transition(state, ConnectionState::Closing) {
            state = ConnectionState::Closing;
        }
        self.transition(state, ConnectionState::Closed);

        let error = error.or_else(|| {
            (!event.clean).then(|| Error::AbnormalClose {
                code: event.code,
                reason: event.reason.clone(),
            })
        });

        let event = self.close.get_or_init(|| event);

        if let Some(error) = error {
            warn!(%error, code = %event.code, "connection failed");
            self.handler.on_error(&error);
        }

        debug!(code = %event.code, remote = event.remote, clean = event.clean, "connection closed");
        self.handler.on_close(event);
    }

    fn transition(&self, from: ConnectionState, to: ConnectionState) -> bool {
        if !from.can_transition_to(to) {
            trace!(%from, %to, "ignoring transition");
            return false;
        }
        self.state.store(to.as_u8(), Ordering::Release);
        trace!(%from, %to, "state transition");
        true
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("state", &self.state())
            .field("close", &self.close.get())
            .finish_non_exhaustive()
    }
}
