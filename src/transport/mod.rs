//! Transport adapter seam.
//!
//! The bridge does not speak the WebSocket wire protocol itself. A
//! [`Connector`] starts a connection attempt and hands back a [`Transport`]
//! handle; from then on the transport reports what happens through the
//! [`EventSink`] it was given.
//!
//! Contract for implementors:
//!
//! - Deliver events in the order they happen.
//! - Deliver at most one of `Closed` or `Error` as the final event.
//!   Anything after it is discarded by the bridge.
//! - Never report events synchronously from inside [`Connector::connect`].
//! - `close` only requests a close; the outcome arrives as an event.

use crate::close::CloseCode;
use crate::config::Config;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::event::EventSink;

#[cfg(feature = "async-tokio")]
mod tungstenite;

#[cfg(feature = "async-tokio")]
pub use self::tungstenite::{TungsteniteConnector, TungsteniteTransport};

/// Command half of a running transport.
pub trait Transport: Send + Sync + 'static {
    /// Queue a text message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`](crate::Error::ConnectionClosed) if
    /// the transport can no longer accept commands.
    fn send(&self, payload: String) -> Result<()>;

    /// Request a graceful close.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`](crate::Error::ConnectionClosed) if
    /// the transport can no longer accept commands.
    fn close(&self, code: CloseCode, reason: &str) -> Result<()>;
}

/// Factory for transports.
pub trait Connector {
    /// Transport produced by this connector.
    type Transport: Transport;

    /// Begin connecting to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt cannot even be started. Failures of
    /// the attempt itself are reported through `events`.
    fn connect(
        &self,
        endpoint: &Endpoint,
        config: &Config,
        events: EventSink,
    ) -> Result<Self::Transport>;
}
