use std::sync::Arc;

use tracing::debug;

use crate::close::{CloseCode, CloseEvent, MAX_CLOSE_REASON};
use crate::config::Config;
use crate::connection::ConnectionState;
use crate::connection::bridge::Bridge;
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::event::EventSink;
use crate::handler::Handler;
use crate::transport::{Connector, Transport};

#[cfg(feature = "async-tokio")]
use crate::transport::{TungsteniteConnector, TungsteniteTransport};

/// A WebSocket connection whose lifecycle is reported through a [`Handler`].
///
/// The connection owns its transport exclusively. The host drives it with
/// [`send`](Connection::send) and [`close`](Connection::close) and learns
/// about everything else through callbacks: `on_open` at most once,
/// `on_message` per text message, `on_error` for failures, and exactly one
/// `on_close`, always last.
///
/// ## Type Parameters
///
/// - `T`: The transport adapter (e.g. [`TungsteniteTransport`])
///
/// ## Example
///
/// ```rust,ignore
/// use wsbridge::{Connection, HostEvent, channel};
///
/// let (handler, mut events) = channel();
/// let conn = Connection::connect("ws://127.0.0.1:9001", handler)?;
///
/// while let Some(event) = events.recv().await {
///     match event {
///         HostEvent::Open => conn.send("hello")?,
///         HostEvent::Message(text) => {
///             println!("Received: {text}");
///             conn.close()?;
///         }
///         HostEvent::Error(e) => eprintln!("error: {e}"),
///         HostEvent::Close(_) => break,
///     }
/// }
/// ```
pub struct Connection<T> {
    endpoint: Endpoint,
    bridge: Arc<Bridge>,
    transport: T,
}

#[cfg(feature = "async-tokio")]
impl Connection<TungsteniteTransport> {
    /// Connect to `url` with the default configuration.
    ///
    /// Returns immediately; the outcome arrives through `handler`.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidUrl` if `url` is not a `ws://` or `wss://` URL
    /// - `Error::NoRuntime` if called outside a tokio runtime
    pub fn connect(url: &str, handler: impl Handler) -> Result<Self> {
        Self::connect_with_config(url, Config::default(), handler)
    }

    /// Connect to `url` with a custom configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Connection::connect`].
    pub fn connect_with_config(url: &str, config: Config, handler: impl Handler) -> Result<Self> {
        Self::with_connector(url, config, handler, &TungsteniteConnector)
    }
}

impl<T: Transport> Connection<T> {
    /// Connect to `url` through a custom transport.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidUrl` if `url` is not a `ws://` or `wss://` URL
    /// - Any error the connector returns when the attempt cannot be started
    pub fn with_connector<C>(
        url: &str,
        config: Config,
        handler: impl Handler,
        connector: &C,
    ) -> Result<Self>
    where
        C: Connector<Transport = T>,
    {
        let endpoint = Endpoint::parse(url)?;
        let bridge = Arc::new(Bridge::new(handler));

        debug!(url = %endpoint, "opening connection");
        let transport =
            connector.connect(&endpoint, &config, EventSink::new(Arc::clone(&bridge)))?;

        Ok(Self {
            endpoint,
            bridge,
            transport,
        })
    }

    /// Send a text message.
    ///
    /// # Errors
    ///
    /// - `Error::NotOpen` if the connection is not open
    /// - `Error::ConnectionClosed` if the transport has shut down
    pub fn send(&self, payload: impl Into<String>) -> Result<()> {
        let state = self.bridge.state();
        if !state.can_send() {
            return Err(Error::NotOpen(state));
        }
        self.transport.send(payload.into())
    }

    /// Request a normal close (code 1000).
    ///
    /// Invokes no callback itself; `on_close` follows once the transport
    /// reports the close. Does nothing once the connection is closed.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConnectionClosed` if the transport has shut down.
    pub fn close(&self) -> Result<()> {
        self.close_with(CloseCode::Normal, "")
    }

    /// Request a close with a specific code and reason.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidCloseCode` if `code` may not be sent in a close frame
    /// - `Error::CloseReasonTooLong` if `reason` exceeds 123 bytes
    /// - `Error::ConnectionClosed` if the transport has shut down
    pub fn close_with(&self, code: CloseCode, reason: &str) -> Result<()> {
        if !code.is_valid() {
            return Err(Error::InvalidCloseCode(code.as_i32()));
        }
        if reason.len() > MAX_CLOSE_REASON {
            return Err(Error::CloseReasonTooLong {
                len: reason.len(),
                max: MAX_CLOSE_REASON,
            });
        }

        let state = self.bridge.state();
        if !state.is_active() {
            return Ok(());
        }

        debug!(url = %self.endpoint, %code, %state, "close requested");
        self.transport.close(code, reason)
    }

    /// The URL exactly as passed to the constructor.
    #[must_use]
    pub fn url(&self) -> &str {
        self.endpoint.as_str()
    }

    /// The validated endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Snapshot of the lifecycle state.
    #[must_use]
    pub fn ready_state(&self) -> ConnectionState {
        self.bridge.state()
    }

    /// Returns `true` while the connection is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.ready_state() == ConnectionState::Open
    }

    /// How the connection ended, once it has.
    #[must_use]
    pub fn close_event(&self) -> Option<&CloseEvent> {
        self.bridge.close_event()
    }
}

impl<T> std::fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("url", &self.endpoint.as_str())
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}
