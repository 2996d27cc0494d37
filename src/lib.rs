//! # wsbridge - WebSocket lifecycle bridge
//!
//! `wsbridge` sits between a WebSocket client library and a host application.
//! It turns the transport's raw events into a small, stable set of callbacks
//! and guarantees their order, so a host never has to interpret close codes
//! or guard against a misbehaving transport.
//!
//! ## Guarantees
//!
//! - `on_open` fires at most once, before any `on_message`
//! - `on_message` delivers text payloads unmodified and in arrival order
//! - A close with a code other than 1000, 1006 or -1 (never connected) is
//!   reported through `on_error` immediately before `on_close`
//! - A transport failure without a close code produces `on_error` followed
//!   by a synthesized `on_close`
//! - `on_close` fires exactly once and nothing fires after it
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wsbridge::{Callbacks, Connection};
//!
//! let conn = Connection::connect(
//!     "ws://127.0.0.1:9001",
//!     Callbacks::new()
//!         .with_open(|| println!("open"))
//!         .with_message(|text| println!("received {text}"))
//!         .with_error(|e| eprintln!("error: {e}"))
//!         .with_close(|event| println!("closed with {}", event.code)),
//! )?;
//! ```

pub mod close;
pub mod config;
pub mod connection;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod handler;
pub mod transport;

pub use close::{CloseCode, CloseEvent};
pub use config::{Config, Limits, Timeouts};
pub use connection::{Connection, ConnectionState};
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use event::{EventSink, TransportEvent};
pub use handler::{Callbacks, Handler};
pub use transport::{Connector, Transport};

#[cfg(feature = "async-tokio")]
pub use handler::{ChannelHandler, HostEvent, HostEvents, channel};
#[cfg(feature = "async-tokio")]
pub use transport::{TungsteniteConnector, TungsteniteTransport};
