//! Connection handle and lifecycle state machine.
//!
//! ## Connection Lifecycle
//!
//! 1. **Connecting** - Initial state, opening handshake in progress
//! 2. **Open** - Handshake complete, messages flow
//! 3. **Closing** - Passed through on the way to Closed
//! 4. **Closed** - Terminal, `on_close` has been delivered
//!
//! ## Example
//!
//! ```rust,ignore
//! use wsbridge::{Callbacks, Connection};
//!
//! let conn = Connection::connect(
//!     "ws://127.0.0.1:9001",
//!     Callbacks::new().with_message(|text| println!("{text}")),
//! )?;
//! conn.send("hello")?;
//! conn.close()?;
//! ```

pub(crate) mod bridge;
mod state;

pub use state::ConnectionState;

#[allow(clippy::module_inception)]
mod connection;

pub use connection::Connection;
