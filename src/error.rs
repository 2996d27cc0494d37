//! Error types for the WebSocket bridge.
//!
//! Errors fall into two groups. Construction and host-call failures
//! (`InvalidUrl`, `NotOpen`, `InvalidCloseCode`, ...) are returned
//! synchronously to the caller. Failures observed while the connection is
//! running never escape the bridge as `Err`; they are handed to
//! [`Handler::on_error`](crate::Handler::on_error) instead.

use std::time::Duration;

use thiserror::Error;

use crate::close::CloseCode;
use crate::connection::ConnectionState;

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a bridged WebSocket connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The endpoint is not a usable `ws://` or `wss://` URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Operation requires the connection to be open.
    #[error("Connection is not open (state: {0})")]
    NotOpen(ConnectionState),

    /// Close code may not be sent in a close frame.
    #[error("Invalid close code: {0}")]
    InvalidCloseCode(i32),

    /// Close reason does not fit in a control frame.
    #[error("Close reason too long: {len} bytes (max: {max})")]
    CloseReasonTooLong {
        /// Actual reason length in bytes.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// The transport is gone and can no longer accept commands.
    #[error("Connection closed")]
    ConnectionClosed,

    /// The tokio transport was used outside of a tokio runtime.
    #[error("No tokio runtime available")]
    NoRuntime,

    /// Opening handshake did not complete in time.
    #[error("Handshake timed out after {0:?}")]
    HandshakeTimeout(Duration),

    /// Transport-level failure that carries no close code.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The connection closed with a code outside the clean set.
    #[error("Abnormal close: {code} {reason:?}")]
    AbnormalClose {
        /// Close code reported by the transport.
        code: CloseCode,
        /// Close reason reported by the transport.
        reason: String,
    },

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Returns `true` if this error was produced by a closing handshake
    /// rather than a transport failure.
    #[must_use]
    pub const fn is_close(&self) -> bool {
        matches!(self, Error::AbnormalClose { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CloseReasonTooLong { len: 200, max: 123 };
        assert_eq!(err.to_string(), "Close reason too long: 200 bytes (max: 123)");

        let err = Error::NotOpen(ConnectionState::Connecting);
        assert_eq!(err.to_string(), "Connection is not open (state: Connecting)");
    }

    #[test]
    fn test_abnormal_close_display() {
        let err = Error::AbnormalClose {
            code: CloseCode::ProtocolError,
            reason: "bad frame".into(),
        };
        assert_eq!(err.to_string(), "Abnormal close: 1002 \"bad frame\"");
        assert!(err.is_close());
        assert!(!Error::Transport("dns".into()).is_close());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_clone() {
        let err = Error::InvalidUrl("nope".into());
        assert_eq!(err.clone(), err);
    }
}
