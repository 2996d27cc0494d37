//! Close codes and close-event classification.
//!
//! A close is *clean* when its numeric code is 1000, 1006 or -1, however the
//! [`CloseCode`] was built. Every other code is reported to the host through
//! `on_error` before `on_close`.

/// Maximum length of a close reason in bytes (125 byte control payload
/// minus the two byte status code).
pub const MAX_CLOSE_REASON: usize = 123;

/// WebSocket close status code per RFC 6455 Section 7.4.
///
/// In addition to the registered codes this carries
/// [`CloseCode::NeverConnected`], the negative pseudo-code client libraries
/// report when the opening handshake never completed.
///
/// Equality, hashing and classification use the numeric value, so
/// `Other(1000)` and `Normal` are the same code.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub enum CloseCode {
    /// Normal closure (1000).
    #[default]
    Normal,
    /// Going away (1001). Server shutdown or client navigating away.
    GoingAway,
    /// Protocol error (1002).
    ProtocolError,
    /// Unsupported data (1003).
    UnsupportedData,
    /// No status received (1005). The close frame carried no code.
    NoStatus,
    /// Abnormal closure (1006). The connection dropped without a close frame.
    Abnormal,
    /// Invalid payload (1007).
    InvalidPayload,
    /// Policy violation (1008).
    PolicyViolation,
    /// Message too big (1009).
    MessageTooBig,
    /// Mandatory extension (1010).
    MandatoryExtension,
    /// Internal error (1011).
    InternalError,
    /// TLS handshake failure (1015).
    TlsHandshake,
    /// The connection was never established (-1).
    NeverConnected,
    /// Any other code, registered or application defined.
    Other(i32),
}

impl CloseCode {
    /// Create a `CloseCode` from its numeric value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        match code {
            -1 => CloseCode::NeverConnected,
            1000 => CloseCode::Normal,
            1001 => CloseCode::GoingAway,
            1002 => CloseCode::ProtocolError,
            1003 => CloseCode::UnsupportedData,
            1005 => CloseCode::NoStatus,
            1006 => CloseCode::Abnormal,
            1007 => CloseCode::InvalidPayload,
            1008 => CloseCode::PolicyViolation,
            1009 => CloseCode::MessageTooBig,
            1010 => CloseCode::MandatoryExtension,
            1011 => CloseCode::InternalError,
            1015 => CloseCode::TlsHandshake,
            other => CloseCode::Other(other),
        }
    }

    /// Get the numeric value of this close code.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        match self {
            CloseCode::NeverConnected => -1,
            CloseCode::Normal => 1000,
            CloseCode::GoingAway => 1001,
            CloseCode::ProtocolError => 1002,
            CloseCode::UnsupportedData => 1003,
            CloseCode::NoStatus => 1005,
            CloseCode::Abnormal => 1006,
            CloseCode::InvalidPayload => 1007,
            CloseCode::PolicyViolation => 1008,
            CloseCode::MessageTooBig => 1009,
            CloseCode::MandatoryExtension => 1010,
            CloseCode::InternalError => 1011,
            CloseCode::TlsHandshake => 1015,
            CloseCode::Other(code) => *code,
        }
    }

    /// Check if a close with this code needs no error notification.
    ///
    /// Depends on the code alone: normal closure, a silent disconnect, or a
    /// connection that never opened.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        matches!(self.as_i32(), 1000 | 1006 | -1)
    }

    /// Check if this close code is valid for sending per RFC 6455 Section 7.4.1.
    ///
    /// Valid codes:
    /// - 1000-1003
    /// - 1007-1014
    /// - 3000-4999: reserved for libraries, frameworks and applications
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        let code = self.as_i32();
        matches!(code, 1000..=1003 | 1007..=1014 | 3000..=4999)
    }

    /// Check if this close code is reserved and MUST NOT be sent in a close frame.
    ///
    /// Covers 1004-1006 and 1015 from RFC 6455 as well as the negative
    /// pseudo-codes, which only exist locally.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        let code = self.as_i32();
        code < 0 || matches!(code, 1004..=1006 | 1015)
    }
}

impl PartialEq for CloseCode {
    fn eq(&self, other: &Self) -> bool {
        self.as_i32() == other.as_i32()
    }
}

impl Eq for CloseCode {}

impl std::hash::Hash for CloseCode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_i32().hash(state);
    }
}

impl From<i32> for CloseCode {
    fn from(code: i32) -> Self {
        CloseCode::from_i32(code)
    }
}

impl From<CloseCode> for i32 {
    fn from(code: CloseCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for CloseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// Final close notification handed to [`Handler::on_close`](crate::Handler::on_close).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEvent {
    /// Close code as reported by the transport, or synthesized by the bridge.
    pub code: CloseCode,
    /// Human-readable reason.
    pub reason: String,
    /// `true` if the remote peer initiated the close.
    pub remote: bool,
    /// `false` if the host was sent `on_error` for this closure.
    pub clean: bool,
}

impl CloseEvent {
    /// Build a close event classified from its code.
    #[must_use]
    pub fn new(code: CloseCode, reason: impl Into<String>, remote: bool) -> Self {
        Self {
            code,
            reason: reason.into(),
            remote,
            clean: code.is_clean(),
        }
    }

    /// Build a close event the transport never reported, following a
    /// transport error.
    #[must_use]
    pub(crate) fn synthesized(code: CloseCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
            remote: false,
            clean: false,
        }
    }
}
