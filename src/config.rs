//! Configuration and limits for bridged WebSocket connections.
//!
//! The bridge itself has nothing to configure; these settings are consumed
//! by the transport adapter.

use std::time::Duration;

/// Size limits enforced by the transport on incoming data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum size of a single frame in bytes.
    ///
    /// Default: 16 MB (16 * 1024 * 1024)
    pub max_frame_size: usize,

    /// Maximum size of a complete message in bytes.
    ///
    /// Default: 64 MB (64 * 1024 * 1024)
    pub max_message_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_frame_size: 16 * 1024 * 1024,   // 16 MB
            max_message_size: 64 * 1024 * 1024, // 64 MB
        }
    }
}

impl Limits {
    /// Create new limits with custom values.
    #[must_use]
    pub const fn new(max_frame_size: usize, max_message_size: usize) -> Self {
        Self {
            max_frame_size,
            max_message_size,
        }
    }

    /// Create limits suitable for small embedded systems.
    ///
    /// - Max frame: 64 KB
    /// - Max message: 256 KB
    #[must_use]
    pub const fn embedded() -> Self {
        Self {
            max_frame_size: 64 * 1024,
            max_message_size: 256 * 1024,
        }
    }
}

/// Timeouts applied by the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeouts {
    /// Maximum time to complete the opening handshake, including DNS and TCP
    /// connect.
    ///
    /// Default: 30 seconds
    pub handshake: Duration,

    /// Maximum time to wait for the peer's close frame after a locally
    /// initiated close.
    ///
    /// Default: 5 seconds
    pub close: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            handshake: Duration::from_secs(30),
            close: Duration::from_secs(5),
        }
    }
}

impl Timeouts {
    /// Create new timeouts with custom values.
    #[must_use]
    pub const fn new(handshake: Duration, close: Duration) -> Self {
        Self { handshake, close }
    }
}

/// Connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Resource limits.
    pub limits: Limits,

    /// Timeout configuration.
    ///
    /// If `None`, the transport waits indefinitely.
    /// Default: None
    pub timeouts: Option<Timeouts>,

    /// Disable Nagle's algorithm on the TCP socket.
    ///
    /// Default: true
    pub disable_nagle: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            timeouts: None,
            disable_nagle: true,
        }
    }
}

impl Config {
    /// Create a new configuration with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set timeout configuration.
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = Some(timeouts);
        self
    }

    /// Enable or disable Nagle's algorithm.
    #[must_use]
    pub const fn with_nagle(mut self, enabled: bool) -> Self {
        self.disable_nagle = !enabled;
        self
    }

    /// Handshake timeout, if configured.
    #[must_use]
    pub fn handshake_timeout(&self) -> Option<Duration> {
        self.timeouts.as_ref().map(|t| t.handshake)
    }

    /// Close handshake timeout, if configured.
    #[must_use]
    pub fn close_timeout(&self) -> Option<Duration> {
        self.timeouts.as_ref().map(|t| t.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_default() {
        let limits = Limits::default();
        assert_eq!(limits.max_frame_size, 16 * 1024 * 1024);
        assert_eq!(limits.max_message_size, 64 * 1024 * 1024);
    }

    #[test]
    fn test_limits_embedded() {
        let limits = Limits::embedded();
        assert_eq!(limits.max_frame_size, 64 * 1024);
        assert_eq!(limits.max_message_size, 256 * 1024);
    }

    #[test]
    fn test_timeouts_default() {
        let timeouts = Timeouts::default();
        assert_eq!(timeouts.handshake, Duration::from_secs(30));
        assert_eq!(timeouts.close, Duration::from_secs(5));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.timeouts.is_none());
        assert!(config.disable_nagle);
        assert_eq!(config.handshake_timeout(), None);
        assert_eq!(config.close_timeout(), None);
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .with_limits(Limits::embedded())
            .with_timeouts(Timeouts::new(Duration::from_secs(2), Duration::from_millis(500)))
            .with_nagle(true);

        assert_eq!(config.limits.max_frame_size, 64 * 1024);
        assert_eq!(config.handshake_timeout(), Some(Duration::from_secs(2)));
        assert_eq!(config.close_timeout(), Some(Duration::from_millis(500)));
        assert!(!config.disable_nagle);
    }
}
