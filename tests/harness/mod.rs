//! Test harness shared by the integration tests.
//!
//! - [`Recorder`]: handler that logs every callback in order
//! - [`MockConnector`]: scripted transport driven directly by the test
//! - [`TestServer`]: local tokio-tungstenite server with scripted behavior

#![allow(dead_code)]

mod mock;
mod recorder;
mod server;

pub use mock::{MockConnector, MockTransport, Sent};
pub use recorder::{Call, Recorder};
pub use server::{ServerBehavior, TestServer, refused_url};

/// Install a tracing subscriber once, honoring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
