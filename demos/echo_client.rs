//! Echo client driven entirely by host callbacks.
//!
//! Start any echo server on 127.0.0.1:9001, then run:
//!   RUST_LOG=wsbridge=debug cargo run --example echo_client
//!
//! Pass a different URL as the first argument to connect elsewhere.

use std::error::Error;

use tracing_subscriber::EnvFilter;
use wsbridge::{Connection, HostEvent, channel};

const DEFAULT_URL: &str = "ws://127.0.0.1:9001";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let url = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());
    println!("Connecting to {url}");

    let (handler, mut events) = channel();
    let conn = Connection::connect(&url, handler)?;

    let messages = ["Hello, WebSocket!", "second message", "bye"];
    let mut echoed = 0;

    while let Some(event) = events.recv().await {
        match event {
            HostEvent::Open => {
                println!("Open ({})", conn.ready_state());
                for message in messages {
                    conn.send(message)?;
                }
            }
            HostEvent::Message(text) => {
                println!("Received: {text}");
                echoed += 1;
                if echoed == messages.len() {
                    conn.close()?;
                }
            }
            HostEvent::Error(e) => eprintln!("Error: {e}"),
            HostEvent::Close(event) => {
                println!(
                    "Closed: code={} reason={:?} remote={} clean={}",
                    event.code, event.reason, event.remote, event.clean
                );
            }
        }
    }

    Ok(())
}
