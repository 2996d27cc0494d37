//! Scripted transport for driving the bridge by hand.

use std::sync::Arc;

use parking_lot::Mutex;
use wsbridge::{
    CloseCode, Config, Connection, Connector, Endpoint, Error, EventSink, Result, Transport,
    TransportEvent,
};

use super::Recorder;

/// A command the host sent to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    Close(CloseCode, String),
}

/// Connector whose transport records commands and whose events are emitted
/// by the test.
#[derive(Clone, Default)]
pub struct MockConnector {
    sink: Arc<Mutex<Option<EventSink>>>,
    sent: Arc<Mutex<Vec<Sent>>>,
}

pub struct MockTransport {
    sent: Arc<Mutex<Vec<Sent>>>,
}

impl Transport for MockTransport {
    fn send(&self, payload: String) -> Result<()> {
        self.sent.lock().push(Sent::Text(payload));
        Ok(())
    }

    fn close(&self, code: CloseCode, reason: &str) -> Result<()> {
        self.sent.lock().push(Sent::Close(code, reason.to_owned()));
        Ok(())
    }
}

impl Connector for MockConnector {
    type Transport = MockTransport;

    fn connect(&self, _: &Endpoint, _: &Config, events: EventSink) -> Result<MockTransport> {
        *self.sink.lock() = Some(events);
        Ok(MockTransport {
            sent: Arc::clone(&self.sent),
        })
    }
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a connection to a fixed URL with a fresh recorder.
    pub fn open(&self) -> (Connection<MockTransport>, Recorder) {
        let recorder = Recorder::new();
        let conn = Connection::with_connector(
            "ws://mock.test/socket",
            Config::default(),
            recorder.clone(),
            self,
        )
        .expect("mock connect");
        (conn, recorder)
    }

    pub fn sink(&self) -> EventSink {
        self.sink.lock().clone().expect("not connected")
    }

    pub fn emit(&self, event: TransportEvent) {
        self.sink().emit(event);
    }

    pub fn opened(&self) {
        self.sink().opened();
    }

    pub fn message(&self, payload: &str) {
        self.sink().message(payload);
    }

    pub fn closed(&self, code: i32, reason: &str, remote: bool) {
        self.sink().closed(CloseCode::from_i32(code), reason, remote);
    }

    pub fn error(&self, cause: &str) {
        self.sink().error(Error::Transport(cause.to_owned()));
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }
}
