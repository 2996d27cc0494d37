//! Handler that records callbacks for later assertions.

use std::sync::Arc;

use parking_lot::Mutex;
use wsbridge::{CloseCode, CloseEvent, Error, Handler};

/// One observed callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open,
    Message(String),
    Error(Error),
    Close(CloseEvent),
}

impl Call {
    /// Short label used in order assertions.
    pub fn label(&self) -> &'static str {
        match self {
            Call::Open => "open",
            Call::Message(_) => "message",
            Call::Error(_) => "error",
            Call::Close(_) => "close",
        }
    }
}

/// Records every callback; clones share the log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(Call::label).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                Call::Message(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn close_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, Call::Close(_)))
            .count()
    }

    pub fn close_code(&self) -> Option<CloseCode> {
        self.calls.lock().iter().find_map(|c| match c {
            Call::Close(event) => Some(event.code),
            _ => None,
        })
    }
}

impl Handler for Recorder {
    fn on_open(&self) {
        self.calls.lock().push(Call::Open);
    }

    fn on_message(&self, payload: String) {
        self.calls.lock().push(Call::Message(payload));
    }

    fn on_error(&self, error: &Error) {
        self.calls.lock().push(Call::Error(error.clone()));
    }

    fn on_close(&self, event: &CloseEvent) {
        self.calls.lock().push(Call::Close(event.clone()));
    }
}
