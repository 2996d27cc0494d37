//! Transport adapter backed by `tokio-tungstenite`.
//!
//! Each connection runs in its own tokio task which owns the socket. The
//! task performs the opening handshake, then loops over inbound frames and
//! commands from the [`TungsteniteTransport`] handle until the connection
//! ends. All events are reported from that task.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until, timeout};
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::protocol::{CloseFrame, WebSocketConfig};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async_with_config};
use tracing::{debug, trace, warn};

use crate::close::CloseCode;
use crate::config::Config;
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::event::EventSink;
use crate::transport::{Connector, Transport};

type Stream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Commands from the handle to the connection task.
#[derive(Debug)]
enum Command {
    Send(String),
    Close { code: CloseCode, reason: String },
}

/// Outcome of the opening handshake.
enum Handshake {
    Connected(Box<Stream>),
    /// Host asked to close before the handshake finished.
    Cancelled,
    Failed(Error),
}

/// [`Connector`] that spawns a `tokio-tungstenite` client task.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl Connector for TungsteniteConnector {
    type Transport = TungsteniteTransport;

    fn connect(
        &self,
        endpoint: &Endpoint,
        config: &Config,
        events: EventSink,
    ) -> Result<TungsteniteTransport> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        runtime.spawn(run_connection(
            endpoint.clone(),
            config.clone(),
            command_rx,
            events,
        ));

        Ok(TungsteniteTransport { command_tx })
    }
}

/// Handle to a running `tokio-tungstenite` connection task.
///
/// Dropping the handle closes the connection with code 1000.
#[derive(Debug)]
pub struct TungsteniteTransport {
    command_tx: mpsc::UnboundedSender<Command>,
}

impl Transport for TungsteniteTransport {
    fn send(&self, payload: String) -> Result<()> {
        self.command_tx
            .send(Command::Send(payload))
            .map_err(|_| Error::ConnectionClosed)
    }

    fn close(&self, code: CloseCode, reason: &str) -> Result<()> {
        self.command_tx
            .send(Command::Close {
                code,
                reason: reason.to_owned(),
            })
            .map_err(|_| Error::ConnectionClosed)
    }
}

fn websocket_config(config: &Config) -> WebSocketConfig {
    WebSocketConfig::default()
        .max_message_size(Some(config.limits.max_message_size))
        .max_frame_size(Some(config.limits.max_frame_size))
}

fn to_ws_close_code(code: CloseCode) -> WsCloseCode {
    u16::try_from(code.as_i32()).map_or(WsCloseCode::Normal, WsCloseCode::from)
}

fn from_ws_close_frame(frame: Option<CloseFrame>) -> (CloseCode, String) {
    match frame {
        Some(frame) => (
            CloseCode::from_i32(i32::from(u16::from(frame.code))),
            frame.reason.as_str().to_owned(),
        ),
        None => (CloseCode::NoStatus, String::new()),
    }
}

/// Code and reason for a close frame read from the peer. A reply without a
/// status to our own close carries the code we sent, the same as a socket
/// that ends after a local close.
fn close_outcome(
    frame: Option<CloseFrame>,
    local_close: Option<CloseCode>,
) -> (CloseCode, String) {
    match (frame, local_close) {
        (None, Some(code)) => (code, String::new()),
        (frame, _) => from_ws_close_frame(frame),
    }
}

/// Resolves once a close is requested or the handle is dropped. Sends that
/// race the handshake are dropped; the handle rejects them before Open.
async fn close_requested(commands: &mut mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Close { .. } => return,
            Command::Send(_) => trace!("dropping send before open"),
        }
    }
}

async fn open_stream(endpoint: &Endpoint, config: &Config) -> Result<Stream> {
    let connect = connect_async_with_config(
        endpoint.as_str(),
        Some(websocket_config(config)),
        config.disable_nagle,
    );
    let result = match config.handshake_timeout() {
        Some(limit) => timeout(limit, connect)
            .await
            .map_err(|_| Error::HandshakeTimeout(limit))?,
        None => connect.await,
    };
    let (stream, response) = result.map_err(|e| Error::Transport(e.to_string()))?;
    debug!(url = %endpoint, status = %response.status(), "handshake complete");
    Ok(stream)
}

async fn handshake(
    endpoint: &Endpoint,
    config: &Config,
    commands: &mut mpsc::UnboundedReceiver<Command>,
) -> Handshake {
    tokio::select! {
        result = open_stream(endpoint, config) => match result {
            Ok(stream) => Handshake::Connected(Box::new(stream)),
            Err(error) => Handshake::Failed(error),
        },
        () = close_requested(commands) => Handshake::Cancelled,
    }
}

async fn close_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn run_connection(
    endpoint: Endpoint,
    config: Config,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: EventSink,
) {
    debug!(url = %endpoint, "connecting");

    let stream = match handshake(&endpoint, &config, &mut commands).await {
        Handshake::Connected(stream) => *stream,
        Handshake::Cancelled => {
            debug!(url = %endpoint, "closed during handshake");
            events.closed(
                CloseCode::NeverConnected,
                "closed before the connection was established",
                false,
            );
            return;
        }
        Handshake::Failed(error) => {
            debug!(url = %endpoint, %error, "handshake failed");
            events.error(error);
            return;
        }
    };

    events.opened();

    let (mut ws_write, mut ws_read) = stream.split();
    // Code we sent, once a local close is in flight.
    let mut local_close: Option<CloseCode> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            frame = ws_read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    events.message(text.as_str());
                }

                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = close_outcome(frame, local_close);
                    // Push out the close reply tungstenite queued.
                    if let Err(e) = ws_write.flush().await {
                        trace!(error = %e, "close reply not flushed");
                    }
                    events.closed(code, reason, local_close.is_none());
                    break;
                }

                // Binary, ping and pong are not surfaced.
                Some(Ok(other)) => {
                    trace!(len = other.len(), "ignoring non-text frame");
                }

                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    match local_close {
                        Some(code) => events.closed(code, "", false),
                        None => events.closed(CloseCode::Abnormal, "connection ended", true),
                    }
                    break;
                }

                Some(Err(WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake))) => {
                    events.closed(
                        CloseCode::Abnormal,
                        "connection reset without closing handshake",
                        local_close.is_none(),
                    );
                    break;
                }

                Some(Err(e)) => {
                    warn!(url = %endpoint, error = %e, "websocket error");
                    events.error(Error::Transport(e.to_string()));
                    break;
                }
            },

            command = commands.recv(), if local_close.is_none() => {
                let (code, reason) = match command {
                    Some(Command::Send(payload)) => {
                        if let Err(e) = ws_write.send(Message::Text(payload.into())).await {
                            warn!(url = %endpoint, error = %e, "send failed");
                            events.error(Error::Transport(e.to_string()));
                            break;
                        }
                        continue;
                    }
                    Some(Command::Close { code, reason }) => (code, reason),
                    None => {
                        debug!(url = %endpoint, "handle dropped, closing");
                        (CloseCode::Normal, String::new())
                    }
                };

                let frame = CloseFrame {
                    code: to_ws_close_code(code),
                    reason: reason.into(),
                };
                if let Err(e) = ws_write.send(Message::Close(Some(frame))).await {
                    warn!(url = %endpoint, error = %e, "close failed");
                    events.error(Error::Transport(e.to_string()));
                    break;
                }
                local_close = Some(code);
                deadline = config.close_timeout().map(|limit: Duration| Instant::now() + limit);
            },

            () = close_deadline(deadline), if local_close.is_some() => {
                debug!(url = %endpoint, "close handshake timed out");
                events.closed(CloseCode::Abnormal, "close handshake timed out", false);
                break;
            }
        }
    }

    trace!(url = %endpoint, "connection task finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_code_conversion() {
        assert_eq!(to_ws_close_code(CloseCode::Normal), WsCloseCode::Normal);
        assert_eq!(to_ws_close_code(CloseCode::Other(4000)), WsCloseCode::from(4000));
        // Local pseudo-codes cannot go on the wire.
        assert_eq!(to_ws_close_code(CloseCode::NeverConnected), WsCloseCode::Normal);
    }

    #[test]
    fn test_close_frame_conversion() {
        let frame = CloseFrame {
            code: WsCloseCode::Protocol,
            reason: "bad frame".into(),
        };
        assert_eq!(
            from_ws_close_frame(Some(frame)),
            (CloseCode::ProtocolError, "bad frame".to_string())
        );
        assert_eq!(from_ws_close_frame(None), (CloseCode::NoStatus, String::new()));
    }

    #[test]
    fn test_empty_close_reply_keeps_local_code() {
        assert_eq!(
            close_outcome(None, Some(CloseCode::Other(4000))),
            (CloseCode::Other(4000), String::new())
        );
        // Peer-initiated close without a status stays 1005.
        assert_eq!(close_outcome(None, None), (CloseCode::NoStatus, String::new()));

        let frame = CloseFrame {
            code: WsCloseCode::Away,
            reason: "restart".into(),
        };
        assert_eq!(
            close_outcome(Some(frame), Some(CloseCode::Normal)),
            (CloseCode::GoingAway, "restart".to_string())
        );
    }

    #[test]
    fn test_websocket_config_uses_limits() {
        let config = Config::new().with_limits(crate::config::Limits::embedded());
        let ws = websocket_config(&config);
        assert_eq!(ws.max_message_size, Some(256 * 1024));
        assert_eq!(ws.max_frame_size, Some(64 * 1024));
    }

    #[test]
    fn test_connect_without_runtime_fails() {
        let endpoint = Endpoint::parse("ws://127.0.0.1:1").unwrap();
        let bridge = std::sync::Arc::new(crate::connection::bridge::Bridge::new(
            crate::handler::Callbacks::new(),
        ));
        let result =
            TungsteniteConnector.connect(&endpoint, &Config::default(), EventSink::new(bridge));
        assert!(matches!(result, Err(Error::NoRuntime)));
    }
}
