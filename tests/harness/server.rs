//! Local WebSocket server for exercising the tokio-tungstenite transport.

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

/// What the server does with each accepted connection.
#[derive(Debug, Clone)]
pub enum ServerBehavior {
    /// Echo text messages until the client closes.
    Echo,
    /// Complete the handshake, then close with the given code and reason.
    CloseWith(u16, &'static str),
    /// Complete the handshake, then drop the TCP stream without a close frame.
    Drop,
    /// Accept TCP but never answer the handshake.
    Stall,
    /// Complete the handshake, then never read again.
    Deaf,
}

pub struct TestServer {
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Bind to a random local port and serve connections.
    pub async fn spawn(behavior: ServerBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let behavior = behavior.clone();
                tokio::spawn(async move {
                    if let ServerBehavior::Stall = behavior {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        drop(stream);
                        return;
                    }

                    let Ok(mut ws) = accept_async(stream).await else {
                        return;
                    };

                    match behavior {
                        ServerBehavior::Echo => {
                            while let Some(Ok(msg)) = ws.next().await {
                                if msg.is_text() && ws.send(msg).await.is_err() {
                                    break;
                                }
                            }
                        }
                        ServerBehavior::CloseWith(code, reason) => {
                            let frame = CloseFrame {
                                code: CloseCode::from(code),
                                reason: reason.into(),
                            };
                            let _ = ws.close(Some(frame)).await;
                            while let Some(Ok(_)) = ws.next().await {}
                        }
                        ServerBehavior::Drop => drop(ws),
                        ServerBehavior::Deaf => {
                            tokio::time::sleep(Duration::from_secs(60)).await;
                            drop(ws);
                        }
                        ServerBehavior::Stall => unreachable!(),
                    }
                });
            }
        });

        Self { addr, task }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

/// A local URL nothing is listening on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{addr}")
}
