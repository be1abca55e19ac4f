//! WebSocket Actor - Bidirectional Communication
//!
//! This actor is responsible for:
//! - Handshaking and registering shell connections
//! - Delivering `ServerMessage`s (broadcast or to one client)
//! - Forwarding parsed `ClientMessage`s to the playground actor
//!
//! # Architecture
//!
//! ```text
//! PlaygroundActor --[Broadcast/SendTo]--> WsActor --> Clients
//!        ^                                               |
//!        +------------[Client/Joined/Left]---------------+
//! ```

mod client_io;
mod delivery;
mod origin;

pub use origin::ShellOrigin;

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::WebSocket;

use super::messages::{ClientId, PlaygroundMsg, WsMsg};

/// A registered WebSocket client
struct RegisteredClient {
    id: ClientId,
    ws: WebSocket<TcpStream>,
}

/// WebSocket Actor - manages client connections and delivery
pub struct WsActor {
    /// Channel to receive messages
    rx: mpsc::Receiver<WsMsg>,
    /// Connected clients (shared for delivery + read thread)
    clients: Arc<Mutex<Vec<RegisteredClient>>>,
    playground_tx: mpsc::Sender<PlaygroundMsg>,
    shell_origin: ShellOrigin,
    next_id: ClientId,
}

impl WsActor {
    pub fn new(
        rx: mpsc::Receiver<WsMsg>,
        playground_tx: mpsc::Sender<PlaygroundMsg>,
        shell_origin: ShellOrigin,
    ) -> Self {
        Self {
            rx,
            clients: Arc::new(Mutex::new(Vec::new())),
            playground_tx,
            shell_origin,
            next_id: 1,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let clients_for_reader = Arc::clone(&self.clients);
        let tx_for_reader = self.playground_tx.clone();
        std::thread::spawn(move || {
            Self::client_reader_loop(clients_for_reader, tx_for_reader);
        });

        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::Broadcast { message, except } => {
                    let dropped = self.broadcast(&message, except);
                    self.notify_left(dropped).await;
                }

                WsMsg::SendTo { client, message } => {
                    let dropped = self.send_to(client, &message);
                    self.notify_left(dropped).await;
                }

                WsMsg::AddClient(stream) => {
                    if let Some(client) = self.accept_client(stream)
                        && self
                            .playground_tx
                            .send(PlaygroundMsg::Joined(client.id))
                            .await
                            .is_ok()
                    {
                        self.register(client);
                    }
                }

                WsMsg::Shutdown => {
                    crate::debug!("ws"; "shutting down");
                    let mut clients = self.clients.lock();
                    for mut client in clients.drain(..) {
                        let _ = client.ws.close(None);
                        let _ = client.ws.flush();
                    }
                    break;
                }
            }
        }
    }

    async fn notify_left(&self, dropped: Vec<ClientId>) {
        for id in dropped {
            let _ = self.playground_tx.send(PlaygroundMsg::Left(id)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playground::Compiled;
    use crate::reload::message::{ClientMessage, ServerMessage};
    use std::net::{SocketAddr, TcpListener};
    use std::time::Duration;
    use tungstenite::client::IntoClientRequest;
    use tungstenite::handshake::client::Request;
    use tungstenite::protocol::Message;

    const SHELL_PORT: u16 = 5277;

    async fn next(rx: &mut mpsc::Receiver<PlaygroundMsg>) -> PlaygroundMsg {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out")
            .expect("channel closed")
    }

    fn spawn_actor() -> (mpsc::Sender<WsMsg>, mpsc::Receiver<PlaygroundMsg>) {
        let (ws_tx, ws_rx) = mpsc::channel(16);
        let (pg_tx, pg_rx) = mpsc::channel(16);
        let shell = ShellOrigin::new(SocketAddr::from(([127, 0, 0, 1], SHELL_PORT)));
        tokio::spawn(WsActor::new(ws_rx, pg_tx, shell).run());
        (ws_tx, pg_rx)
    }

    fn request(addr: SocketAddr, origin: &str) -> Request {
        let mut req = format!("ws://{addr}").into_client_request().unwrap();
        req.headers_mut()
            .insert("Origin", origin.parse().unwrap());
        req
    }

    fn shell_request(addr: SocketAddr) -> Request {
        request(addr, &format!("http://127.0.0.1:{SHELL_PORT}"))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_session_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (ws_tx, mut pg_rx) = spawn_actor();

        let shell = std::thread::spawn(move || {
            let (mut ws, _) = tungstenite::connect(shell_request(addr)).unwrap();
            ws.send(Message::Text(String::from(r#"{"type":"bogus"}"#).into()))
                .unwrap();
            ws.send(Message::Text(String::from(r#"{"type":"run"}"#).into()))
                .unwrap();
            let reply = ws.read().unwrap();
            let _ = ws.close(None);
            reply.into_text().unwrap().as_str().to_string()
        });

        let (stream, _) = listener.accept().unwrap();
        ws_tx.send(WsMsg::AddClient(stream)).await.unwrap();

        assert!(matches!(next(&mut pg_rx).await, PlaygroundMsg::Joined(1)));
        // The malformed frame is dropped, the next one arrives
        assert!(matches!(
            next(&mut pg_rx).await,
            PlaygroundMsg::Client {
                client: 1,
                msg: ClientMessage::Run
            }
        ));

        let preview = ServerMessage::preview(&Compiled {
            document: "<p>hi</p>".into(),
            revision: 3,
        });
        ws_tx
            .send(WsMsg::SendTo {
                client: 1,
                message: preview,
            })
            .await
            .unwrap();

        let reply = tokio::task::spawn_blocking(move || shell.join().unwrap())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(json["type"], "preview");
        assert_eq!(json["revision"], 3);

        assert!(matches!(next(&mut pg_rx).await, PlaygroundMsg::Left(1)));
        ws_tx.send(WsMsg::Shutdown).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_opaque_origin_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (ws_tx, mut pg_rx) = spawn_actor();

        let framed = std::thread::spawn(move || {
            match tungstenite::connect(request(addr, "null")) {
                Ok((mut ws, _)) => {
                    let _ = ws.send(Message::Text(String::from(r#"{"type":"reset"}"#).into()));
                    None
                }
                Err(tungstenite::Error::Http(resp)) => Some(resp.status().as_u16()),
                Err(_) => Some(0),
            }
        });

        let (stream, _) = listener.accept().unwrap();
        ws_tx.send(WsMsg::AddClient(stream)).await.unwrap();

        let status = tokio::task::spawn_blocking(move || framed.join().unwrap())
            .await
            .unwrap();
        assert_eq!(status, Some(403));

        // Neither a join nor the command reaches the session
        let quiet = tokio::time::timeout(Duration::from_millis(200), pg_rx.recv()).await;
        assert!(quiet.is_err());
        ws_tx.send(WsMsg::Shutdown).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_origin_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (ws_tx, mut pg_rx) = spawn_actor();

        let client =
            std::thread::spawn(move || tungstenite::connect(format!("ws://{addr}")).is_err());

        let (stream, _) = listener.accept().unwrap();
        ws_tx.send(WsMsg::AddClient(stream)).await.unwrap();

        let refused = tokio::task::spawn_blocking(move || client.join().unwrap())
            .await
            .unwrap();
        assert!(refused);
        let quiet = tokio::time::timeout(Duration::from_millis(200), pg_rx.recv()).await;
        assert!(quiet.is_err());
        ws_tx.send(WsMsg::Shutdown).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_quick_disconnect_joins_before_leaving() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (ws_tx, mut pg_rx) = spawn_actor();

        let client = std::thread::spawn(move || {
            let (mut ws, _) = tungstenite::connect(shell_request(addr)).unwrap();
            let _ = ws.close(None);
            let _ = ws.flush();
        });

        let (stream, _) = listener.accept().unwrap();
        ws_tx.send(WsMsg::AddClient(stream)).await.unwrap();
        tokio::task::spawn_blocking(move || client.join().unwrap())
            .await
            .unwrap();

        assert!(matches!(next(&mut pg_rx).await, PlaygroundMsg::Joined(1)));
        assert!(matches!(next(&mut pg_rx).await, PlaygroundMsg::Left(1)));
        ws_tx.send(WsMsg::Shutdown).await.unwrap();
    }
}
