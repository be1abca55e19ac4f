use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::http::StatusCode;
use tungstenite::protocol::Message;

use crate::actor::messages::{ClientId, PlaygroundMsg};
use crate::reload::message::{ClientMessage, ProtocolError};

use super::{RegisteredClient, WsActor};

/// How often the reader thread polls client sockets.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

impl WsActor {
    /// Handshake a new connection. Connections from any origin but the
    /// shell page are refused with 403.
    ///
    /// The client is not yet visible to the reader thread; see [`Self::register`].
    pub(super) fn accept_client(&mut self, stream: TcpStream) -> Option<RegisteredClient> {
        let shell = self.shell_origin;
        let check_origin = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            let origin = req
                .headers()
                .get("origin")
                .and_then(|value| value.to_str().ok());
            match origin {
                Some(origin) if shell.permits(origin) => Ok(resp),
                origin => {
                    let origin = origin.unwrap_or("<none>");
                    crate::log!("ws"; "refused connection from origin {}", origin);
                    let mut refusal = ErrorResponse::new(Some("origin not allowed".to_string()));
                    *refusal.status_mut() = StatusCode::FORBIDDEN;
                    Err(refusal)
                }
            }
        };

        // Keep blocking mode during handshake, switch to non-blocking after
        match tungstenite::accept_hdr(stream, check_origin) {
            Ok(ws) => {
                let _ = ws.get_ref().set_nonblocking(true);
                let id = self.next_id;
                self.next_id += 1;
                Some(RegisteredClient { id, ws })
            }
            Err(e) => {
                crate::debug!("ws"; "handshake failed: {}", e);
                None
            }
        }
    }

    /// Hand a client to the reader thread. Must follow its `Joined` so a
    /// quick disconnect cannot report `Left` first.
    pub(super) fn register(&self, client: RegisteredClient) {
        let mut clients = self.clients.lock();
        let id = client.id;
        clients.push(client);
        crate::debug!("ws"; "client {} connected (total: {})", id, clients.len());
    }

    /// Background thread reading client frames (non-blocking poll).
    ///
    /// Parsed messages are forwarded after the client lock is released so
    /// a full playground channel never blocks delivery.
    pub(super) fn client_reader_loop(
        clients: Arc<Mutex<Vec<RegisteredClient>>>,
        playground_tx: mpsc::Sender<PlaygroundMsg>,
    ) {
        loop {
            std::thread::sleep(POLL_INTERVAL);
            if crate::core::is_shutdown() {
                break;
            }

            let outbox = {
                let mut clients = clients.lock();
                poll_clients(&mut clients)
            };

            for msg in outbox {
                if playground_tx.blocking_send(msg).is_err() {
                    return;
                }
            }
        }
    }
}

/// Read every pending frame, dropping closed clients.
fn poll_clients(clients: &mut Vec<RegisteredClient>) -> Vec<PlaygroundMsg> {
    let mut outbox = Vec::new();

    clients.retain_mut(|client| {
        // Push out anything a would-block send left queued
        if let Err(e) = client.ws.flush()
            && !is_would_block(&e)
        {
            crate::debug!("ws"; "client {} flush failed: {}", client.id, e);
            outbox.push(PlaygroundMsg::Left(client.id));
            return false;
        }

        loop {
            match client.ws.read() {
                Ok(Message::Text(text)) => match ClientMessage::from_json(text.as_str()) {
                    Ok(msg) => outbox.push(PlaygroundMsg::Client {
                        client: client.id,
                        msg,
                    }),
                    Err(e) => log_protocol_error(client.id, &e),
                },
                Ok(Message::Binary(_)) => {
                    log_protocol_error(client.id, &ProtocolError::Frame("binary"));
                }
                Ok(Message::Close(_)) => {
                    crate::debug!("ws"; "client {} closed", client.id);
                    outbox.push(PlaygroundMsg::Left(client.id));
                    return false;
                }
                // Ping/pong are answered by tungstenite
                Ok(_) => {}
                Err(ref e) if is_would_block(e) => return true,
                Err(e) => {
                    crate::debug!("ws"; "client {} read failed: {}", client.id, e);
                    outbox.push(PlaygroundMsg::Left(client.id));
                    return false;
                }
            }
        }
    });

    outbox
}

fn is_would_block(e: &tungstenite::Error) -> bool {
    matches!(e, tungstenite::Error::Io(io) if io.kind() == std::io::ErrorKind::WouldBlock)
}

fn log_protocol_error(client: ClientId, e: &ProtocolError) {
    crate::debug!("ws"; "dropped message from client {}: {}", client, e);
}
