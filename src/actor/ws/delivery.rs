use tungstenite::protocol::Message;

use crate::actor::messages::ClientId;
use crate::reload::message::ServerMessage;

use super::{RegisteredClient, WsActor};

impl WsActor {
    /// Send to every client except `except`. Returns clients dropped on failure.
    pub(super) fn broadcast(&self, message: &ServerMessage, except: Option<ClientId>) -> Vec<ClientId> {
        let msg = Message::Text(message.to_json().into());
        let mut clients = self.clients.lock();

        if clients.is_empty() {
            crate::debug!("ws"; "no clients connected");
            return Vec::new();
        }

        let mut dropped = Vec::new();
        let mut sent = 0;
        clients.retain_mut(|client| {
            if Some(client.id) == except {
                return true;
            }
            if deliver(client, &msg) {
                sent += 1;
                true
            } else {
                dropped.push(client.id);
                false
            }
        });
        crate::debug!("ws"; "broadcast to {} clients", sent);
        dropped
    }

    /// Send to one client. Returns it if the send failed and it was dropped.
    pub(super) fn send_to(&self, target: ClientId, message: &ServerMessage) -> Vec<ClientId> {
        let msg = Message::Text(message.to_json().into());
        let mut clients = self.clients.lock();
        let mut dropped = Vec::new();

        clients.retain_mut(|client| {
            if client.id != target || deliver(client, &msg) {
                return true;
            }
            dropped.push(client.id);
            false
        });
        dropped
    }
}

/// Write one frame. `false` means the client is gone.
///
/// A would-block write stays queued in tungstenite and is flushed by the
/// reader loop, so it counts as delivered.
pub(super) fn deliver(client: &mut RegisteredClient, msg: &Message) -> bool {
    match client.ws.send(msg.clone()) {
        Ok(()) => true,
        Err(tungstenite::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::WouldBlock => true,
        Err(e) => {
            crate::debug!("ws"; "client {} disconnected: {}", client.id, e);
            false
        }
    }
}
