//! Actor Message Definitions
//!
//! Message types for inter-actor communication.
//!
//! ```text
//! WsActor --Client/Joined/Left--> PlaygroundActor --Broadcast/SendTo--> WsActor
//! FsActor --Disk--> PlaygroundActor
//! DebounceTimer --Fire--> PlaygroundActor
//! ```

use tokio::sync::oneshot;

use crate::playground::{Playground, Slot};
use crate::reload::message::{ClientMessage, ServerMessage};

/// Identifies one attached WebSocket client.
pub type ClientId = u64;

// =============================================================================
// PlaygroundActor Messages
// =============================================================================

/// Messages to the Playground Actor
#[derive(Debug)]
pub enum PlaygroundMsg {
    /// Message from an attached shell
    Client {
        client: ClientId,
        msg: ClientMessage,
    },
    /// Client finished the handshake
    Joined(ClientId),
    /// Client closed or failed a send
    Left(ClientId),
    /// A source file changed on disk
    Disk { slot: Slot, text: String },
    /// Quiet period elapsed for the given timer generation
    Fire { generation: u64 },
    /// Copy of the current state (tests and diagnostics)
    Snapshot(oneshot::Sender<Playground>),
    /// Shutdown
    Shutdown,
}

// =============================================================================
// WsActor Messages
// =============================================================================

/// Messages to WebSocket Actor
#[derive(Debug)]
pub enum WsMsg {
    /// Send to every client, optionally skipping the one that caused it
    Broadcast {
        message: ServerMessage,
        except: Option<ClientId>,
    },
    /// Send to one client
    SendTo {
        client: ClientId,
        message: ServerMessage,
    },
    /// Add client
    AddClient(std::net::TcpStream),
    /// Shutdown
    Shutdown,
}

impl WsMsg {
    pub fn broadcast(message: ServerMessage) -> Self {
        Self::Broadcast {
            message,
            except: None,
        }
    }
}
