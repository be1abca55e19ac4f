//! Editor session transport.
//!
//! The shell talks to the playground actor over a WebSocket:
//!
//! ```text
//! Shell --ClientMessage--> WsActor --> PlaygroundActor
//!       <--ServerMessage--         <--
//! ```
//!
//! # Modules
//!
//! - `message` - JSON protocol in both directions
//! - `server` - WebSocket acceptor handing sockets to the WsActor

pub mod message;
pub mod server;
