//! Actor System for the Playground Session
//!
//! Message-passing concurrency for `livepad serve`:
//!
//! ```text
//! FsActor ──Disk──▶ PlaygroundActor ◀──Client── WsActor
//! (watch)            (session state) ──Broadcast──▶ (shell sockets)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `debounce` - Quiet-period timer for auto-rebuild
//! - `playground` - Session state owner
//! - `fs` - Source directory watcher with debouncing
//! - `ws` - WebSocket delivery and client reads
//! - `coordinator` - Wires up and runs actors

pub mod coordinator;
pub mod debounce;
pub mod fs;
pub mod messages;
pub mod playground;
pub mod ws;

pub use coordinator::Coordinator;
