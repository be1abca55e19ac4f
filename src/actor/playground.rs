//! Playground Actor
//!
//! Owns the session state. Every edit, toolbar action, disk change and
//! timer fire is serialized through this actor's channel.
//!
//! ```text
//! WsActor ──Client──▶ PlaygroundActor ──publish──▶ PreviewHost
//! FsActor ──Disk────▶        │         ──Broadcast─▶ WsActor
//! DebounceTimer ─Fire─▶      │
//! ```
//!
//! The session mounts when the actor starts and remounts whenever the
//! last client detaches, so a fresh shell always sees starter buffers.

use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashSet;
use tokio::sync::mpsc;

use super::debounce::DebounceTimer;
use super::messages::{ClientId, PlaygroundMsg, WsMsg};
use crate::config::PlaygroundConfig;
use crate::playground::{Command, KeyPress, Keymap, Playground, PreviewHost, Schedule, Slot, Starter};
use crate::reload::message::{ClientMessage, ServerMessage};

/// Per-mount settings, fixed for the life of the server.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub starter: Starter,
    pub auto_rebuild: bool,
    pub title: String,
    pub tab_size: u8,
    pub quiet_period: Duration,
    pub keymap: Keymap,
}

impl SessionSettings {
    pub fn from_config(config: &PlaygroundConfig) -> Self {
        Self {
            starter: config.starter(),
            auto_rebuild: config.editor.auto_rebuild,
            title: config.preview.title.clone(),
            tab_size: config.editor.tab_size,
            quiet_period: config.editor.quiet_period(),
            keymap: Keymap::default(),
        }
    }

    fn mount(&self) -> Playground {
        Playground::new(self.starter.clone(), self.auto_rebuild, &self.title)
    }
}

pub struct PlaygroundActor {
    rx: mpsc::Receiver<PlaygroundMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    host: Arc<PreviewHost>,
    timer: DebounceTimer,
    settings: SessionSettings,
    state: Playground,
    clients: FxHashSet<ClientId>,
}

impl PlaygroundActor {
    /// Mount the initial session and publish its document.
    ///
    /// `self_tx` must feed `rx`; the debounce timer fires through it.
    pub fn new(
        rx: mpsc::Receiver<PlaygroundMsg>,
        self_tx: mpsc::Sender<PlaygroundMsg>,
        ws_tx: mpsc::Sender<WsMsg>,
        host: Arc<PreviewHost>,
        settings: SessionSettings,
    ) -> Self {
        let state = settings.mount();
        host.publish(state.compiled().clone());
        Self {
            rx,
            ws_tx,
            host,
            timer: DebounceTimer::new(settings.quiet_period, self_tx),
            settings,
            state,
            clients: FxHashSet::default(),
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                PlaygroundMsg::Client { client, msg } => self.handle_client(client, msg).await,
                PlaygroundMsg::Joined(client) => self.attach(client).await,
                PlaygroundMsg::Left(client) => self.detach(client),
                PlaygroundMsg::Disk { slot, text } => self.handle_disk(slot, text).await,
                PlaygroundMsg::Fire { generation } => self.handle_fire(generation).await,
                PlaygroundMsg::Snapshot(reply) => {
                    let _ = reply.send(self.state.clone());
                }
                PlaygroundMsg::Shutdown => {
                    crate::debug!("playground"; "shutting down");
                    self.timer.cancel();
                    break;
                }
            }
        }
    }

    // ========================================================================
    // mount / unmount
    // ========================================================================

    async fn attach(&mut self, client: ClientId) {
        self.clients.insert(client);
        crate::debug!("playground"; "client {} attached (total: {})", client, self.clients.len());

        self.send_to(client, ServerMessage::connected(&self.settings.keymap))
            .await;
        self.send_to(client, ServerMessage::state(&self.state, self.settings.tab_size))
            .await;
    }

    fn detach(&mut self, client: ClientId) {
        if !self.clients.remove(&client) {
            return;
        }
        crate::debug!("playground"; "client {} detached (total: {})", client, self.clients.len());
        if self.clients.is_empty() {
            self.unmount();
        }
    }

    /// Discard the session: no timer survives, the next client gets a fresh mount.
    fn unmount(&mut self) {
        if self.timer.cancel() {
            crate::debug!("playground"; "pending rebuild dropped on unmount");
        }
        self.state = self.settings.mount();
        self.host.publish(self.state.compiled().clone());
    }

    // ========================================================================
    // client messages
    // ========================================================================

    async fn handle_client(&mut self, client: ClientId, msg: ClientMessage) {
        match msg {
            ClientMessage::Edit { slot, text, cursor } => {
                let schedule = self.state.set_buffer(slot, text, cursor);
                // Not echoed to the editor that produced it
                self.broadcast_except(client, ServerMessage::buffer(&self.state, slot))
                    .await;
                self.apply(schedule);
            }
            ClientMessage::Cursor { slot, offset } => {
                self.state.set_cursor(slot, offset);
            }
            ClientMessage::Tab { slot } => {
                crate::debug!("playground"; "client {} switched to {}", client, slot);
                self.state.select(slot);
                self.broadcast_except(client, ServerMessage::view(&self.state))
                    .await;
            }
            ClientMessage::Run => self.run_now().await,
            ClientMessage::Reset => self.reset().await,
            ClientMessage::ToggleAuto => self.toggle_auto().await,
            ClientMessage::Expand { overflow } => {
                if self.state.expand(overflow) {
                    self.broadcast(ServerMessage::expanded()).await;
                }
            }
            ClientMessage::Collapse => {
                if let Some(restore) = self.state.collapse() {
                    self.broadcast(ServerMessage::collapsed(restore.overflow))
                        .await;
                }
            }
            ClientMessage::Key(press) => self.handle_key(&press).await,
        }
    }

    async fn handle_key(&mut self, press: &KeyPress) {
        let Some(command) = self.settings.keymap.resolve(press).cloned() else {
            crate::debug!("playground"; "unbound key: {}", press.key);
            return;
        };
        match command {
            Command::Run => self.run_now().await,
            Command::InsertText { text } => {
                let schedule = self.state.insert_text(&text);
                let slot = self.state.active();
                self.broadcast(ServerMessage::buffer(&self.state, slot))
                    .await;
                self.apply(schedule);
            }
            Command::Collapse => {
                if let Some(restore) = self.state.escape() {
                    self.broadcast(ServerMessage::collapsed(restore.overflow))
                        .await;
                }
            }
        }
    }

    async fn handle_disk(&mut self, slot: Slot, text: String) {
        crate::log!("watch"; "{} changed, updating {} tab", slot.file_name(), slot.label());
        self.state.update_starter(slot, &text);
        let schedule = self.state.set_buffer(slot, text, None);
        self.broadcast(ServerMessage::buffer(&self.state, slot))
            .await;
        self.apply(schedule);
    }

    async fn handle_fire(&mut self, generation: u64) {
        if !self.timer.fired(generation) {
            crate::debug!("playground"; "stale timer fire (generation {})", generation);
            return;
        }
        if !self.state.auto_rebuild() {
            return;
        }
        self.state.rebuild();
        self.publish().await;
    }

    // ========================================================================
    // actions
    // ========================================================================

    fn apply(&mut self, schedule: Schedule) {
        if schedule == Schedule::Arm {
            self.timer.arm();
        }
    }

    /// Explicit run: rebuild now, dropping any pending auto-rebuild.
    async fn run_now(&mut self) {
        self.timer.cancel();
        self.state.rebuild();
        self.publish().await;
    }

    async fn reset(&mut self) {
        self.timer.cancel();
        self.state.reset();
        for slot in Slot::ALL {
            self.broadcast(ServerMessage::buffer(&self.state, slot))
                .await;
        }
        self.broadcast(ServerMessage::view(&self.state)).await;
        self.publish().await;
    }

    async fn toggle_auto(&mut self) {
        let enabled = self.state.toggle_auto_rebuild();
        if !enabled {
            self.timer.cancel();
        }
        self.broadcast(ServerMessage::view(&self.state)).await;
        if enabled {
            self.publish().await;
        }
    }

    /// Hand the current document to the preview host and every client.
    async fn publish(&mut self) {
        let compiled = self.state.compiled().clone();
        crate::logger::status_success(&format!("rebuilt preview (r{})", compiled.revision));
        self.broadcast(ServerMessage::preview(&compiled)).await;
        self.host.publish(compiled);
    }

    // ========================================================================
    // delivery
    // ========================================================================

    async fn broadcast(&self, message: ServerMessage) {
        let _ = self.ws_tx.send(WsMsg::broadcast(message)).await;
    }

    async fn broadcast_except(&self, client: ClientId, message: ServerMessage) {
        let _ = self
            .ws_tx
            .send(WsMsg::Broadcast {
                message,
                except: Some(client),
            })
            .await;
    }

    async fn send_to(&self, client: ClientId, message: ServerMessage) {
        let _ = self.ws_tx.send(WsMsg::SendTo { client, message }).await;
    }
}
