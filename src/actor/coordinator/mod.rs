//! Actor Coordinator - Wires up the Playground Actor System
//!
//! The Coordinator is a thin orchestrator that:
//! - Creates communication channels
//! - Wires up actors
//! - Runs them concurrently

mod runtime;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::FsActor;
use super::messages::{PlaygroundMsg, WsMsg};
use super::playground::{PlaygroundActor, SessionSettings};
use super::ws::{ShellOrigin, WsActor};
use crate::config::PlaygroundConfig;
use crate::playground::preview;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    config: Arc<PlaygroundConfig>,
    /// Address the shell page is served from; session sockets must come from it.
    http_addr: SocketAddr,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    /// Create from Arc<PlaygroundConfig>.
    pub fn with_config(config: Arc<PlaygroundConfig>) -> Self {
        let http_addr = SocketAddr::new(config.serve.interface, config.serve.port);
        Self {
            config,
            http_addr,
            shutdown_rx: None,
        }
    }

    /// Set the address the HTTP server actually bound.
    pub fn with_http_addr(mut self, addr: SocketAddr) -> Self {
        self.http_addr = addr;
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(mut self) -> Result<()> {
        let (playground_tx, playground_rx) = mpsc::channel::<PlaygroundMsg>(CHANNEL_BUFFER);
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        let serve = &self.config.serve;
        match crate::reload::server::start_ws_server_with_channel(
            serve.interface,
            serve.ws_port,
            ws_tx.clone(),
        ) {
            Ok(actual_port) => {
                crate::debug!("ws"; "ws://{}:{}", serve.interface, actual_port);
                crate::cli::serve::set_actual_ws_port(actual_port);
            }
            // The preview still serves; shells will report the editor unavailable
            Err(e) => crate::log!("error"; "websocket server failed: {}", e),
        }

        let settings = SessionSettings::from_config(&self.config);
        let fs_actor = self.spawn_watcher(&settings, playground_tx.clone());

        let playground_actor = PlaygroundActor::new(
            playground_rx,
            playground_tx.clone(),
            ws_tx.clone(),
            preview::shared(),
            settings,
        );
        let ws_actor = WsActor::new(
            ws_rx,
            playground_tx.clone(),
            ShellOrigin::new(self.http_addr),
        );

        // First document is published; the HTTP side may serve /preview now
        crate::core::set_serving();

        crate::debug!("actor"; "start");
        let shutdown_rx = self.shutdown_rx.take();
        runtime::run_actors(
            runtime::Actors {
                fs: fs_actor,
                playground: playground_actor,
                ws: ws_actor,
            },
            playground_tx,
            ws_tx,
            shutdown_rx,
        )
        .await?;

        crate::debug!("actor"; "stopped");
        Ok(())
    }

    /// Build the watcher for `source.dir`. A failed watch is logged and the
    /// session runs without disk sync.
    fn spawn_watcher(
        &self,
        settings: &SessionSettings,
        playground_tx: mpsc::Sender<PlaygroundMsg>,
    ) -> Option<FsActor> {
        if !self.config.source.watching() {
            return None;
        }
        let dir = self.config.source.dir.clone()?;
        match FsActor::new(dir.clone(), &settings.starter, playground_tx) {
            Ok(actor) => {
                crate::log!("watch"; "watching {}", dir.display());
                Some(actor)
            }
            Err(e) => {
                crate::log!("watch"; "watcher failed for {}: {}", dir.display(), e);
                None
            }
        }
    }
}
