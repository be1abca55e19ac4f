use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::messages::{PlaygroundMsg, WsMsg};
use crate::actor::playground::PlaygroundActor;
use crate::actor::ws::WsActor;

/// Grace period for actors to drain after shutdown is sent.
const DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

pub(super) struct Actors {
    pub fs: Option<FsActor>,
    pub playground: PlaygroundActor,
    pub ws: WsActor,
}

/// Run all actors concurrently.
pub(super) async fn run_actors(
    actors: Actors,
    playground_tx: mpsc::Sender<PlaygroundMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) -> Result<()> {
    let Actors { fs, playground, ws } = actors;

    let playground_handle = tokio::spawn(async move { playground.run().await });
    let ws_handle = tokio::spawn(async move { ws.run().await });
    let fs_handle = fs.map(|fs| tokio::spawn(async move { fs.run().await }));

    let Some(rx) = shutdown_rx else {
        // No signal to wait for: run until the session ends on its own
        let _ = playground_handle.await;
        let _ = ws_tx.send(WsMsg::Shutdown).await;
        let _ = tokio::time::timeout(DRAIN_TIMEOUT, ws_handle).await;
        if let Some(handle) = fs_handle {
            handle.abort();
        }
        return Ok(());
    };
    loop {
        if rx.try_recv().is_ok() {
            crate::debug!("actor"; "shutdown signal received");
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    crate::debug!("actor"; "sending shutdown to playground");
    let _ = playground_tx.send(PlaygroundMsg::Shutdown).await;
    let _ = ws_tx.send(WsMsg::Shutdown).await;

    let _ = tokio::time::timeout(DRAIN_TIMEOUT, playground_handle).await;
    let _ = tokio::time::timeout(DRAIN_TIMEOUT, ws_handle).await;
    if let Some(handle) = fs_handle {
        handle.abort();
    }

    Ok(())
}
