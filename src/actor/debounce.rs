//! Quiet-period timer for auto-rebuild.
//!
//! At most one timer task is pending. Re-arming aborts the previous task,
//! so a burst of edits produces one `Fire` after the last edit. Each arm
//! gets a new generation; a `Fire` that was already queued when its timer
//! got replaced carries an old generation and is ignored.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::messages::PlaygroundMsg;

pub struct DebounceTimer {
    quiet_period: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::Sender<PlaygroundMsg>,
}

impl DebounceTimer {
    pub fn new(quiet_period: Duration, tx: mpsc::Sender<PlaygroundMsg>) -> Self {
        Self {
            quiet_period,
            generation: 0,
            pending: None,
            tx,
        }
    }

    /// Restart the quiet period. Returns the new generation.
    pub fn arm(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;

        let generation = self.generation;
        let quiet_period = self.quiet_period;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            let _ = tx.send(PlaygroundMsg::Fire { generation }).await;
        }));
        generation
    }

    /// Drop the pending timer, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Accept a `Fire`. Returns `false` for a superseded or cancelled timer.
    pub fn fired(&mut self, generation: u64) -> bool {
        if self.pending.is_none() || generation != self.generation {
            return false;
        }
        self.pending = None;
        true
    }
}

impl Drop for DebounceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
