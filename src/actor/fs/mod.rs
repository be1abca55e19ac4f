//! FileSystem Actor
//!
//! Watches the source directory and pushes changed files into the
//! playground buffers. The directory is read-only to livepad: nothing is
//! ever written back.
//!
//! Architecture:
//! ```text
//! Watcher → Debouncer (pure timing) → classify (path → slot) → PlaygroundMsg::Disk
//! ```

use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use super::messages::PlaygroundMsg;
use crate::playground::{Slot, Starter};

// Pure timing and deduplication.
mod debouncer;
// Shared fs event types.
mod types;

use debouncer::Debouncer;
use types::{ChangeKind, SlotChange};

/// FileSystem Actor - watches the source directory
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge), taken by `run`
    notify_rx: Option<std::sync::mpsc::Receiver<notify::Result<notify::Event>>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    dir: PathBuf,
    attached: bool,
    playground_tx: mpsc::Sender<PlaygroundMsg>,
    debouncer: Debouncer,
    /// Content hash per slot, to skip saves that changed nothing
    hashes: FxHashMap<Slot, u64>,
}

impl FsActor {
    /// Create the watcher immediately so no change between startup and
    /// `run` is lost.
    pub fn new(
        dir: PathBuf,
        starter: &Starter,
        playground_tx: mpsc::Sender<PlaygroundMsg>,
    ) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let hashes = Slot::ALL
            .into_iter()
            .map(|slot| (slot, content_hash(starter.get(slot))))
            .collect();

        Ok(Self {
            notify_rx: Some(notify_rx),
            watcher,
            dir,
            attached: true,
            playground_tx,
            debouncer: Debouncer::new(),
            hashes,
        })
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        let Some(notify_rx) = self.notify_rx.take() else {
            return;
        };
        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // Spawn a thread to poll notify events and send to async channel
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => self.debouncer.add_event(&event),
                _ = tokio::time::sleep(self.debouncer.sleep_duration()) => {
                    self.maintain_watch();
                    let Some(raw) = self.debouncer.take_if_ready() else {
                        continue;
                    };
                    let changes = classify(&self.dir, raw);
                    if self.push_changes(changes).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    /// Re-attach the watch if the directory was removed and recreated.
    fn maintain_watch(&mut self) {
        if !self.dir.exists() {
            self.attached = false;
            return;
        }
        if !self.attached && self.watcher.watch(&self.dir, RecursiveMode::NonRecursive).is_ok() {
            self.attached = true;
            crate::debug!("watch"; "re-attached watch: {}", self.dir.display());
        }
    }

    /// Read changed files and forward the ones whose content differs.
    ///
    /// Returns `Err(())` if the playground actor shut down.
    async fn push_changes(&mut self, changes: Vec<SlotChange>) -> Result<(), ()> {
        for change in changes {
            if change.kind == ChangeKind::Removed {
                crate::log!("watch"; "{} removed, keeping buffer", change.slot.file_name());
                continue;
            }
            let Some(text) = self.read_if_changed(&change) else {
                continue;
            };
            self.playground_tx
                .send(PlaygroundMsg::Disk {
                    slot: change.slot,
                    text,
                })
                .await
                .map_err(|_| ())?;
        }
        Ok(())
    }

    fn read_if_changed(&mut self, change: &SlotChange) -> Option<String> {
        let text = match std::fs::read_to_string(&change.path) {
            Ok(text) => text,
            Err(e) => {
                crate::logger::status_error(
                    &format!("failed to read {}", change.slot.file_name()),
                    &e.to_string(),
                );
                return None;
            }
        };
        let hash = content_hash(&text);
        if self.hashes.get(&change.slot) == Some(&hash) {
            crate::debug!("watch"; "{} {} without content change", change.slot.file_name(), change.kind.label());
            return None;
        }
        self.hashes.insert(change.slot, hash);
        Some(text)
    }
}

/// Keep only the three source files directly inside `dir`, in tab order.
fn classify(dir: &Path, raw: FxHashMap<PathBuf, ChangeKind>) -> Vec<SlotChange> {
    let mut changes: Vec<SlotChange> = raw
        .into_iter()
        .filter(|(path, _)| path.parent() == Some(dir))
        .filter_map(|(path, kind)| {
            let name = path.file_name()?.to_str()?;
            let slot = Slot::from_file_name(name)?;
            Some(SlotChange { slot, path, kind })
        })
        .collect();
    changes.sort_by_key(|c| c.slot.index());
    changes
}

fn content_hash(text: &str) -> u64 {
    crate::utils::hash::compute(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn raw(entries: &[(&Path, ChangeKind)]) -> FxHashMap<PathBuf, ChangeKind> {
        entries
            .iter()
            .map(|(p, k)| (p.to_path_buf(), *k))
            .collect()
    }

    #[test]
    fn test_classify_maps_source_files() {
        let dir = Path::new("/sketch");
        let changes = classify(
            dir,
            raw(&[
                (Path::new("/sketch/app.js"), ChangeKind::Modified),
                (Path::new("/sketch/index.html"), ChangeKind::Created),
                (Path::new("/sketch/readme.md"), ChangeKind::Modified),
                (Path::new("/sketch/nested/styles.css"), ChangeKind::Modified),
            ]),
        );

        let slots: Vec<_> = changes.iter().map(|c| c.slot).collect();
        assert_eq!(slots, [Slot::Markup, Slot::Script]);
        assert_eq!(changes[0].kind, ChangeKind::Created);
    }

    #[tokio::test]
    async fn test_push_changes_skips_unchanged_content() {
        let dir = TempDir::new().unwrap();
        let root = crate::utils::path::normalize_path(dir.path());
        let starter = Starter::default();
        fs::write(root.join("app.js"), &starter.script).unwrap();
        fs::write(root.join("styles.css"), "p{color:teal}").unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let mut actor = FsActor::new(root.clone(), &starter, tx).unwrap();

        let changes = classify(
            &root,
            raw(&[
                (root.join("app.js").as_path(), ChangeKind::Modified),
                (root.join("styles.css").as_path(), ChangeKind::Modified),
                (root.join("index.html").as_path(), ChangeKind::Removed),
            ]),
        );
        actor.push_changes(changes).await.unwrap();

        match rx.try_recv() {
            Ok(PlaygroundMsg::Disk { slot, text }) => {
                assert_eq!(slot, Slot::Style);
                assert_eq!(text, "p{color:teal}");
            }
            other => panic!("expected Disk, got {other:?}"),
        }
        assert!(rx.try_recv().is_err());

        // Same content again is skipped
        let again = classify(&root, raw(&[(root.join("styles.css").as_path(), ChangeKind::Modified)]));
        actor.push_changes(again).await.unwrap();
        assert!(rx.try_recv().is_err());
    }
}
