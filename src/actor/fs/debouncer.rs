use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use super::types::ChangeKind;

/// Editors often write a file in several steps (truncate, write, rename).
/// The playground applies its own quiet period afterwards, so this only
/// needs to cover a single save.
pub(super) const DEBOUNCE_MS: u64 = 100;

/// Pure debouncer: only handles timing and event deduplication.
pub(super) struct Debouncer {
    pub(super) changes: FxHashMap<PathBuf, ChangeKind>,
    pub(super) last_event: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new() -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
        }
    }

    /// Add a notify event, applying dedup rules:
    /// - Removed then Created/Modified: restored, keep the new kind
    /// - Modified then Removed: deleted
    /// - Created then Removed: never existed, discard
    /// - otherwise the first kind wins
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(modify) => {
                // mtime/chmod noise
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
                ChangeKind::Modified
            }
            _ => return,
        };

        crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }

            match (self.changes.get(path).copied(), kind) {
                (None, _) => {
                    self.changes.insert(path.clone(), kind);
                }
                (Some(ChangeKind::Removed), ChangeKind::Created | ChangeKind::Modified) => {
                    self.changes.insert(path.clone(), kind);
                }
                (Some(ChangeKind::Modified), ChangeKind::Removed) => {
                    self.changes.insert(path.clone(), ChangeKind::Removed);
                }
                (Some(ChangeKind::Created), ChangeKind::Removed) => {
                    self.changes.remove(path);
                }
                _ => {}
            }
            self.last_event = Some(Instant::now());
        }
    }

    /// Take events once the debounce window has passed.
    pub(super) fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        let changes = std::mem::take(&mut self.changes);
        (!changes.is_empty()).then_some(changes)
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        last_event.elapsed() >= Duration::from_millis(DEBOUNCE_MS) && !self.changes.is_empty()
    }

    /// Precise sleep duration until next possible ready time.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };
        Duration::from_millis(DEBOUNCE_MS)
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(path: &str, kind: notify::EventKind) -> notify::Event {
        notify::Event {
            kind,
            paths: vec![PathBuf::from(path)],
            attrs: Default::default(),
        }
    }

    fn modify() -> notify::EventKind {
        notify::EventKind::Modify(notify::event::ModifyKind::Data(
            notify::event::DataChange::Any,
        ))
    }

    fn create() -> notify::EventKind {
        notify::EventKind::Create(notify::event::CreateKind::File)
    }

    fn remove() -> notify::EventKind {
        notify::EventKind::Remove(notify::event::RemoveKind::File)
    }

    #[test]
    fn test_debouncer_empty() {
        let mut debouncer = Debouncer::new();
        assert!(!debouncer.is_ready());
        assert!(debouncer.take_if_ready().is_none());
        assert_eq!(debouncer.sleep_duration(), Duration::from_secs(86400));
    }

    #[test]
    fn test_not_ready_inside_window() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&event("/sketch/app.js", modify()));
        assert!(!debouncer.is_ready());
        assert!(debouncer.sleep_duration() <= Duration::from_millis(DEBOUNCE_MS));
    }

    #[test]
    fn test_ready_after_window() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&event("/sketch/app.js", modify()));
        debouncer.last_event = Some(Instant::now() - Duration::from_millis(DEBOUNCE_MS + 1));

        let changes = debouncer.take_if_ready().unwrap();
        assert_eq!(changes[&PathBuf::from("/sketch/app.js")], ChangeKind::Modified);
        assert!(debouncer.changes.is_empty());
        assert!(debouncer.last_event.is_none());
    }

    #[test]
    fn test_dedup_rules() {
        let mut debouncer = Debouncer::new();

        // Atomic save: remove then create
        debouncer.add_event(&event("/s/index.html", remove()));
        debouncer.add_event(&event("/s/index.html", create()));
        // Delete after edit
        debouncer.add_event(&event("/s/styles.css", modify()));
        debouncer.add_event(&event("/s/styles.css", remove()));
        // Transient file
        debouncer.add_event(&event("/s/app.js", create()));
        debouncer.add_event(&event("/s/app.js", remove()));

        assert_eq!(
            debouncer.changes[&PathBuf::from("/s/index.html")],
            ChangeKind::Created
        );
        assert_eq!(
            debouncer.changes[&PathBuf::from("/s/styles.css")],
            ChangeKind::Removed
        );
        assert!(!debouncer.changes.contains_key(&PathBuf::from("/s/app.js")));
    }

    #[test]
    fn test_ignores_editor_artifacts_and_metadata() {
        let mut debouncer = Debouncer::new();
        debouncer.add_event(&event("/s/.app.js.swp", modify()));
        debouncer.add_event(&event("/s/app.js~", modify()));
        debouncer.add_event(&event(
            "/s/app.js",
            notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
                notify::event::MetadataKind::WriteTime,
            )),
        ));
        assert!(debouncer.changes.is_empty());
        assert!(debouncer.last_event.is_none());
    }
}
