use std::path::PathBuf;

use crate::playground::Slot;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// A debounced change to one of the source files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SlotChange {
    pub(super) slot: Slot,
    pub(super) path: PathBuf,
    pub(super) kind: ChangeKind,
}
