//! Playground Message Protocol
//!
//! JSON messages exchanged over the WebSocket between the shell and the
//! playground actor. Both directions are tagged by `type`.
//!
//! # Client → server
//!
//! - `edit`: buffer contents changed in an editor
//! - `cursor`: caret moved
//! - `tab`: active tab changed
//! - `run` / `reset` / `toggle_auto`: toolbar buttons
//! - `expand` / `collapse`: preview overlay
//! - `key`: a bound key chord was pressed
//!
//! # Server → client
//!
//! - `connected`: handshake with version and keymap
//! - `state`: full snapshot on connect
//! - `buffer`: server-side buffer change (reset, keybinding, disk)
//! - `view`: active tab and auto-rebuild flag
//! - `overlay`: expanded flag and page overflow to apply
//! - `preview`: new assembled document

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::playground::{
    Compiled, KeyPress, Keymap, Playground, SCROLL_LOCKED, Slot, buffer::SlotModel,
};

/// Message received from the shell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Edit {
        slot: Slot,
        text: String,
        /// UTF-16 caret offset after the edit.
        #[serde(default)]
        cursor: Option<usize>,
    },
    Cursor {
        slot: Slot,
        offset: usize,
    },
    Tab {
        slot: Slot,
    },
    Run,
    Reset,
    ToggleAuto,
    Expand {
        /// Page overflow before the overlay opened.
        #[serde(default)]
        overflow: String,
    },
    Collapse,
    Key(KeyPress),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unexpected {0} frame")]
    Frame(&'static str),
}

impl ClientMessage {
    pub fn from_json(s: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// One buffer as sent to the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferView {
    pub slot: Slot,
    pub text: String,
    pub cursor: usize,
}

impl BufferView {
    fn new(slot: Slot, model: &SlotModel) -> Self {
        Self {
            slot,
            text: model.text().to_string(),
            cursor: model.cursor(),
        }
    }
}

/// Message sent to the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected {
        version: String,
        keymap: Keymap,
    },
    State {
        buffers: Vec<BufferView>,
        active: Slot,
        auto_rebuild: bool,
        expanded: bool,
        tab_size: u8,
        preview: Compiled,
    },
    Buffer(BufferView),
    View {
        active: Slot,
        auto_rebuild: bool,
        expanded: bool,
    },
    Overlay {
        expanded: bool,
        /// Value to assign to the page's overflow style.
        overflow: String,
    },
    Preview(Compiled),
}

impl ServerMessage {
    pub fn connected(keymap: &Keymap) -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
            keymap: keymap.clone(),
        }
    }

    /// Full snapshot for a newly attached client.
    pub fn state(playground: &Playground, tab_size: u8) -> Self {
        Self::State {
            buffers: Slot::ALL
                .into_iter()
                .map(|slot| BufferView::new(slot, playground.buffers().get(slot)))
                .collect(),
            active: playground.active(),
            auto_rebuild: playground.auto_rebuild(),
            expanded: playground.view().is_expanded(),
            tab_size,
            preview: playground.compiled().clone(),
        }
    }

    pub fn buffer(playground: &Playground, slot: Slot) -> Self {
        Self::Buffer(BufferView::new(slot, playground.buffers().get(slot)))
    }

    pub fn view(playground: &Playground) -> Self {
        Self::View {
            active: playground.active(),
            auto_rebuild: playground.auto_rebuild(),
            expanded: playground.view().is_expanded(),
        }
    }

    /// Overlay opened: lock page scroll.
    pub fn expanded() -> Self {
        Self::Overlay {
            expanded: true,
            overflow: SCROLL_LOCKED.to_string(),
        }
    }

    /// Overlay closed: put back the captured overflow.
    pub fn collapsed(overflow: impl Into<String>) -> Self {
        Self::Overlay {
            expanded: false,
            overflow: overflow.into(),
        }
    }

    pub fn preview(compiled: &Compiled) -> Self {
        Self::Preview(compiled.clone())
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"view"}"#.to_string())
    }
}
