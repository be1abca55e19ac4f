//! The three editable source slots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three editable buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Markup,
    Style,
    Script,
}

impl Slot {
    /// All slots in tab order.
    pub const ALL: [Slot; 3] = [Slot::Markup, Slot::Style, Slot::Script];

    /// Tab label shown in the shell.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Markup => "HTML",
            Self::Style => "CSS",
            Self::Script => "JS",
        }
    }

    /// File name inside a source directory.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Markup => "index.html",
            Self::Style => "styles.css",
            Self::Script => "app.js",
        }
    }

    /// Map a source directory file name back to its slot.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.file_name() == name)
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Markup => 0,
            Self::Style => 1,
            Self::Script => 2,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markup => "markup",
            Self::Style => "style",
            Self::Script => "script",
        })
    }
}
