//! `[source]` section configuration.
//!
//! Optional directory the starter buffers are read from.
//!
//! # Example
//!
//! ```toml
//! [source]
//! dir = "sketch"   # index.html, styles.css, app.js
//! watch = true     # push disk changes into the buffers
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source directory. Relative paths resolve against the config root.
    pub dir: Option<PathBuf>,
    pub watch: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: None,
            watch: true,
        }
    }
}

impl SourceConfig {
    /// Whether disk changes should reach the buffers.
    pub fn watching(&self) -> bool {
        self.watch && self.dir.is_some()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(dir) = &self.dir else {
            return;
        };
        if !dir.is_dir() {
            diag.error_with_hint(
                FieldPath::new("source.dir"),
                format!("`{}` is not a directory", dir.display()),
                "run `livepad init <dir>` to create one",
            );
        }
    }
}
