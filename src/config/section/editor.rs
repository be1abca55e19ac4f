//! `[editor]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [editor]
//! quiet_period = 250   # ms of inactivity before an edit rebuilds
//! auto_rebuild = true  # rebuild after edits without an explicit run
//! tab_size = 2         # spaces per indent level in the shell editors
//! ```

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Accepted `quiet_period` values in milliseconds.
pub const QUIET_PERIOD_RANGE: RangeInclusive<u64> = 1..=10_000;

/// Accepted `tab_size` values.
pub const TAB_SIZE_RANGE: RangeInclusive<u8> = 1..=8;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Debounce quiet period in milliseconds.
    pub quiet_period: u64,
    /// Initial auto-rebuild flag for each mounted session.
    pub auto_rebuild: bool,
    pub tab_size: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            quiet_period: 250,
            auto_rebuild: true,
            tab_size: 2,
        }
    }
}

impl EditorConfig {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !QUIET_PERIOD_RANGE.contains(&self.quiet_period) {
            diag.error_with_hint(
                FieldPath::new("editor.quiet_period"),
                format!("{} ms is out of range", self.quiet_period),
                format!(
                    "use a value between {} and {}",
                    QUIET_PERIOD_RANGE.start(),
                    QUIET_PERIOD_RANGE.end()
                ),
            );
        }
        if !TAB_SIZE_RANGE.contains(&self.tab_size) {
            diag.error_with_hint(
                FieldPath::new("editor.tab_size"),
                format!("{} is out of range", self.tab_size),
                format!(
                    "use a value between {} and {}",
                    TAB_SIZE_RANGE.start(),
                    TAB_SIZE_RANGE.end()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_editor_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.editor.quiet_period(), Duration::from_millis(250));
        assert!(config.editor.auto_rebuild);
        assert_eq!(config.editor.tab_size, 2);
    }

    #[test]
    fn test_editor_override() {
        let config = test_parse_config("[editor]\nquiet_period = 800\nauto_rebuild = false");
        assert_eq!(config.editor.quiet_period, 800);
        assert!(!config.editor.auto_rebuild);
    }

    #[test]
    fn test_editor_out_of_range() {
        let config = test_parse_config("[editor]\nquiet_period = 0\ntab_size = 12");
        let mut diag = ConfigDiagnostics::new();
        config.editor.validate(&mut diag);

        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["editor.quiet_period", "editor.tab_size"]);
    }

    #[test]
    fn test_editor_range_bounds_accepted() {
        let config = test_parse_config("[editor]\nquiet_period = 10000\ntab_size = 8");
        let mut diag = ConfigDiagnostics::new();
        config.editor.validate(&mut diag);
        assert!(diag.is_empty());
    }
}
