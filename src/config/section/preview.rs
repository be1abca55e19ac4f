//! `[preview]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [preview]
//! title = "Live Preview"
//! sandbox = ["allow-scripts", "allow-forms"]
//! ```
//!
//! `allow-modals` and `allow-popups` may be added. Tokens that would let
//! the document reach the parent page (`allow-same-origin`,
//! `allow-top-navigation`, ...) are rejected.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::playground::SandboxPolicy;
use crate::playground::assemble::DEFAULT_TITLE;
use crate::playground::preview::PERMITTED_TOKENS;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// `<title>` of the assembled document.
    pub title: String,
    /// Sandbox tokens granted to the preview frame.
    pub sandbox: Vec<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            sandbox: SandboxPolicy::default()
                .attribute()
                .split(' ')
                .map(str::to_string)
                .collect(),
        }
    }
}

impl PreviewConfig {
    /// Resolved policy. Falls back to the default if the tokens are invalid;
    /// `validate` reports them before this is ever reached.
    pub fn policy(&self) -> SandboxPolicy {
        SandboxPolicy::from_tokens(&self.sandbox).unwrap_or_default()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Err(err) = SandboxPolicy::from_tokens(&self.sandbox) {
            diag.error_with_hint(
                FieldPath::new("preview.sandbox"),
                err.to_string(),
                format!("allowed tokens: {}", PERMITTED_TOKENS.join(", ")),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_preview_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.preview.title, "Live Preview");
        assert_eq!(config.preview.sandbox, ["allow-scripts", "allow-forms"]);
        assert_eq!(config.preview.policy(), SandboxPolicy::default());
    }

    #[test]
    fn test_preview_extra_tokens() {
        let config =
            test_parse_config("[preview]\nsandbox = [\"allow-scripts\", \"allow-modals\"]");
        let mut diag = ConfigDiagnostics::new();
        config.preview.validate(&mut diag);
        assert!(diag.is_empty());
        assert!(config.preview.policy().allows("allow-modals"));
        assert!(!config.preview.policy().allows("allow-forms"));
    }

    #[test]
    fn test_preview_rejects_same_origin() {
        let config = test_parse_config(
            "[preview]\nsandbox = [\"allow-scripts\", \"allow-same-origin\"]",
        );
        let mut diag = ConfigDiagnostics::new();
        config.preview.validate(&mut diag);

        assert_eq!(diag.len(), 1);
        let err = &diag.errors()[0];
        assert_eq!(err.field.as_str(), "preview.sandbox");
        assert!(err.message.contains("allow-same-origin"));
    }

    #[test]
    fn test_preview_rejects_top_navigation() {
        let config = test_parse_config("[preview]\nsandbox = [\"allow-top-navigation\"]");
        let mut diag = ConfigDiagnostics::new();
        config.preview.validate(&mut diag);
        assert!(!diag.is_empty());
    }
}
