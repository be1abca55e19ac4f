//! Playground configuration management for `livepad.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── editor     # [editor]
//! │   ├── preview    # [preview]
//! │   ├── serve      # [serve]
//! │   └── source     # [source]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # PlaygroundConfig (this file)
//! ```
//!
//! The file is optional: with none found, every section uses its defaults.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{EditorConfig, PreviewConfig, ServeConfig, SourceConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{Cli, Commands, ServeArgs},
    playground::Starter,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing livepad.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    /// Path of the loaded config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub serve: ServeConfig,

    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub source: SourceConfig,
}

impl PlaygroundConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file. The root is the
    /// config file's directory, or cwd when there is none.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (mut config, diag) = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                let (mut config, diag) = Self::from_path(&path)?;
                config.root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                config.config_path = Some(path);
                (config, diag)
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                let config = Self {
                    root: cwd,
                    ..Self::default()
                };
                (config, ConfigDiagnostics::new())
            }
        };

        config.apply_command_options(cli);
        config.normalize_paths();
        config.validate(diag)?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<(Self, ConfigDiagnostics)> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        let mut diag = ConfigDiagnostics::new();
        diag.unknown_fields(ignored);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        diag.print_warnings(&file_name);

        Ok((config, diag))
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Default file content written by `livepad init`.
    ///
    /// Points `[source] dir` at the config's own directory, where init
    /// writes the starter files.
    pub fn template() -> Result<String> {
        let mut config = Self::default();
        config.source.dir = Some(PathBuf::from("."));
        let body =
            toml::to_string_pretty(&config).context("Failed to serialize default config")?;
        Ok(format!(
            "# livepad configuration (v{})\n\n{body}",
            env!("CARGO_PKG_VERSION")
        ))
    }

    /// Starter buffers: the source directory if configured, else the
    /// built-in set.
    pub fn starter(&self) -> Starter {
        self.source
            .dir
            .as_deref()
            .map_or_else(Starter::default, Starter::from_dir)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Serve { args } => self.apply_serve_args(args),
            Commands::Assemble { args } => {
                if let Some(dir) = &args.dir {
                    self.source.dir = Some(dir.clone());
                }
                Self::update_option(&mut self.preview.title, args.title.as_ref());
            }
            Commands::Init { .. } => {}
        }
    }

    /// Apply serve arguments from CLI.
    fn apply_serve_args(&mut self, args: &ServeArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.serve.interface, args.interface.as_ref());
        Self::update_option(&mut self.serve.port, args.port.as_ref());
        Self::update_option(&mut self.editor.quiet_period, args.quiet_period.as_ref());
        Self::update_option(&mut self.editor.auto_rebuild, args.auto_rebuild.as_ref());
        Self::update_option(&mut self.source.watch, args.watch.as_ref());
        if let Some(dir) = &args.dir {
            self.source.dir = Some(dir.clone());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve the source directory against the root.
    fn normalize_paths(&mut self) {
        self.root = crate::utils::path::normalize_path(&self.root);
        if let Some(dir) = self.source.dir.take() {
            self.source.dir = Some(crate::utils::path::expand_under(&dir, &self.root));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, collecting all errors at once.
    pub fn validate(&self, mut diag: ConfigDiagnostics) -> Result<()> {
        self.serve.validate(&mut diag);
        self.editor.validate(&mut diag);
        self.preview.validate(&mut diag);
        self.source.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config content.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PlaygroundConfig {
    let (parsed, ignored) = PlaygroundConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("livepad").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = PlaygroundConfig::from_str("[serve\nport = 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config() {
        let config = PlaygroundConfig::default();
        assert!(config.config_path.is_none());
        assert_eq!(config.serve.port, 5277);
        assert_eq!(config.editor.quiet_period, 250);
        assert_eq!(config.preview.title, "Live Preview");
        assert!(config.source.dir.is_none());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[editor]\nquiet_period = 300\ntheme = \"dark\"\n[unknown_section]\nfield = 1";
        let (config, ignored) = PlaygroundConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.editor.quiet_period, 300);
        assert!(ignored.iter().any(|f| f == "editor.theme"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_serve_args_override() {
        let mut config = test_parse_config("[editor]\nauto_rebuild = true\nquiet_period = 100");
        config.apply_command_options(&cli(&["serve", "-q", "900", "--auto=false", "-p", "6000"]));

        assert_eq!(config.editor.quiet_period, 900);
        assert!(!config.editor.auto_rebuild);
        assert_eq!(config.serve.port, 6000);
        assert_eq!(config.serve.ws_port, 35729);
    }

    #[test]
    fn test_assemble_args_override() {
        let mut config = test_parse_config("[preview]\ntitle = \"From File\"");
        config.apply_command_options(&cli(&["assemble", "-t", "From CLI", "-d", "sketch"]));
        assert_eq!(config.preview.title, "From CLI");
        assert_eq!(config.source.dir, Some(PathBuf::from("sketch")));
    }

    #[test]
    fn test_source_dir_resolved_under_root() {
        let root = tempfile::TempDir::new().unwrap();
        fs::create_dir(root.path().join("sketch")).unwrap();

        let mut config = test_parse_config("[source]\ndir = \"sketch\"");
        config.root = root.path().to_path_buf();
        config.normalize_paths();

        let dir = config.source.dir.clone().unwrap();
        assert!(dir.is_absolute());
        assert!(dir.ends_with("sketch"));
        assert!(config.validate(ConfigDiagnostics::new()).is_ok());
    }

    #[test]
    fn test_validate_reports_every_section() {
        let config = test_parse_config(
            "[editor]\nquiet_period = 0\n[preview]\nsandbox = [\"allow-same-origin\"]",
        );
        let err = config.validate(ConfigDiagnostics::new()).unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics");
        };
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_template_round_trips() {
        let template = PlaygroundConfig::template().unwrap();
        let parsed = test_parse_config(&template);
        assert_eq!(parsed.serve.port, 5277);
        assert_eq!(parsed.preview.sandbox, ["allow-scripts", "allow-forms"]);
        assert_eq!(parsed.source.dir.as_deref(), Some(Path::new(".")));
    }

    #[test]
    fn test_starter_from_source_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<p>disk</p>").unwrap();
        let config = PlaygroundConfig {
            source: SourceConfig {
                dir: Some(dir.path().to_path_buf()),
                watch: true,
            },
            ..PlaygroundConfig::default()
        };
        assert_eq!(config.starter().markup, "<p>disk</p>");
    }
}
