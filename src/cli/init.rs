//! `livepad init`: write starter files and a default `livepad.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::config::PlaygroundConfig;
use crate::log;
use crate::playground::{Slot, Starter};

/// Create the source files and config in `root`.
///
/// Refuses to touch an existing file unless `force` is set; nothing is
/// written when any target exists.
pub fn init_dir(root: &Path, config_name: &Path, force: bool) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create directory '{}'", root.display()))?;

    let files = planned_files(config_name)?;
    if !force {
        let existing: Vec<_> = files
            .iter()
            .map(|(name, _)| root.join(name))
            .filter(|path| path.exists())
            .collect();
        if !existing.is_empty() {
            let names: Vec<_> = existing.iter().map(|p| p.display().to_string()).collect();
            bail!(
                "{} already exist{}.\nUse `livepad init --force` to overwrite.",
                names.join(", "),
                if names.len() == 1 { "s" } else { "" }
            );
        }
    }

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = root.join(&name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        log!("init"; "wrote {}", name.display());
        written.push(path);
    }
    Ok(written)
}

fn planned_files(config_name: &Path) -> Result<Vec<(PathBuf, String)>> {
    let starter = Starter::default();
    let mut files: Vec<_> = Slot::ALL
        .into_iter()
        .map(|slot| (PathBuf::from(slot.file_name()), starter.get(slot).to_string()))
        .collect();
    let config_file = config_name
        .file_name()
        .map_or_else(|| PathBuf::from("livepad.toml"), PathBuf::from);
    files.push((config_file, PlaygroundConfig::template()?));
    Ok(files)
}
