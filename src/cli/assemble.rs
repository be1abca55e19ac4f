//! `livepad assemble`: render the source buffers to one document.
//!
//! Runs the same assembler as the preview, without a server. Useful for
//! exporting a sketch or checking what the iframe will receive.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::PlaygroundConfig;
use crate::log;
use crate::playground::{Slot, assemble_titled};

/// Assemble and write to `output`, or stdout when `None`.
pub fn assemble_document(config: &PlaygroundConfig, output: Option<&Path>) -> Result<()> {
    let document = render(config);

    match output {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log!("assemble"; "wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(document.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn render(config: &PlaygroundConfig) -> String {
    let starter = config.starter();
    assemble_titled(
        starter.get(Slot::Markup),
        starter.get(Slot::Style),
        starter.get(Slot::Script),
        &config.preview.title,
    )
}
