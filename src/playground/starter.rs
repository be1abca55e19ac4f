//! Starter buffers loaded on mount and restored by reset.

use std::fs;
use std::path::Path;

use super::Slot;

pub const STARTER_MARKUP: &str = r#"<div class="card">
  <h2 class="title">Hello</h2>
  <p class="sub">Edit HTML, CSS, JS and see changes instantly.</p>

  <div class="row">
    <button id="btn">Click me</button>
    <span class="hint">Try changing colors, text, or layout.</span>
  </div>

  <p id="out" class="out"></p>
</div>"#;

pub const STARTER_STYLE: &str = r#":root{
  --bg:#0b0c10;
  --panel: rgba(255,255,255,.04);
  --border: rgba(255,255,255,.12);
  --text: rgba(255,255,255,.92);
  --muted: rgba(255,255,255,.72);
}

*{ box-sizing:border-box; }

body{
  margin:0;
  font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif;
  background: var(--bg);
  color: var(--text);
  padding:24px;
}

.card{
  max-width: 560px;
  border:1px solid var(--border);
  background: var(--panel);
  border-radius: 16px;
  padding: 16px;
}

.title{ margin:0 0 10px 0; font-size: 22px; letter-spacing: -.2px; }
.sub{ margin:0 0 12px 0; color: var(--muted); }

.row{
  display:flex;
  align-items:center;
  gap:12px;
  flex-wrap: wrap;
}

button{
  padding: 10px 14px;
  border-radius: 12px;
  border: 1px solid rgba(255,255,255,.14);
  background: rgba(255,255,255,.08);
  color: #fff;
  cursor: pointer;
}

button:hover{ background: rgba(255,255,255,.12); }

.hint{
  font-size: 12px;
  color: rgba(255,255,255,.65);
}

.out{
  margin:12px 0 0 0;
  opacity:.9;
  font-size: 13px;
}"#;

pub const STARTER_SCRIPT: &str = r#"const btn = document.getElementById("btn");
const out = document.getElementById("out");

btn?.addEventListener("click", () => {
  out.textContent = "Button clicked at: " + new Date().toLocaleTimeString();
});"#;

/// The buffer set a session starts from and resets to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Starter {
    pub markup: String,
    pub style: String,
    pub script: String,
}

impl Default for Starter {
    fn default() -> Self {
        Self {
            markup: STARTER_MARKUP.to_string(),
            style: STARTER_STYLE.to_string(),
            script: STARTER_SCRIPT.to_string(),
        }
    }
}

impl Starter {
    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::Markup => &self.markup,
            Slot::Style => &self.style,
            Slot::Script => &self.script,
        }
    }

    /// Load a starter set from a source directory.
    ///
    /// Missing or unreadable files keep the built-in constant for that slot.
    pub fn from_dir(dir: &Path) -> Self {
        let mut starter = Self::default();
        for slot in Slot::ALL {
            let path = dir.join(slot.file_name());
            match fs::read_to_string(&path) {
                Ok(text) => *starter.get_mut(slot) = text,
                Err(e) => {
                    crate::debug!("source"; "{}: {}, using built-in starter", path.display(), e);
                }
            }
        }
        starter
    }

    /// Replace one slot, e.g. after its source file changed on disk.
    pub fn set(&mut self, slot: Slot, text: impl Into<String>) {
        *self.get_mut(slot) = text.into();
    }

    fn get_mut(&mut self, slot: Slot) -> &mut String {
        match slot {
            Slot::Markup => &mut self.markup,
            Slot::Style => &mut self.style,
            Slot::Script => &mut self.script,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_uses_constants() {
        let starter = Starter::default();
        assert_eq!(starter.get(Slot::Markup), STARTER_MARKUP);
        assert_eq!(starter.get(Slot::Style), STARTER_STYLE);
        assert_eq!(starter.get(Slot::Script), STARTER_SCRIPT);
    }

    #[test]
    fn test_from_dir_partial() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("styles.css"), "p{color:red}").unwrap();

        let starter = Starter::from_dir(dir.path());
        assert_eq!(starter.style, "p{color:red}");
        assert_eq!(starter.markup, STARTER_MARKUP);
        assert_eq!(starter.script, STARTER_SCRIPT);
    }

    #[test]
    fn test_starter_script_targets_starter_markup() {
        assert!(STARTER_MARKUP.contains("id=\"btn\""));
        assert!(STARTER_MARKUP.contains("id=\"out\""));
        assert!(STARTER_SCRIPT.contains("getElementById(\"btn\")"));
    }
}
