//! LivePlayground state.
//!
//! [`Playground`] owns the buffers, the view flags and the last compiled
//! document. It is synchronous: timer handling lives in the actor, which
//! arms the debounce whenever an edit returns [`Schedule::Arm`].
//!
//! # Module Structure
//!
//! - `slot` - The three buffer slots
//! - `starter` - Starter buffers
//! - `buffer` - Buffer Store (text + cursor per slot)
//! - `assemble` - Document Assembler
//! - `preview` - Preview Host and sandbox policy
//! - `view` - Active tab and expanded overlay
//! - `keymap` - Editor keybindings

pub mod assemble;
pub mod buffer;
pub mod keymap;
pub mod preview;
pub mod slot;
pub mod starter;
pub mod view;

pub use assemble::assemble_titled;
pub use buffer::BufferStore;
pub use keymap::{Command, KeyPress, Keymap};
pub use preview::{Compiled, PreviewHost, SandboxPolicy};
pub use slot::Slot;
pub use starter::Starter;
pub use view::{SCROLL_LOCKED, ScrollRestore, ViewState};

/// Whether an edit needs a debounced rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Auto-rebuild is on: (re)arm the quiet-period timer.
    Arm,
    /// Auto-rebuild is off: wait for an explicit run.
    Idle,
}

/// The playground session state.
#[derive(Debug, Clone)]
pub struct Playground {
    starter: Starter,
    buffers: BufferStore,
    view: ViewState,
    auto_rebuild: bool,
    title: String,
    compiled: Compiled,
}

impl Playground {
    /// Mount a session: starter buffers, markup tab, initial assembly.
    pub fn new(starter: Starter, auto_rebuild: bool, title: impl Into<String>) -> Self {
        let buffers = BufferStore::from_starter(&starter);
        let title = title.into();
        let document = assemble_titled(
            buffers.text(Slot::Markup),
            buffers.text(Slot::Style),
            buffers.text(Slot::Script),
            &title,
        );
        Self {
            starter,
            buffers,
            view: ViewState::default(),
            auto_rebuild,
            title,
            compiled: Compiled {
                document,
                revision: 0,
            },
        }
    }

    pub fn buffers(&self) -> &BufferStore {
        &self.buffers
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn compiled(&self) -> &Compiled {
        &self.compiled
    }

    pub fn auto_rebuild(&self) -> bool {
        self.auto_rebuild
    }

    pub fn active(&self) -> Slot {
        self.view.active()
    }

    // ========================================================================
    // buffer edits
    // ========================================================================

    /// Replace a buffer. Never rejects content.
    pub fn set_buffer(&mut self, slot: Slot, text: String, cursor: Option<usize>) -> Schedule {
        self.buffers.set(slot, text, cursor);
        self.schedule()
    }

    /// Insert at the cursor of the active slot.
    pub fn insert_text(&mut self, text: &str) -> Schedule {
        self.buffers.insert_at_cursor(self.view.active(), text);
        self.schedule()
    }

    pub fn set_cursor(&mut self, slot: Slot, offset: usize) {
        self.buffers.set_cursor(slot, offset);
    }

    /// Change what reset restores for one slot.
    pub fn update_starter(&mut self, slot: Slot, text: &str) {
        self.starter.set(slot, text);
    }

    fn schedule(&self) -> Schedule {
        if self.auto_rebuild {
            Schedule::Arm
        } else {
            Schedule::Idle
        }
    }

    // ========================================================================
    // rebuilds
    // ========================================================================

    /// Assemble the current buffers and store the result.
    ///
    /// Used both by the debounce timer and by an explicit run.
    pub fn rebuild(&mut self) -> &Compiled {
        let document = assemble_titled(
            self.buffers.text(Slot::Markup),
            self.buffers.text(Slot::Style),
            self.buffers.text(Slot::Script),
            &self.title,
        );
        self.compiled = Compiled {
            document,
            revision: self.compiled.revision + 1,
        };
        &self.compiled
    }

    /// Restore the starter buffers, select markup and rebuild.
    pub fn reset(&mut self) -> &Compiled {
        self.buffers.reset(&self.starter);
        self.view.select(Slot::Markup);
        self.rebuild()
    }

    /// Set auto-rebuild. Enabling it rebuilds immediately.
    ///
    /// Returns `true` if a rebuild happened.
    pub fn set_auto_rebuild(&mut self, enabled: bool) -> bool {
        self.auto_rebuild = enabled;
        if enabled {
            self.rebuild();
        }
        enabled
    }

    pub fn toggle_auto_rebuild(&mut self) -> bool {
        self.set_auto_rebuild(!self.auto_rebuild)
    }

    // ========================================================================
    // view
    // ========================================================================

    pub fn select(&mut self, slot: Slot) {
        self.view.select(slot);
    }

    pub fn expand(&mut self, current_overflow: impl Into<String>) -> bool {
        self.view.expand(current_overflow)
    }

    pub fn collapse(&mut self) -> Option<ScrollRestore> {
        self.view.collapse()
    }

    pub fn escape(&mut self) -> Option<ScrollRestore> {
        self.view.escape()
    }
}

#[cfg(test)]
mod tests {
    use super::assemble::{DEFAULT_TITLE, assemble};
    use super::*;

    fn playground() -> Playground {
        Playground::new(Starter::default(), true, DEFAULT_TITLE)
    }

    fn expected(pg: &Playground) -> String {
        let b = pg.buffers();
        assemble(b.text(Slot::Markup), b.text(Slot::Style), b.text(Slot::Script))
    }

    #[test]
    fn test_mount_assembles_starter() {
        let pg = playground();
        let starter = Starter::default();
        assert_eq!(pg.compiled().revision, 0);
        assert_eq!(
            pg.compiled().document,
            assemble(&starter.markup, &starter.style, &starter.script)
        );
        assert_eq!(pg.active(), Slot::Markup);
        assert!(!pg.view().is_expanded());
    }

    #[test]
    fn test_edit_lags_until_rebuild() {
        let mut pg = playground();
        let before = pg.compiled().clone();

        assert_eq!(pg.set_buffer(Slot::Markup, "<p>a</p>".into(), None), Schedule::Arm);
        assert_eq!(pg.set_buffer(Slot::Markup, "<p>ab</p>".into(), None), Schedule::Arm);
        assert_eq!(pg.compiled(), &before);

        pg.rebuild();
        assert_eq!(pg.compiled().revision, 1);
        assert_eq!(pg.compiled().document, expected(&pg));
        assert!(pg.compiled().document.contains("<p>ab</p>"));
    }

    #[test]
    fn test_edit_idle_when_auto_off() {
        let mut pg = Playground::new(Starter::default(), false, DEFAULT_TITLE);
        assert_eq!(pg.set_buffer(Slot::Style, "p{}".into(), None), Schedule::Idle);
        assert_eq!(pg.compiled().revision, 0);
    }

    #[test]
    fn test_reset_restores_constants_and_markup_tab() {
        let mut pg = playground();
        pg.set_buffer(Slot::Script, "x".into(), None);
        pg.select(Slot::Script);

        pg.reset();
        let starter = Starter::default();
        assert_eq!(pg.buffers().text(Slot::Script), starter.script);
        assert_eq!(pg.active(), Slot::Markup);
        assert_eq!(
            pg.compiled().document,
            assemble(&starter.markup, &starter.style, &starter.script)
        );
        assert_eq!(pg.compiled().revision, 1);
    }

    #[test]
    fn test_enable_auto_rebuilds_immediately() {
        let mut pg = Playground::new(Starter::default(), false, DEFAULT_TITLE);
        pg.set_buffer(Slot::Markup, "<i>new</i>".into(), None);
        assert!(!pg.compiled().document.contains("<i>new</i>"));

        assert!(pg.toggle_auto_rebuild());
        assert!(pg.auto_rebuild());
        assert!(pg.compiled().document.contains("<i>new</i>"));
    }

    #[test]
    fn test_disable_auto_does_not_rebuild() {
        let mut pg = playground();
        assert!(!pg.toggle_auto_rebuild());
        assert_eq!(pg.compiled().revision, 0);
    }

    #[test]
    fn test_tab_switch_leaves_compiled() {
        let mut pg = playground();
        let before = pg.compiled().clone();
        pg.select(Slot::Style);
        assert_eq!(pg.active(), Slot::Style);
        assert_eq!(pg.compiled(), &before);
    }

    #[test]
    fn test_insert_text_uses_active_slot_cursor() {
        let mut pg = playground();
        pg.set_buffer(Slot::Style, "ab".into(), Some(1));
        pg.select(Slot::Style);

        assert_eq!(pg.insert_text("\n"), Schedule::Arm);
        assert_eq!(pg.buffers().text(Slot::Style), "a\nb");
    }

    #[test]
    fn test_updated_starter_used_by_reset() {
        let mut pg = playground();
        pg.update_starter(Slot::Style, "body{margin:0}");
        assert_ne!(pg.buffers().text(Slot::Style), "body{margin:0}");

        pg.reset();
        assert_eq!(pg.buffers().text(Slot::Style), "body{margin:0}");
    }

    #[test]
    fn test_custom_title_survives_rebuild() {
        let mut pg = Playground::new(Starter::default(), true, "Sketch");
        assert!(pg.compiled().document.contains("<title>Sketch</title>"));
        pg.rebuild();
        assert!(pg.compiled().document.contains("<title>Sketch</title>"));
    }
}
