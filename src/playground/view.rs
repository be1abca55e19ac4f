//! View State: active tab and the expanded preview overlay.
//!
//! While the overlay is open the page scroll is suppressed and an escape
//! listener is attached. Both are owned by [`Overlay`]: collapsing hands
//! back a [`ScrollRestore`] carrying the page overflow captured on expand.

use super::Slot;

/// Overflow value applied to the page while the overlay is open.
pub const SCROLL_LOCKED: &str = "hidden";

/// Resources held while the preview is expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// Page overflow before expanding.
    prior_overflow: String,
}

/// Instruction to put the page overflow back after collapsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRestore {
    pub overflow: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    active: Slot,
    overlay: Option<Overlay>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active: Slot::Markup,
            overlay: None,
        }
    }
}

impl ViewState {
    pub fn active(&self) -> Slot {
        self.active
    }

    pub fn select(&mut self, slot: Slot) {
        self.active = slot;
    }

    pub fn is_expanded(&self) -> bool {
        self.overlay.is_some()
    }

    /// Whether the escape listener is attached.
    pub fn listens_for_escape(&self) -> bool {
        self.overlay.is_some()
    }

    /// Open the overlay. Returns `false` if it was already open, in which
    /// case the originally captured overflow is kept.
    pub fn expand(&mut self, current_overflow: impl Into<String>) -> bool {
        if self.overlay.is_some() {
            return false;
        }
        self.overlay = Some(Overlay {
            prior_overflow: current_overflow.into(),
        });
        true
    }

    /// Close the overlay, releasing the scroll lock and escape listener.
    pub fn collapse(&mut self) -> Option<ScrollRestore> {
        self.overlay.take().map(|overlay| ScrollRestore {
            overflow: overlay.prior_overflow,
        })
    }

    /// Escape key. Only acts while the listener is attached.
    pub fn escape(&mut self) -> Option<ScrollRestore> {
        if !self.listens_for_escape() {
            return None;
        }
        self.collapse()
    }
}
