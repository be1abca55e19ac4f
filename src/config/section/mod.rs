//! Configuration section definitions.
//!
//! Each module corresponds to a section in `livepad.toml`:
//!
//! | Module    | TOML Section | Purpose                               |
//! |-----------|--------------|---------------------------------------|
//! | `editor`  | `[editor]`   | Quiet period, auto-rebuild, tab size  |
//! | `preview` | `[preview]`  | Document title, sandbox tokens        |
//! | `serve`   | `[serve]`    | HTTP and WebSocket binding            |
//! | `source`  | `[source]`   | Source directory and watching         |

mod editor;
mod preview;
mod serve;
mod source;

pub use editor::EditorConfig;
pub use preview::PreviewConfig;
pub use serve::ServeConfig;
pub use source::SourceConfig;
