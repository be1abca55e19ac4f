//! Embedded static resources for livepad.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Editor shell (shell.html, shell.js, shell.css) and loading page
//!
//! # Usage
//!
//! ```ignore
//! use embed::serve::{SHELL_HTML, ShellVars};
//!
//! let html = SHELL_HTML.render(&ShellVars {
//!     title: "Live Preview",
//!     version: "0.1.0",
//!     ws_port: 35729,
//!     sandbox: "allow-scripts allow-forms",
//!     tab_size: 2,
//! });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};
    use crate::utils::html::{escape, escape_attr};

    /// Variables for shell.html.
    pub struct ShellVars<'a> {
        pub title: &'a str,
        pub version: &'a str,
        pub ws_port: u16,
        /// Rendered `sandbox` attribute value.
        pub sandbox: &'a str,
        pub tab_size: u8,
    }

    impl TemplateVars for ShellVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__TITLE__", &escape(self.title))
                .replace("__VERSION__", self.version)
                .replace("__WS_PORT__", &self.ws_port.to_string())
                .replace("__SANDBOX__", &escape_attr(self.sandbox))
                .replace("__TAB_SIZE__", &self.tab_size.to_string())
        }
    }

    /// Editor shell page.
    pub const SHELL_HTML: Template<ShellVars<'static>> =
        Template::new(include_str!("serve/shell.html"));

    /// Editor shell script, minified by build.rs.
    pub const SHELL_JS: &str = include_str!(concat!(env!("OUT_DIR"), "/shell.min.js"));

    /// Editor shell stylesheet, minified by build.rs.
    pub const SHELL_CSS: &str = include_str!(concat!(env!("OUT_DIR"), "/shell.min.css"));

    /// Shown until the actors publish the first document.
    pub const LOADING_HTML: &str = include_str!("serve/loading.html");
}

#[cfg(test)]
mod tests {
    use super::serve::*;

    fn vars(title: &str) -> ShellVars<'_> {
        ShellVars {
            title,
            version: "0.1.0",
            ws_port: 35730,
            sandbox: "allow-scripts allow-forms",
            tab_size: 4,
        }
    }

    #[test]
    fn test_shell_placeholders_filled() {
        let html = SHELL_HTML.render(&vars("Live Preview"));
        assert!(!html.contains("__"));
        assert!(html.contains(r#"data-ws-port="35730""#));
        assert!(html.contains(r#"sandbox="allow-scripts allow-forms""#));
        assert!(html.contains(r#"data-tab-size="4""#));
        assert!(html.contains("<title>Live Preview</title>"));
    }

    #[test]
    fn test_shell_title_escaped() {
        let html = SHELL_HTML.render(&vars("<b>x</b>"));
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(!html.contains("<b>x</b>"));
    }

    #[test]
    fn test_shell_assets_embedded() {
        assert!(!SHELL_JS.is_empty());
        assert!(!SHELL_CSS.is_empty());
        assert!(LOADING_HTML.contains("Loading editor"));
    }

    /// Source of the shell script, before minification.
    const SHELL_JS_SOURCE: &str = include_str!("serve/shell.js");

    fn handler<'a>(source: &'a str, start: &str) -> &'a str {
        let at = source.find(start).expect("handler present");
        let rest = &source[at..];
        &rest[..rest.find("};").expect("handler closed")]
    }

    #[test]
    fn test_shell_scroll_lock_on_root() {
        assert!(SHELL_JS_SOURCE.contains("document.documentElement"));
        assert!(!SHELL_JS_SOURCE.contains("body.style.overflow"));
    }

    #[test]
    fn test_shell_collapses_when_socket_closes() {
        let onclose = handler(SHELL_JS_SOURCE, "socket.onclose");
        assert!(onclose.contains("setExpanded(false)"));
    }

    #[test]
    fn test_shell_inserts_bound_text_locally() {
        let at = SHELL_JS_SOURCE
            .find("document.addEventListener(\"keydown\"")
            .unwrap();
        let keydown = &SHELL_JS_SOURCE[at..];
        let insert = keydown
            .find("insertText(buffers[active], binding.text)")
            .expect("local insertion");
        // The insertion returns before any `key` message is sent
        let after = &keydown[insert..];
        assert!(after.find("return;").unwrap() < after.find("type: \"key\"").unwrap());
    }
}
