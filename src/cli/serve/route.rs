//! Request path routing.

use percent_encoding::percent_decode_str;

/// What a request path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The editor shell page
    Shell,
    /// Shell script
    ShellScript,
    /// Shell stylesheet
    ShellStyle,
    /// The assembled document, loaded by the sandboxed iframe
    Preview,
    NotFound,
}

impl Route {
    /// Resolve a raw request URL (query and fragment ignored).
    pub fn parse(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or("");
        let decoded = percent_decode_str(path).decode_utf8_lossy();

        match decoded.trim_end_matches('/') {
            "" | "/index.html" => Self::Shell,
            "/livepad.js" => Self::ShellScript,
            "/livepad.css" => Self::ShellStyle,
            "/preview" | "/preview.html" => Self::Preview,
            _ => Self::NotFound,
        }
    }
}
