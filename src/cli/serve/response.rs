//! HTTP response handlers.

use crate::config::PlaygroundConfig;
use crate::embed::serve::{LOADING_HTML, SHELL_CSS, SHELL_HTML, SHELL_JS, ShellVars};
use crate::playground::{Compiled, SandboxPolicy};
use crate::utils::mime::types::{CSS, HTML, JAVASCRIPT, PLAIN};
use anyhow::Result;
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Respond with the editor shell page.
pub fn respond_shell(request: Request, config: &PlaygroundConfig, ws_port: u16) -> Result<()> {
    let policy = config.preview.policy();
    let body = SHELL_HTML.render(&ShellVars {
        title: &config.preview.title,
        version: env!("CARGO_PKG_VERSION"),
        ws_port,
        sandbox: &policy.attribute(),
        tab_size: config.editor.tab_size,
    });
    send_body(request, 200, HTML, body.into_bytes(), &[])
}

/// Respond with the shell script from memory.
pub fn respond_shell_js(request: Request) -> Result<()> {
    send_body(request, 200, JAVASCRIPT, SHELL_JS.as_bytes().to_vec(), &[])
}

/// Respond with the shell stylesheet from memory.
pub fn respond_shell_css(request: Request) -> Result<()> {
    send_body(request, 200, CSS, SHELL_CSS.as_bytes().to_vec(), &[])
}

/// Respond with the current assembled document.
///
/// The CSP `sandbox` directive repeats the iframe policy, so opening
/// `/preview` directly in a tab is confined the same way.
pub fn respond_preview(request: Request, compiled: &Compiled, policy: &SandboxPolicy) -> Result<()> {
    let revision = compiled.revision.to_string();
    let headers = [
        header("Content-Security-Policy", &policy.csp_header())?,
        header("Cache-Control", "no-store")?,
        header("X-Livepad-Revision", &revision)?,
    ];
    send_body(request, 200, HTML, compiled.document.clone().into_bytes(), &headers)
}

/// Respond with loading page (actors not ready).
pub fn respond_loading(request: Request) -> Result<()> {
    send_body(request, 503, HTML, LOADING_HTML.as_bytes().to_vec(), &[])
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec(), &[])
}

/// Respond with plain 404.
pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec(), &[])
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

/// Send a body, or only its headers for HEAD.
fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    extra: &[Header],
) -> Result<()> {
    let content_type = header("Content-Type", content_type)?;

    if is_head_request(&request) {
        let mut response = Response::empty(StatusCode(status)).with_header(content_type);
        for h in extra {
            response.add_header(h.clone());
        }
        request.respond(response)?;
        return Ok(());
    }

    let mut response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(content_type);
    for h in extra {
        response.add_header(h.clone());
    }
    request.respond(response)?;
    Ok(())
}

fn header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow::anyhow!("invalid header value for {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_rejects_non_ascii() {
        assert!(header("X-Test", "sandbox allow-scripts").is_ok());
        assert!(header("X-Test", "caf\u{e9}").is_err());
    }
}
