//! Document Assembler.
//!
//! Combines the three buffers into one standalone document:
//!
//! ```text
//! <!doctype html>
//! <html lang="en">
//! <head> meta, title, <style>STYLE</style> </head>
//! <body>
//!   MARKUP
//!   <script> try { SCRIPT } catch (e) { append <pre>JS Error: ...</pre> } </script>
//! </body>
//! </html>
//! ```
//!
//! Buffers are embedded verbatim. Isolation is the preview frame's job.

use crate::utils::html::escape;

pub const DEFAULT_TITLE: &str = "Live Preview";

/// Runtime guard appended after the author script.
const CATCH_BLOCK: &str = r#"    } catch (e) {
      const pre = document.createElement("pre");
      pre.setAttribute("data-livepad-error", "");
      pre.style.whiteSpace = "pre-wrap";
      pre.style.padding = "12px";
      pre.style.border = "1px solid rgba(255,255,255,.18)";
      pre.style.borderRadius = "12px";
      pre.style.background = "rgba(255,255,255,.06)";
      pre.style.color = "rgba(255,255,255,.92)";
      pre.textContent = "JS Error: " + ((e && e.message) || e);
      document.body.appendChild(pre);
    }
"#;

/// Assemble a preview document with the default title.
pub fn assemble(markup: &str, style: &str, script: &str) -> String {
    assemble_titled(markup, style, script, DEFAULT_TITLE)
}

/// Assemble a preview document.
pub fn assemble_titled(markup: &str, style: &str, script: &str, title: &str) -> String {
    let title = escape(title);
    let mut doc = String::with_capacity(markup.len() + style.len() + script.len() + 1024);

    doc.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    doc.push_str("  <meta charset=\"UTF-8\" />\n");
    doc.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n",
    );
    doc.push_str(&format!("  <title>{title}</title>\n"));
    doc.push_str("  <style>");
    doc.push_str(style);
    doc.push_str("</style>\n</head>\n<body>\n  ");
    doc.push_str(markup);
    doc.push_str("\n  <script>\n    try {\n");
    doc.push_str(script);
    // Newline before `}` so a trailing line comment cannot swallow the guard
    doc.push('\n');
    doc.push_str(CATCH_BLOCK);
    doc.push_str("  </script>\n</body>\n</html>");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERROR_PREFIX: &str = "JS Error: ";

    fn between<'a>(doc: &'a str, open: &str, close: &str) -> &'a str {
        let start = doc.find(open).unwrap() + open.len();
        let end = start + doc[start..].find(close).unwrap();
        &doc[start..end]
    }

    #[test]
    fn test_style_markup_script_embedded_verbatim() {
        let markup = "<p id='x'></p>";
        let style = "p{color:red}";
        let script = "document.getElementById('x').textContent='ok'";
        let doc = assemble(markup, style, script);

        assert!(doc.starts_with("<!doctype html>"));
        assert_eq!(between(&doc, "<style>", "</style>"), style);

        let body = between(&doc, "<body>", "</body>");
        assert!(body.contains(markup));

        // Script runs after the markup so the element exists
        let script_block = between(&doc, "<script>", "</script>");
        assert!(script_block.contains(script));
        assert!(body.find(markup).unwrap() < body.find("<script>").unwrap());
    }

    #[test]
    fn test_script_wrapped_in_guard() {
        let doc = assemble("", "", "throw new Error('boom')");
        let script_block = between(&doc, "<script>", "</script>");

        let try_at = script_block.find("try {").unwrap();
        let throw_at = script_block.find("throw new Error('boom')").unwrap();
        let catch_at = script_block.find("catch (e)").unwrap();
        assert!(try_at < throw_at && throw_at < catch_at);

        // The guard reports the message in a visible block
        assert!(script_block.contains("createElement(\"pre\")"));
        assert!(script_block.contains(ERROR_PREFIX));
        assert!(script_block.contains("e.message"));
        assert!(script_block.contains("document.body.appendChild(pre)"));
    }

    #[test]
    fn test_trailing_line_comment_does_not_break_guard() {
        let doc = assemble("", "", "let a = 1; // done");
        assert!(doc.contains("// done\n    } catch (e) {"));
    }

    #[test]
    fn test_no_sanitization() {
        let markup = "<img src=x onerror=\"alert(1)\"><b>unclosed";
        let doc = assemble(markup, "", "");
        assert!(doc.contains(markup));
    }

    #[test]
    fn test_title_escaped() {
        let doc = assemble_titled("", "", "", "<Demo & Co>");
        assert!(doc.contains("<title>&lt;Demo &amp; Co&gt;</title>"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(assemble("a", "b", "c"), assemble("a", "b", "c"));
        assert_ne!(assemble("a", "b", "c"), assemble("a", "b", "d"));
    }
}
