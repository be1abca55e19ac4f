//! Preview Host.
//!
//! The assembled document is rendered in a sandboxed frame that may run
//! scripts and submit forms but cannot navigate the parent, reach its
//! storage or load plugins. Each new document replaces the previous one
//! wholesale.

use std::fmt;
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
use serde::Serialize;

/// One assembled document and the rebuild that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compiled {
    pub document: String,
    /// Assembler invocations since mount (0 = initial starter assembly).
    pub revision: u64,
}

// =============================================================================
// Sandbox policy
// =============================================================================

/// Tokens that may be granted to the preview frame.
pub const PERMITTED_TOKENS: &[&str] = &[
    "allow-scripts",
    "allow-forms",
    "allow-modals",
    "allow-popups",
];

/// Tokens that would break isolation from the parent page.
pub const FORBIDDEN_TOKENS: &[&str] = &[
    "allow-same-origin",
    "allow-top-navigation",
    "allow-top-navigation-by-user-activation",
    "allow-top-navigation-to-custom-protocols",
    "allow-popups-to-escape-sandbox",
    "allow-storage-access-by-user-activation",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SandboxError {
    #[error("`{0}` would let the preview escape its sandbox")]
    Escapes(String),
    #[error("unknown sandbox token `{0}`")]
    Unknown(String),
}

/// Ordered, deduplicated set of sandbox tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxPolicy {
    tokens: Vec<&'static str>,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self {
            tokens: vec!["allow-scripts", "allow-forms"],
        }
    }
}

impl SandboxPolicy {
    /// Build a policy, rejecting tokens that break isolation.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, SandboxError> {
        let mut accepted: Vec<&'static str> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref().trim();
            if FORBIDDEN_TOKENS.contains(&token) {
                return Err(SandboxError::Escapes(token.to_string()));
            }
            let Some(known) = PERMITTED_TOKENS.iter().find(|t| **t == token) else {
                return Err(SandboxError::Unknown(token.to_string()));
            };
            if !accepted.contains(known) {
                accepted.push(known);
            }
        }
        Ok(Self { tokens: accepted })
    }

    #[cfg(test)]
    pub fn allows(&self, token: &str) -> bool {
        self.tokens.contains(&token)
    }

    /// Value for the iframe `sandbox` attribute.
    pub fn attribute(&self) -> String {
        self.tokens.join(" ")
    }

    /// Value for a `Content-Security-Policy` header serving the document
    /// directly.
    pub fn csp_header(&self) -> String {
        if self.tokens.is_empty() {
            "sandbox".to_string()
        } else {
            format!("sandbox {}", self.attribute())
        }
    }
}

impl fmt::Display for SandboxPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.attribute())
    }
}

// =============================================================================
// Preview host
// =============================================================================

/// Latest published document, readable from any thread.
pub struct PreviewHost {
    current: ArcSwap<Compiled>,
}

/// Host shared between the playground actor and the HTTP server.
static SHARED: LazyLock<Arc<PreviewHost>> = LazyLock::new(|| Arc::new(PreviewHost::new()));

/// Shared preview host for this process.
pub fn shared() -> Arc<PreviewHost> {
    Arc::clone(&SHARED)
}

impl Default for PreviewHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewHost {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Compiled {
                document: String::new(),
                revision: 0,
            }),
        }
    }

    /// Replace the rendered document wholesale.
    pub fn publish(&self, compiled: Compiled) {
        self.current.store(Arc::new(compiled));
    }

    pub fn current(&self) -> Arc<Compiled> {
        self.current.load_full()
    }
}
