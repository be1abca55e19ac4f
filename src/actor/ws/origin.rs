//! Handshake origin check.
//!
//! Only the shell page served by our own HTTP server may open a session.
//! The sandboxed preview has an opaque origin and sends `Origin: null`,
//! which never matches.

use std::net::{IpAddr, SocketAddr};

/// The origin the shell is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellOrigin {
    interface: IpAddr,
    port: u16,
}

impl ShellOrigin {
    /// Origin of the HTTP server bound at `addr`.
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            interface: addr.ip(),
            port: addr.port(),
        }
    }

    /// Whether an `Origin` header value names the shell.
    ///
    /// An unspecified interface (`0.0.0.0`, `::`) accepts any host on the
    /// HTTP port. A loopback interface also accepts `localhost`.
    pub fn permits(&self, origin: &str) -> bool {
        let Some(authority) = origin.strip_prefix("http://") else {
            return false;
        };
        let Some((host, port)) = authority.rsplit_once(':') else {
            return false;
        };
        if port.parse::<u16>().ok() != Some(self.port) {
            return false;
        }
        if self.interface.is_unspecified() {
            return !host.is_empty();
        }

        let host = host.trim_start_matches('[').trim_end_matches(']');
        match host.parse::<IpAddr>() {
            Ok(ip) => ip == self.interface,
            Err(_) => self.interface.is_loopback() && host.eq_ignore_ascii_case("localhost"),
        }
    }
}
