//! Playground server: editor shell, preview document and session sockets.

mod lifecycle;
mod response;
mod route;

use crate::{
    config::{PlaygroundConfig, cfg},
    debug, log,
};
use anyhow::{Context, Result};
use crossbeam::channel;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use tiny_http::{Request, Server};

use route::Route;

/// Request worker threads
const POOL_THREADS: usize = 4;

/// Actual WebSocket port (may differ from `serve.ws_port` if the port was in use)
/// Updated by coordinator after WebSocket server binds successfully
static ACTUAL_WS_PORT: AtomicU16 = AtomicU16::new(0);

/// Update the actual WebSocket port (called by coordinator after binding)
pub fn set_actual_ws_port(port: u16) {
    ACTUAL_WS_PORT.store(port, Ordering::Relaxed);
}

/// Get the actual WebSocket port, falling back to the configured one
fn get_actual_ws_port(config: &PlaygroundConfig) -> u16 {
    match ACTUAL_WS_PORT.load(Ordering::Relaxed) {
        0 => config.serve.ws_port,
        port => port,
    }
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server without starting the request loop
///
/// Requests that arrive before the actors publish the first document
/// get the loading page.
pub fn bind_server() -> Result<BoundServer> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        addr,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Start the request loop (blocking).
    pub fn run(self) -> Result<()> {
        let config = cfg();
        let actor_handle =
            lifecycle::spawn_actors(Arc::clone(&config), self.addr, self.shutdown_rx);
        run_request_loop(&self.server)?;
        lifecycle::wait_for_shutdown(actor_handle);
        Ok(())
    }
}

fn run_request_loop(server: &Server) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(POOL_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let config = cfg();
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &PlaygroundConfig) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let route = Route::parse(request.url());
    debug!("serve"; "{} {} -> {:?}", request.method(), request.url(), route);

    match route {
        Route::ShellScript => response::respond_shell_js(request),
        Route::ShellStyle => response::respond_shell_css(request),
        Route::NotFound => response::respond_not_found(request),
        // Both pages need the actors up: the shell for its socket port,
        // the preview for its first document
        _ if !crate::core::is_serving() => response::respond_loading(request),
        Route::Shell => response::respond_shell(request, config, get_actual_ws_port(config)),
        Route::Preview => {
            let compiled = crate::playground::preview::shared().current();
            response::respond_preview(request, &compiled, &config.preview.policy())
        }
    }
}
