// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// Accept connections on `listener` until `shutdown` is notified.
///
/// In-flight connections keep running on their own tasks after the loop returns.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    shutdown: Arc<Notify>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => {
                logger::log_shutdown("Shutdown requested");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppState, Config};
    use crate::render::{PageRenderer, View};
    use crate::server::create_listener;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn test_state(dir: &TempDir, max_body_size: u64) -> Arc<AppState> {
        let mut cfg = Config::load_from("does-not-exist/config").unwrap();
        cfg.pages.data_dir = dir.path().to_string_lossy().into_owned();
        cfg.logging.access_log = false;
        cfg.http.max_body_size = max_body_size;
        let renderer =
            PageRenderer::from_sources([(View::View, "{{ body }}"), (View::Edit, "{{ title }}")])
                .unwrap();
        Arc::new(AppState::with_renderer(&cfg, renderer))
    }

    async fn send_raw(addr: std::net::SocketAddr, request: &[u8]) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serves_http_and_stops_on_shutdown() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, 1024);

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(listener, state, Arc::clone(&shutdown)));

        let response = send_raw(
            addr,
            b"GET /view/Nothing HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 302"), "got: {response}");
        assert!(response.to_ascii_lowercase().contains("location: /edit/nothing"));
        assert!(response.to_ascii_lowercase().contains("server: wiki-server/0.1"));

        shutdown.notify_one();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir, 8);

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(listener, state, Arc::clone(&shutdown)));

        let response = send_raw(
            addr,
            b"POST /save/Big HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
              Content-Type: application/x-www-form-urlencoded\r\nContent-Length: 20\r\n\r\n\
              body=0123456789abcde",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 413"), "got: {response}");
        assert!(!dir.path().join("Big.txt").exists());

        shutdown.notify_one();
        server.await.unwrap();
    }
}
