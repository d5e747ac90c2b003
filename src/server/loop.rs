// Server loop module
// Accepts connections until a shutdown is requested

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config;
use crate::logger;

/// Accept connections on `listener` until `shutdown` is notified
///
/// Must run inside a `LocalSet`: connections are served with `spawn_local`.
/// In-flight connections are not awaited on shutdown; they finish on their own
/// or are dropped with the runtime.
pub async fn run_server(
    listener: TcpListener,
    state: Arc<config::AppState>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
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

            () = shutdown.notified() => {
                logger::log_shutdown(active_connections.load(Ordering::SeqCst));
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppState, Config};
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::task::LocalSet;

    async fn roundtrip(addr: std::net::SocketAddr, request: &[u8]) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"hello audio").unwrap();

        let mut cfg = Config::load_from(dir.path().join("none").to_str().unwrap()).unwrap();
        cfg.library.audio_dir = dir.path().to_path_buf();
        cfg.logging.access_log = false;
        let state = Arc::new(AppState::new(cfg));

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());

        let local = LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(run_server(
                    listener,
                    state,
                    Arc::clone(&shutdown),
                ));

                let response = roundtrip(
                    addr,
                    b"GET /audio/a.mp3 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
                assert!(response.contains("content-type: audio/mpeg"), "{response}");
                assert!(response.ends_with("hello audio"), "{response}");

                let response = roundtrip(
                    addr,
                    b"GET /audio/..%2Fetc%2Fpasswd HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
                )
                .await;
                assert!(response.starts_with("HTTP/1.1 403 Forbidden"), "{response}");

                shutdown.notify_one();
                server.await.unwrap().unwrap();
            })
            .await;
    }
}
