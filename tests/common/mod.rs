//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use correlation_demo::config::AppConfig;
use correlation_demo::http::HttpServer;
use correlation_demo::lifecycle::Shutdown;
use correlation_demo::telemetry::{CapturedTelemetry, TelemetryChannel};

/// Spawn the real API server on an ephemeral port with captured telemetry.
///
/// The returned `Shutdown` must be kept alive for the duration of the test.
#[allow(dead_code)]
pub async fn spawn_api_server() -> (SocketAddr, CapturedTelemetry, Shutdown) {
    let (telemetry, captured) = TelemetryChannel::capture();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(AppConfig::default(), telemetry);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Give the server a moment to start accepting.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    (addr, captured, shutdown)
}

/// One request observed by the mock backend.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct CapturedRequest {
    pub path: String,
    pub correlation_id: Option<String>,
}

/// A raw-TCP mock backend that records inbound requests.
#[allow(dead_code)]
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a mock backend whose response status is scripted per attempt (the
/// last status repeats). The `x-correlation-id` request header, when
/// present, is echoed on the response.
#[allow(dead_code)]
pub async fn start_scripted_backend(statuses: Vec<u16>, body: &'static str) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let captured = requests.clone();

    tokio::spawn(async move {
        let mut attempt = 0usize;
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(_) => break,
            };
            let status = statuses
                .get(attempt)
                .or(statuses.last())
                .copied()
                .unwrap_or(200);
            attempt += 1;

            // Read until the end of the request headers.
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        buf.extend_from_slice(&chunk[..n]);
                        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                }
            }
            let text = String::from_utf8_lossy(&buf);
            let path = text
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("/")
                .to_string();
            let correlation_id = text.lines().find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.trim().eq_ignore_ascii_case("x-correlation-id") {
                    Some(value.trim().to_string())
                } else {
                    None
                }
            });
            captured.lock().unwrap().push(CapturedRequest {
                path,
                correlation_id: correlation_id.clone(),
            });

            let reason = match status {
                200 => "OK",
                404 => "Not Found",
                500 => "Internal Server Error",
                503 => "Service Unavailable",
                _ => "OK",
            };
            let echo = correlation_id
                .map(|id| format!("x-correlation-id: {}\r\n", id))
                .unwrap_or_default();
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                echo,
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    MockBackend { addr, requests }
}
