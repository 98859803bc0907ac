//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::time::Instant;

use node_fleet::config::FleetConfig;
use node_fleet::http::{ApiRequest, ApiResponse, Transport, TransportError};
pub use node_fleet::observability::logging::capture::capture_logs;

/// Anvil development keys; never used outside tests.
pub const KEY_A: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const KEY_B: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
pub const KEY_C: &str = "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

pub const STATS_BODY: &str =
    r#"{"data":{"has_node":true,"node_address":"0xnode","points":42,"pending_rewards":"1.5","total_distributed":"0","card_count":2}}"#;

/// One request as seen by the mock API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Handle to a running mock API.
#[derive(Clone)]
pub struct MockApi {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockApi {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }
}

/// Start a programmable mock API on an ephemeral port.
///
/// `handler` maps each parsed request to a status code and body. Every
/// response closes the connection.
pub async fn start_mock_api<F>(handler: F) -> MockApi
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let handler = handler.clone();
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let mut reader = BufReader::new(socket);
                let Ok(request) = read_request(&mut reader).await else {
                    return;
                };
                recorded.lock().unwrap().push(request.clone());
                let (status, body) = handler(&request);

                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let mut socket = reader.into_inner();
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockApi { addr, requests }
}

async fn read_request<R>(reader: &mut BufReader<R>) -> io::Result<RecordedRequest>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut line = String::new();
    reader.read_line(&mut line).await?;
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default();
    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (target.to_string(), String::new()),
    };

    let mut headers = Vec::new();
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).await?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((key, value)) = header.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await?;

    Ok(RecordedRequest {
        method,
        path,
        query,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Status",
    }
}

type Handler = dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync;

/// In-memory transport answering from a closure and recording call times.
#[derive(Clone)]
pub struct ScriptedTransport {
    handler: Arc<Handler>,
    calls: Arc<Mutex<Vec<(Instant, ApiRequest)>>>,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(Instant, ApiRequest)> {
        self.calls.lock().unwrap().clone()
    }

    /// Offsets from `origin` of every call to `path`.
    pub fn offsets(&self, path: &str, origin: Instant) -> Vec<Duration> {
        self.calls()
            .into_iter()
            .filter(|(_, request)| request.path == path)
            .map(|(at, _)| at - origin)
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.calls().iter().filter(|(_, r)| r.path == path).count()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.lock().unwrap().push((Instant::now(), request.clone()));
        (self.handler)(&request)
    }
}

/// Config tuned for fast tests: short backoff, no stagger.
pub fn test_config(base_url: &str) -> FleetConfig {
    let mut config = FleetConfig::default();
    config.api.base_url = base_url.to_string();
    config.http.request_timeout_secs = 5;
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 100;
    config.schedule.stagger_secs = 0;
    config
}
