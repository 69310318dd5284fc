//! Shared fixtures for the integration flows.

use pc_01_ledger::{LedgerApi, LedgerConfig, LedgerService};
use pc_02_api_gateway::{ApiGatewayService, GatewayConfig};
use pc_03_line_gateway::{LineGatewayConfig, LineGatewayService};
use shared_bus::InMemoryEventBus;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;

pub const WAIT: Duration = Duration::from_secs(10);

/// A ledger, its bus and a shutdown switch for every gateway started on it.
pub struct Harness {
    pub ledger: Arc<LedgerService>,
    pub bus: Arc<InMemoryEventBus>,
    shutdown_tx: watch::Sender<bool>,
}

impl Harness {
    pub async fn new(config: LedgerConfig) -> Self {
        let bus = Arc::new(InMemoryEventBus::new());
        let ledger = Arc::new(LedgerService::new(Arc::clone(&bus), config).unwrap());
        ledger.announce_genesis().await.unwrap();
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            ledger,
            bus,
            shutdown_tx,
        }
    }

    pub fn api(&self) -> Arc<dyn LedgerApi> {
        Arc::clone(&self.ledger) as Arc<dyn LedgerApi>
    }

    pub async fn spawn_http(&self, config: GatewayConfig) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let service = ApiGatewayService::new(config, self.api()).unwrap();
        let shutdown = self.shutdown_tx.subscribe();
        tokio::spawn(async move { service.serve(listener, shutdown).await });
        addr
    }

    pub async fn spawn_tcp(&self, config: LineGatewayConfig) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let service = LineGatewayService::new(config, self.api(), Arc::clone(&self.bus)).unwrap();
        let shutdown = self.shutdown_tx.subscribe();
        tokio::spawn(async move { service.serve(listener, shutdown).await });
        addr
    }

    pub fn stop(&self) {
        self.ledger.shutdown();
        let _ = self.shutdown_tx.send(true);
    }
}

/// Status and body of one HTTP/1.1 exchange.
#[derive(Debug)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// One request on a fresh connection, read until the server closes.
pub async fn http(addr: SocketAddr, method: &str, body: Option<&str>) -> HttpReply {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let payload = body.unwrap_or("");
    let request = format!(
        "{method} / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
         Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{payload}",
        payload.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = String::new();
    tokio::time::timeout(WAIT, stream.read_to_string(&mut raw))
        .await
        .unwrap()
        .unwrap();

    let status = raw
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    let body = raw
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    HttpReply { status, body }
}

pub async fn get(addr: SocketAddr) -> HttpReply {
    http(addr, "GET", None).await
}

pub async fn post(addr: SocketAddr, body: &str) -> HttpReply {
    http(addr, "POST", Some(body)).await
}

/// A connected line-protocol client.
pub struct LinePeer {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
    seen: String,
}

impl LinePeer {
    pub async fn connect(addr: SocketAddr) -> Self {
        let (reader, writer) = TcpStream::connect(addr).await.unwrap().into_split();
        Self {
            reader,
            writer,
            seen: String::new(),
        }
    }

    pub async fn send_line(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .unwrap();
    }

    /// Read until every needle has appeared since the last call, then return
    /// the text received and forget it.
    pub async fn expect_all(&mut self, needles: &[&str]) -> String {
        let mut chunk = [0u8; 4096];
        let deadline = tokio::time::Instant::now() + WAIT;
        while !needles.iter().all(|n| self.seen.contains(n)) {
            let read = tokio::time::timeout_at(deadline, self.reader.read(&mut chunk))
                .await
                .unwrap_or_else(|_| panic!("timed out waiting for {needles:?}; got {:?}", self.seen))
                .unwrap();
            assert!(read > 0, "peer closed before {needles:?} arrived");
            self.seen.push_str(&String::from_utf8_lossy(&chunk[..read]));
        }
        std::mem::take(&mut self.seen)
    }

    /// Wait for the server to close the connection.
    pub async fn expect_eof(&mut self) {
        let mut chunk = [0u8; 4096];
        tokio::time::timeout(WAIT, async {
            loop {
                match self.reader.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
        })
        .await
        .unwrap();
    }
}
