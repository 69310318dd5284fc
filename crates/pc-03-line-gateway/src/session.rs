//! One connected peer.
//!
//! ```text
//!            ┌──────────── reader (this task) ────────────┐
//!  socket ──►│ prompt, parse line, submit, re-prompt      │──┐
//!            └────────────────────────────────────────────┘  │
//!            ┌──────────── broadcaster ───────────────────┐  │  mpsc
//!  bus ─────►│ chain changed ⇒ whole chain, pretty        │──┼──────► writer ──► socket
//!            └────────────────────────────────────────────┘  │
//!            ┌──────────── pusher ────────────────────────┐  │
//!  ticker ──►│ every interval ⇒ whole chain, compact      │──┘
//!            └────────────────────────────────────────────┘
//! ```
//!
//! When the reader ends (EOF, socket error or server shutdown) the stop
//! channel fires, the broadcaster and pusher exit, and the writer drains what
//! is already queued before closing the socket. Output is queued without a
//! bound: a slow peer only grows its own queue.

use crate::config::{PROMPT, REPROMPT};
use crate::error::LineGatewayError;
use pc_01_ledger::{LedgerApi, SubmitOutcome};
use shared_bus::Subscription;
use shared_types::{to_pretty_json, Block, Bpm};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

type Outbox = mpsc::UnboundedSender<String>;

/// Resolves once `rx` reads `true` or its sender is gone.
pub(crate) async fn stopped(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// Whole chain as one peer message.
pub fn encode_chain(blocks: &[Block], pretty: bool) -> Result<String, LineGatewayError> {
    let mut json = if pretty {
        to_pretty_json(blocks)?
    } else {
        serde_json::to_string(blocks)?
    };
    json.push('\n');
    Ok(json)
}

/// Parse one submitted line.
pub fn parse_bpm(line: &str) -> Option<Bpm> {
    line.trim().parse().ok()
}

/// Decrements the live-session counter when the session ends.
struct ActiveGuard(Arc<AtomicUsize>);

impl ActiveGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Per-connection state
pub struct Session {
    id: Uuid,
    peer: SocketAddr,
    ledger: Arc<dyn LedgerApi>,
    push_interval: Duration,
    drain_timeout: Duration,
}

impl Session {
    /// Session for one accepted connection. Pushes the chain every
    /// `push_interval` and gives queued writes up to `drain_timeout` on close.
    pub fn new(
        peer: SocketAddr,
        ledger: Arc<dyn LedgerApi>,
        push_interval: Duration,
        drain_timeout: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            peer,
            ledger,
            push_interval,
            drain_timeout,
        }
    }

    /// Session identifier used in logs
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Serve the peer until it disconnects or `shutdown` fires.
    pub async fn run(
        self,
        stream: TcpStream,
        subscription: Subscription,
        active: Arc<AtomicUsize>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let _active = ActiveGuard::enter(&active);
        info!(session = %self.id, peer = %self.peer, "[pc-03] Peer connected");

        let (read_half, write_half) = stream.into_split();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        let writer = tokio::spawn(write_loop(self.id, write_half, out_rx));
        let broadcaster = tokio::spawn(broadcast_loop(
            Arc::clone(&self.ledger),
            subscription,
            out_tx.clone(),
            stop_rx.clone(),
        ));
        let pusher = tokio::spawn(push_loop(
            Arc::clone(&self.ledger),
            self.push_interval,
            out_tx.clone(),
            stop_rx,
        ));

        self.read_loop(read_half, &out_tx, &mut shutdown).await;

        let _ = stop_tx.send(true);
        drop(out_tx);
        let _ = tokio::join!(broadcaster, pusher);

        let mut writer = writer;
        if tokio::time::timeout(self.drain_timeout, &mut writer)
            .await
            .is_err()
        {
            debug!(session = %self.id, "[pc-03] Output drain timed out");
            writer.abort();
        }

        info!(session = %self.id, peer = %self.peer, "[pc-03] Peer disconnected");
    }

    async fn read_loop(
        &self,
        read_half: OwnedReadHalf,
        out: &Outbox,
        shutdown: &mut watch::Receiver<bool>,
    ) {
        let _ = out.send(PROMPT.to_string());
        let mut lines = BufReader::new(read_half).lines();

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line,
                _ = stopped(shutdown) => {
                    debug!(session = %self.id, "[pc-03] Closing session for shutdown");
                    break;
                }
            };

            match line {
                Ok(Some(line)) => self.handle_line(&line, out).await,
                Ok(None) => break,
                Err(e) => {
                    warn!(session = %self.id, error = %e, "[pc-03] Read failed");
                    break;
                }
            }
        }
    }

    async fn handle_line(&self, line: &str, out: &Outbox) {
        let Some(bpm) = parse_bpm(line) else {
            warn!(session = %self.id, "[pc-03] {:?} not a number", line);
            return;
        };

        match self.ledger.submit(bpm).await {
            Ok(SubmitOutcome::Accepted(block)) => {
                debug!(session = %self.id, index = block.index, "[pc-03] Record appended");
            }
            Ok(SubmitOutcome::Rejected { block, reason }) => {
                warn!(session = %self.id, index = block.index, %reason, "[pc-03] Record dropped");
            }
            Err(e) => {
                warn!(session = %self.id, error = %e, "[pc-03] Submission failed");
            }
        }
        let _ = out.send(REPROMPT.to_string());
    }
}

/// Sole owner of the socket's write half.
async fn write_loop(id: Uuid, mut writer: OwnedWriteHalf, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(message) = rx.recv().await {
        if let Err(e) = writer.write_all(message.as_bytes()).await {
            debug!(session = %id, error = %e, "[pc-03] Write failed");
            return;
        }
    }
    let _ = writer.shutdown().await;
}

/// Sends the whole chain after every chain change.
async fn broadcast_loop(
    ledger: Arc<dyn LedgerApi>,
    mut subscription: Subscription,
    out: Outbox,
    mut stop: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            event = subscription.recv() => {
                if event.is_none() {
                    break;
                }
                match encode_chain(&ledger.blocks().await, true) {
                    Ok(json) => {
                        if out.send(json).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "[pc-03] Failed to encode chain"),
                }
            }
            _ = stopped(&mut stop) => break,
        }
    }
}

/// Sends the whole chain every `period`, changed or not.
async fn push_loop(
    ledger: Arc<dyn LedgerApi>,
    period: Duration,
    out: Outbox,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match encode_chain(&ledger.blocks().await, false) {
                    Ok(json) => {
                        if out.send(json).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "[pc-03] Failed to encode chain"),
                }
            }
            _ = stopped(&mut stop) => break,
        }
    }
}
