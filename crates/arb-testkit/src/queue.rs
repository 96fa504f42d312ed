use arb_execution::{QueueError, WorkQueue};
use arb_schemas::PairRequest;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc;

/// `mpsc`-backed `WorkQueue` fake for local/dry-run use and scenario tests.
/// Mirrors the shape of a Redis list closely enough to drive the same
/// consumer loop `arb-daemon` runs against the real queue.
pub struct InMemoryWorkQueue {
    rx: Mutex<mpsc::Receiver<PairRequest>>,
    tx: mpsc::Sender<PairRequest>,
}

impl InMemoryWorkQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(1024);
        Self { rx: Mutex::new(rx), tx }
    }

    pub fn push(&self, request: PairRequest) {
        // Bounded channel sized well above any test's needs; a full channel
        // here means a test enqueued more than it meant to.
        self.tx.try_send(request).expect("InMemoryWorkQueue is full");
    }
}

impl Default for InMemoryWorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkQueue for InMemoryWorkQueue {
    async fn receive(&self, timeout: Duration) -> Result<Option<PairRequest>, QueueError> {
        let mut rx = self.rx.lock().await;
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(request)) => Ok(Some(request)),
            Ok(None) => Ok(None),
            Err(_elapsed) => Ok(None),
        }
    }
}
