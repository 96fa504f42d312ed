use crate::ReporterSink;
use arb_schemas::ReporterEvent;
use std::time::Duration;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 1024;
const POST_TIMEOUT: Duration = Duration::from_secs(5);

/// Production reporter sink: POSTs `{type, data}` to
/// `<api_base>/api/worker/result`. `emit` pushes into a bounded channel
/// and returns immediately; one background task owns the HTTP client and the
/// only suspension point.
pub struct HttpReporterSink {
    tx: mpsc::Sender<ReporterEvent>,
}

impl HttpReporterSink {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        let (tx, mut rx) = mpsc::channel::<ReporterEvent>(CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let client = reqwest::Client::new();
            let url = format!("{}/api/worker/result", api_base.trim_end_matches('/'));
            while let Some(event) = rx.recv().await {
                let body = serde_json::json!({
                    "type": event.kind.as_wire_str(),
                    "data": event.data,
                });
                let send = client.post(&url).json(&body).timeout(POST_TIMEOUT).send().await;
                if let Err(err) = send {
                    tracing::warn!(error = %err, event = event.kind.as_wire_str(), "reporter delivery failed");
                }
            }
        });

        Self { tx }
    }
}

impl ReporterSink for HttpReporterSink {
    fn emit(&self, event: ReporterEvent) {
        if self.tx.try_send(event).is_err() {
            tracing::warn!("reporter channel full or closed, event dropped");
        }
    }
}
