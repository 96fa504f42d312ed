use crate::ReporterSink;
use arb_schemas::ReporterEvent;
use std::sync::Mutex;

/// Test fake that records every emitted event in order for assertions.
#[derive(Default)]
pub struct CapturingReporterSink {
    events: Mutex<Vec<ReporterEvent>>,
}

impl CapturingReporterSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReporterEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.kind.as_wire_str())
            .collect()
    }
}

impl ReporterSink for CapturingReporterSink {
    fn emit(&self, event: ReporterEvent) {
        self.events.lock().unwrap().push(event);
    }
}
