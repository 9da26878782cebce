use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing_fluent_hook::hook::FluentHook;
use tracing_fluent_hook::record::Payload;
use tracing_fluent_hook::transport::Transport;

/// Transport that records every send for later inspection.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, DateTime<Utc>, Payload)>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<(String, DateTime<Utc>, Payload)> {
        self.sent.lock().expect("sent lock poisoned").clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(
        &self,
        tag: &str,
        timestamp: DateTime<Utc>,
        payload: &Payload,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.sent
            .lock()
            .expect("sent lock poisoned")
            .push((tag.to_string(), timestamp, payload.clone()));
        Ok(())
    }
}

/// A hook wired to a recording transport, plus a handle to inspect what
/// was sent.
pub fn recording_hook() -> (FluentHook, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let hook = FluentHook::with_transport(transport.clone());
    (hook, transport)
}
