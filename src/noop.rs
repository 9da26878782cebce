use crate::record::Payload;
use crate::transport::Transport;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;

/// A transport that simply drops all records.
///
/// Useful for measuring the overhead of the hook pipeline itself
/// without any external I/O, and for unit tests that don't care about
/// delivery.
#[derive(Clone, Default)]
pub struct NoopTransport;

#[async_trait]
impl Transport for NoopTransport {
    async fn send(
        &self,
        _tag: &str,
        _timestamp: DateTime<Utc>,
        _payload: &Payload,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
