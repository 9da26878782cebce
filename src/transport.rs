use crate::record::Payload;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;

/// Destination for assembled log payloads.
///
/// Implementations carry `(tag, timestamp, payload)` triples to a
/// concrete collector. The hook calls `send` once per fired record and
/// awaits the result; a returned error is surfaced to the hook's caller
/// unmodified, with no retry and no buffering at this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a single payload under the given routing tag.
    ///
    /// **Parameters**
    /// - `tag`: resolved destination tag for the record.
    /// - `timestamp`: the record's original event time.
    /// - `payload`: fully-assembled field mapping.
    ///
    /// **Returns**
    /// - `Ok(())` if the collector accepted the record.
    /// - `Err(..)` if transmission failed (connectivity, serialization,
    ///   collector rejection). The hook does not retry.
    async fn send(
        &self,
        tag: &str,
        timestamp: DateTime<Utc>,
        payload: &Payload,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Release any resources held by the transport.
    ///
    /// Called by the hook only for transports it constructed itself; a
    /// caller-supplied persistent transport is never closed here.
    ///
    /// Default implementation is a no-op.
    async fn close(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
