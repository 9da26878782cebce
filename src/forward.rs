use crate::record::Payload;
use crate::transport::Transport;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Configuration for [`ForwardClient`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForwardConfig {
    /// Collector host name or address.
    pub host: String,
    /// Collector forward port, conventionally 24224.
    pub port: u16,
    /// Optional limit on connection establishment. `None` means the
    /// connect blocks until the OS gives up.
    pub connect_timeout: Option<Duration>,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        ForwardConfig {
            host: "127.0.0.1".to_string(),
            port: 24224,
            connect_timeout: None,
        }
    }
}

/// Forward-protocol implementation of [`Transport`].
///
/// Each record is framed as the JSON array `[tag, unix_seconds,
/// payload]` and written to a single TCP connection to the collector.
pub struct ForwardClient {
    stream: Mutex<TcpStream>,
}

impl ForwardClient {
    /// Connect to the collector described by `config`.
    pub async fn connect(config: ForwardConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let connect = TcpStream::connect((config.host.as_str(), config.port));
        let stream = match config.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connect).await??,
            None => connect.await?,
        };
        Ok(ForwardClient {
            stream: Mutex::new(stream),
        })
    }
}

#[async_trait]
impl Transport for ForwardClient {
    async fn send(
        &self,
        tag: &str,
        timestamp: DateTime<Utc>,
        payload: &Payload,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let frame = serde_json::to_vec(&(tag, timestamp.timestamp(), payload))?;
        let mut stream = self.stream.lock().await;
        stream.write_all(&frame).await?;
        stream.flush().await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut stream = self.stream.lock().await;
        stream.shutdown().await?;
        Ok(())
    }
}
