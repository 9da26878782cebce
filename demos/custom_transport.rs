use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info};
use tracing_fluent_hook::{
    hook::FluentHook,
    init::init_tracing,
    record::Payload,
    transport::Transport,
};

/// Example of wiring a completely custom transport by implementing the
/// `Transport` trait directly. Imagine this talks to some proprietary
/// collector for which this crate does not provide a built-in client.
struct MyCustomTransport;

#[async_trait]
impl Transport for MyCustomTransport {
    async fn send(
        &self,
        tag: &str,
        _timestamp: DateTime<Utc>,
        payload: &Payload,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Here you would call your own client library for the target
        // collector. For the sake of example we just print the record.
        println!("[my-custom-collector] {} {:?}", tag, payload);
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let mut hook = FluentHook::with_transport(Arc::new(MyCustomTransport));
    hook.set_app("demo");

    init_tracing(Arc::new(hook));

    info!("custom transport example started");
    error!(tag = "custom", "simulated error sent via custom transport");

    // Give the background task a little time to drain the channel.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
}
