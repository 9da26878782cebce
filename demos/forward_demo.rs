use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tracing::error;
use tracing_fluent_hook::{hook::FluentHook, init::init_tracing};

/// End-to-end demo against a local TCP listener standing in for a
/// Fluentd collector, so the example is self-contained.
#[tokio::main]
async fn main() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("listener addr");

    let reader = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap_or(0);
        println!("collector received: {}", String::from_utf8_lossy(&buf[..n]));
    });

    let mut hook = FluentHook::connect(addr.ip().to_string(), addr.port())
        .await
        .expect("connect hook");
    hook.set_app("demo");

    init_tracing(Arc::new(hook));

    error!(tag = "startup", code = 500_u64, "forward demo error");

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    let _ = reader.await;
}
