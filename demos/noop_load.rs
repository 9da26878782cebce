use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::error;

use tracing_fluent_hook::hook::FluentHook;
use tracing_fluent_hook::init::{init_tracing_with_config, LayerConfig};
use tracing_fluent_hook::noop::NoopTransport;

#[tokio::main]
async fn main() {
    let hook = FluentHook::with_transport(Arc::new(NoopTransport));
    let config = LayerConfig {
        enable_stdout: false,
        ..LayerConfig::default()
    };
    init_tracing_with_config(vec![Arc::new(hook)], config);

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        error!(iteration = i, "noop load test error");
    }

    let elapsed = start.elapsed();
    println!(
        "noop transport: sent {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    // Give the background task a little time to drain the channel.
    sleep(Duration::from_secs(2)).await;
}
