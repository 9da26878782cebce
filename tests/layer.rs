mod common;

use common::recording_hook;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};
use tracing_subscriber::prelude::*;
use tracing_fluent_hook::hook::FluentHook;
use tracing_fluent_hook::layer::HookLayer;
use tracing_fluent_hook::record::Severity;

#[tokio::test]
async fn events_reach_the_hook_through_the_layer() {
    let (hook, transport) = recording_hook();
    let (layer, handle) = HookLayer::new(vec![Arc::new(hook)], 64);
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        error!(tag = "svc.request", code = 500_u64, "request failed");
    });

    // Dropping the subscriber closes the channel and ends the task.
    handle.await.expect("layer task");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let (tag, _, payload) = &sent[0];
    assert_eq!(tag, "svc.request");
    assert_eq!(payload.get("code"), Some(&json!(500)));
    assert_eq!(payload.get("level"), Some(&json!("error")));
    assert_eq!(payload.get("message"), Some(&json!("request failed")));
}

#[tokio::test]
async fn prefix_only_hook_strips_fields_for_later_hooks() {
    let strip: Arc<dyn tracing_fluent_hook::hook::Hook> = Arc::new(FluentHook::prefix_only());
    let (forward, transport) = recording_hook();
    let (layer, handle) = HookLayer::new(vec![strip, Arc::new(forward)], 64);
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        error!(_debug = "x", public = "y", "chained hooks");
    });

    handle.await.expect("layer task");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let (_, _, payload) = &sent[0];
    // The early hook deleted the prefixed field, so the forwarding hook
    // never saw it -- not even to promote it.
    assert_eq!(payload.get("_debug"), None);
    assert_eq!(payload.get("debug"), None);
    assert_eq!(payload.get("public"), Some(&json!("y")));
}

#[tokio::test]
async fn hooks_only_fire_for_monitored_severities() {
    let (mut hook, transport) = recording_hook();
    hook.set_levels(vec![Severity::Error]);
    let (layer, handle) = HookLayer::new(vec![Arc::new(hook)], 64);
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        warn!("not monitored");
        error!("monitored");
    });

    handle.await.expect("layer task");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let (tag, _, _) = &sent[0];
    assert_eq!(tag, "monitored");
}
