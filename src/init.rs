use crate::hook::Hook;
use crate::layer::HookLayer;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration for installing the bridge layer.
///
/// **Fields**
/// - `channel_buffer`: maximum queued records before new ones are
///   dropped.
/// - `enable_stdout`: if `true`, a `tracing_subscriber::fmt` layer is
///   installed next to the hook layer and events are also printed to
///   the console.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub channel_buffer: usize,
    pub enable_stdout: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            channel_buffer: 1024,
            enable_stdout: true,
        }
    }
}

/// Install a global `tracing` subscriber dispatching to `hooks`.
///
/// **Parameters**
/// - `hooks`: hooks fired in the given order against each record; see
///   [`HookLayer`] for the dispatch contract.
/// - `config`: [`LayerConfig`] controlling buffering and console
///   echoing.
///
/// **Effects**
///
/// This installs a [`Registry`] combined with [`HookLayer`] as the
/// global default subscriber, so all `tracing` events in the process
/// are observed by the layer.
pub fn init_tracing_with_config(hooks: Vec<Arc<dyn Hook>>, config: LayerConfig) {
    let (layer, _handle) = HookLayer::new(hooks, config.channel_buffer);

    if config.enable_stdout {
        let fmt_layer = tracing_subscriber::fmt::layer();
        let subscriber = Registry::default().with(layer).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
    } else {
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");
    }
}

/// Install a single hook with default settings.
///
/// Equivalent to calling [`init_tracing_with_config`] with
/// [`LayerConfig::default`].
pub fn init_tracing(hook: Arc<dyn Hook>) {
    init_tracing_with_config(vec![hook], LayerConfig::default());
}
