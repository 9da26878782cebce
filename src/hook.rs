use crate::assemble;
use crate::fields::{self, FilterFn};
use crate::forward::{ForwardClient, ForwardConfig};
use crate::record::{FieldValue, LogRecord, Severity, SharedFields, DEFAULT_PREFIX};
use crate::tag;
use crate::transport::Transport;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::error::Error;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Severities monitored by default: `Info` and everything more severe.
pub const DEFAULT_LEVELS: &[Severity] = &[Severity::Error, Severity::Warn, Severity::Info];

/// The pluggable-hook contract dispatched by the bridge layer.
///
/// Implementations expose the severities they monitor and consume one
/// record per `fire` call; the layer only fires a hook for records
/// whose severity is in that set.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Severities this hook wants to receive.
    fn levels(&self) -> &[Severity];

    /// Consume one record.
    ///
    /// The record is caller-owned and mutable: prefix handling may
    /// delete keys from its field mapping, visible to hooks fired after
    /// this one on the same record.
    async fn fire(&self, record: &mut LogRecord) -> Result<(), HookError>;
}

/// Errors surfaced by [`Hook::fire`].
#[derive(thiserror::Error, Debug)]
pub enum HookError {
    /// Constructing the per-call transport failed; nothing was sent.
    #[error("failed to construct forward transport: {0}")]
    Connect(#[source] Box<dyn Error + Send + Sync>),

    /// The transport rejected the record; it was not delivered.
    #[error("failed to send log record: {0}")]
    Send(#[source] Box<dyn Error + Send + Sync>),
}

/// Hook that reshapes structured records and forwards them to a
/// Fluentd collector.
///
/// Configuration is set at construction or via setters before the hook
/// is installed. Each `fire` call is independent: render fields,
/// assemble the payload, resolve the tag, send. Failed sends are
/// surfaced to the caller unmodified; the hook never retries and never
/// logs about its own failures.
pub struct FluentHook {
    /// Persistent transport. If set, it is reused for every fire and
    /// never closed by the hook; otherwise a fresh connection is made
    /// and closed per call.
    transport: Option<Arc<dyn Transport>>,
    /// When `true`, `fire` only strips prefixed fields from the record
    /// and never transmits.
    prefix_only: bool,

    config: ForwardConfig,
    levels: Vec<Severity>,
    tag: Option<String>,
    app: Option<String>,
    prefix: String,

    ignore_fields: HashSet<String>,
    filters: HashMap<String, FilterFn>,
    always_sent: SharedFields,
}

impl FluentHook {
    fn base(config: ForwardConfig, prefix_only: bool) -> Self {
        FluentHook {
            transport: None,
            prefix_only,
            config,
            levels: DEFAULT_LEVELS.to_vec(),
            tag: None,
            app: None,
            prefix: DEFAULT_PREFIX.to_string(),
            ignore_fields: HashSet::new(),
            filters: HashMap::new(),
            always_sent: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Connect a persistent forward transport and build a hook around
    /// it. The connection is reused for every subsequent fire.
    pub async fn connect(host: impl Into<String>, port: u16) -> Result<Self, HookError> {
        let config = ForwardConfig {
            host: host.into(),
            port,
            ..ForwardConfig::default()
        };
        let client = ForwardClient::connect(config.clone())
            .await
            .map_err(HookError::Connect)?;
        let mut hook = Self::base(config, false);
        hook.transport = Some(Arc::new(client));
        Ok(hook)
    }

    /// Like [`FluentHook::connect`], additionally setting the
    /// application namespace used during tag resolution.
    pub async fn connect_with_app(
        host: impl Into<String>,
        port: u16,
        app: impl Into<String>,
    ) -> Result<Self, HookError> {
        let mut hook = Self::connect(host, port).await?;
        hook.app = Some(app.into());
        Ok(hook)
    }

    /// Build a hook that connects per call: each fire opens a fresh
    /// transport and closes it before returning, on success and failure
    /// alike.
    pub fn ephemeral(host: impl Into<String>, port: u16) -> Self {
        Self::base(
            ForwardConfig {
                host: host.into(),
                port,
                ..ForwardConfig::default()
            },
            false,
        )
    }

    /// Build a hook around an existing transport. The transport is
    /// treated as caller-owned and is never closed by the hook.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let mut hook = Self::base(ForwardConfig::default(), false);
        hook.transport = Some(transport);
        hook
    }

    /// Build a hook that only strips prefixed fields from records and
    /// never transmits, for use as an early stage ahead of other hooks.
    pub fn prefix_only() -> Self {
        Self::base(ForwardConfig::default(), true)
    }

    /// Replace the monitored severity set.
    pub fn set_levels(&mut self, levels: impl Into<Vec<Severity>>) {
        self.levels = levels.into();
    }

    /// Currently configured static tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Set a static tag. When present, every record routes under it
    /// regardless of record content.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = Some(tag.into());
    }

    /// Set the application namespace used during tag resolution and
    /// recorded in every payload.
    pub fn set_app(&mut self, app: impl Into<String>) {
        self.app = Some(app.into());
    }

    /// Replace the marker prefix recognized by prefix promotion and
    /// prefix-only stripping. An empty prefix disables both.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Limit connection establishment for per-call transports.
    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.config.connect_timeout = Some(timeout);
    }

    /// Drop the named field from every outgoing payload.
    pub fn add_ignore(&mut self, name: impl Into<String>) {
        self.ignore_fields.insert(name.into());
    }

    /// Register a transform applied to the named field's value before
    /// it is copied into the payload. The record's own mapping keeps
    /// the original value.
    pub fn add_filter(
        &mut self,
        name: impl Into<String>,
        filter: impl Fn(FieldValue) -> FieldValue + Send + Sync + 'static,
    ) {
        self.filters.insert(name.into(), Box::new(filter));
    }

    /// Handle to the always-sent mapping merged into every payload.
    pub fn always_sent_fields(&self) -> &SharedFields {
        &self.always_sent
    }

    /// Share an always-sent mapping with other hooks. Entries overwrite
    /// same-named payload fields at assembly time.
    pub fn set_always_sent_fields(&mut self, fields: SharedFields) {
        self.always_sent = fields;
    }

    async fn emit(
        &self,
        transport: &dyn Transport,
        record: &mut LogRecord,
    ) -> Result<(), HookError> {
        let mut payload = fields::render(record, &self.ignore_fields, &self.filters, &self.prefix);

        assemble::merge_always_sent(&mut payload, &self.always_sent);
        if let Some(app) = &self.app {
            assemble::set_app(&mut payload, app);
        }
        assemble::set_level(&mut payload, record.severity);

        let tag = tag::resolve(self.tag.as_deref(), self.app.as_deref(), record, &payload);
        // When the tag already carries the message text, don't duplicate
        // it under a second key.
        if tag != record.message {
            assemble::set_message(&mut payload, &record.message);
        }

        transport
            .send(&tag, record.timestamp, &payload)
            .await
            .map_err(HookError::Send)
    }
}

#[async_trait]
impl Hook for FluentHook {
    fn levels(&self) -> &[Severity] {
        &self.levels
    }

    async fn fire(&self, record: &mut LogRecord) -> Result<(), HookError> {
        if self.prefix_only {
            fields::strip_prefixed(&mut record.fields, &self.prefix);
            return Ok(());
        }

        match &self.transport {
            Some(transport) => self.emit(transport.as_ref(), record).await,
            None => {
                let client = ForwardClient::connect(self.config.clone())
                    .await
                    .map_err(HookError::Connect)?;
                let result = self.emit(&client, record).await;
                // The per-call connection is released on every exit
                // path; close errors are discarded.
                let _ = client.close().await;
                result
            }
        }
    }
}
