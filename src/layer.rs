use crate::hook::Hook;
use crate::record::{FieldValue, LogRecord, Severity};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns events into [`LogRecord`]s and
/// dispatches them to a list of [`Hook`]s via a bounded channel and
/// background task.
///
/// Hooks run in registration order against the same mutable record, so
/// a prefix-only hook placed first strips marker fields before later
/// hooks see them. Each hook only fires for severities in its monitored
/// set. Records that cannot be delivered are reported to stderr and
/// never retried.
pub struct HookLayer {
    sender: mpsc::Sender<LogRecord>,
    /// Union of the hooks' monitored severities; events outside it are
    /// skipped before a record is built.
    monitored: Vec<Severity>,
    /// Records dropped because the channel was full.
    pub dropped_events: Arc<AtomicU64>,
}

impl HookLayer {
    /// Create a new layer and spawn the background task that feeds
    /// queued records through `hooks`.
    ///
    /// A minimal threshold is enforced for `buffer` to avoid degenerate
    /// configurations.
    pub fn new(hooks: Vec<Arc<dyn Hook>>, buffer: usize) -> (Self, JoinHandle<()>) {
        let buffer = buffer.max(16);
        let (tx, mut rx) = mpsc::channel::<LogRecord>(buffer);

        let mut monitored: Vec<Severity> = Vec::new();
        for hook in &hooks {
            for level in hook.levels() {
                if !monitored.contains(level) {
                    monitored.push(*level);
                }
            }
        }

        let dropped_events = Arc::new(AtomicU64::new(0));

        let handle = tokio::spawn(async move {
            while let Some(mut record) = rx.recv().await {
                for hook in &hooks {
                    if !hook.levels().contains(&record.severity) {
                        continue;
                    }
                    if let Err(e) = hook.fire(&mut record).await {
                        eprintln!("log hook delivery failed: {}", e);
                    }
                }
            }
        });

        (
            Self {
                sender: tx,
                monitored,
                dropped_events,
            },
            handle,
        )
    }
}

impl<S> Layer<S> for HookLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        let severity = Severity::from(event.metadata().level());
        if !self.monitored.contains(&severity) {
            return;
        }

        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
        };
        event.record(&mut visitor);

        let record = LogRecord {
            timestamp: Utc::now(),
            severity,
            message: message.unwrap_or_default(),
            fields,
        };

        if self.sender.try_send(record).is_err() {
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
            eprintln!("log channel full, dropping log record");
        }
    }
}

/// Visitor that splits an event's fields into the record's field map
/// and its message.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, FieldValue>,
    pub message: &'a mut Option<String>,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.fields
                .insert(field.name().to_string(), FieldValue::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), FieldValue::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), FieldValue::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), FieldValue::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.fields
            .insert(field.name().to_string(), FieldValue::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields
                .insert(field.name().to_string(), FieldValue::from(format!("{:?}", value)));
        }
    }
}
