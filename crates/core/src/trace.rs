//! Caller-injected structured trace hook.
//!
//! Engine operations never log on their own. Callers that want diagnostics pass
//! a [`TraceSink`]; [`TracingTraceSink`] forwards events to `tracing`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceStage {
    Normalize,
    Organize,
    Select,
    Pricing,
    Recommendation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub event_id: String,
    pub correlation_id: String,
    pub event_type: String,
    pub stage: TraceStage,
    pub metadata: BTreeMap<String, String>,
    pub occurred_at: DateTime<Utc>,
}

impl TraceEvent {
    pub fn new(
        correlation_id: impl Into<String>,
        event_type: impl Into<String>,
        stage: TraceStage,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            correlation_id: correlation_id.into(),
            event_type: event_type.into(),
            stage,
            metadata: BTreeMap::new(),
            occurred_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

pub trait TraceSink: Send + Sync {
    fn emit(&self, event: TraceEvent);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTraceSink;

impl TraceSink for NoopTraceSink {
    fn emit(&self, _event: TraceEvent) {}
}

#[derive(Clone, Default)]
pub struct InMemoryTraceSink {
    events: Arc<Mutex<Vec<TraceEvent>>>,
}

impl InMemoryTraceSink {
    pub fn events(&self) -> Vec<TraceEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TraceSink for InMemoryTraceSink {
    fn emit(&self, event: TraceEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingTraceSink;

impl TraceSink for TracingTraceSink {
    fn emit(&self, event: TraceEvent) {
        tracing::debug!(
            event_name = %event.event_type,
            correlation_id = %event.correlation_id,
            stage = ?event.stage,
            metadata = ?event.metadata,
            "engine trace event"
        );
    }
}
