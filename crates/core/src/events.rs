use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityCategory {
    Wizard,
    Recommendation,
    Catalog,
    Checkout,
    System,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityOutcome {
    Success,
    Refused,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityContext {
    pub session_id: Option<String>,
    pub correlation_id: String,
    pub actor: String,
}

impl ActivityContext {
    pub fn new(
        session_id: Option<String>,
        correlation_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self { session_id, correlation_id: correlation_id.into(), actor: actor.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub event_id: String,
    pub session_id: Option<String>,
    pub correlation_id: String,
    pub event_type: String,
    pub category: ActivityCategory,
    pub actor: String,
    pub outcome: ActivityOutcome,
    pub metadata: BTreeMap<String, String>,
    pub occurred_at: DateTime<Utc>,
}

impl ActivityEvent {
    pub fn new(
        context: &ActivityContext,
        event_type: impl Into<String>,
        category: ActivityCategory,
        outcome: ActivityOutcome,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            session_id: context.session_id.clone(),
            correlation_id: context.correlation_id.clone(),
            event_type: event_type.into(),
            category,
            actor: context.actor.clone(),
            outcome,
            metadata: BTreeMap::new(),
            occurred_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

pub trait ActivitySink: Send + Sync {
    fn emit(&self, event: ActivityEvent);
}

/// Discards every event; the default sink when no observer is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullActivitySink;

impl ActivitySink for NullActivitySink {
    fn emit(&self, _event: ActivityEvent) {}
}

#[derive(Clone, Default)]
pub struct InMemoryActivitySink {
    events: Arc<Mutex<Vec<ActivityEvent>>>,
}

impl InMemoryActivitySink {
    pub fn events(&self) -> Vec<ActivityEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<ActivityEvent> {
        self.events().into_iter().filter(|event| event.event_type == event_type).collect()
    }
}

impl ActivitySink for InMemoryActivitySink {
    fn emit(&self, event: ActivityEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
