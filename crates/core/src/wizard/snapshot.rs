use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::answers::QuizAnswers;

/// Fixed key the wizard persists its progress under.
pub const WIZARD_SNAPSHOT_KEY: &str = "regimen.quiz.progress.v1";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("snapshot read failed: {0}")]
    Read(String),
    #[error("snapshot write failed: {0}")]
    Write(String),
}

/// Client-local key-value storage seam: string keys, string-serialized
/// values. Implementations decide where the bytes live.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Administrative/test-only escape hatch: drop the wizard's persisted
    /// progress without going through a wizard instance.
    fn reset_persisted_state(&self) -> Result<(), StoreError> {
        self.delete(WIZARD_SNAPSHOT_KEY)
    }
}

/// The persisted `(step, answers)` pair. A stored terminal step is never
/// resumed, so stale recommendations cannot replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub current_step: u8,
    pub answers: QuizAnswers,
}

#[derive(Clone, Default)]
pub struct InMemorySnapshotStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl SnapshotStore for InMemorySnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.entries.lock() {
            Ok(entries) => Ok(entries.get(key).cloned()),
            Err(poisoned) => Ok(poisoned.into_inner().get(key).cloned()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.to_string());
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.remove(key);
            }
            Err(poisoned) => {
                poisoned.into_inner().remove(key);
            }
        }
        Ok(())
    }
}
