use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use pp_core::ports::{SavedStateError, SavedStatePort};
use tracing::error;

/// Saved-state slots that live as long as the process.
#[derive(Debug, Default)]
pub struct InMemorySavedState {
    slots: Mutex<HashMap<String, String>>,
}

impl InMemorySavedState {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(|poisoned| {
            error!("saved state mutex poisoned, recovering from poisoned state");
            poisoned.into_inner()
        })
    }
}

impl SavedStatePort for InMemorySavedState {
    fn get(&self, key: &str) -> Result<Option<String>, SavedStateError> {
        Ok(self.slots().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SavedStateError> {
        self.slots().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SavedStateError> {
        self.slots().remove(key);
        Ok(())
    }
}
