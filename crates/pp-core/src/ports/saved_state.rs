/// Errors from a saved-state store.
#[derive(Debug, thiserror::Error)]
pub enum SavedStateError {
    #[error("saved state io failed: {0}")]
    Io(String),

    #[error("saved state is corrupt: {0}")]
    Corrupt(String),
}

/// Restorable key-value slots that survive process interruption.
///
/// Written on every keystroke, so implementations must be cheap and synchronous.
pub trait SavedStatePort: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SavedStateError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SavedStateError>;
    fn remove(&self, key: &str) -> Result<(), SavedStateError>;
}
