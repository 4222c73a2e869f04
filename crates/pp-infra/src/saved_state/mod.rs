mod json_file;
mod memory;

pub use json_file::{JsonFileSavedState, DEFAULT_SAVED_STATE_FILE};
pub use memory::InMemorySavedState;
