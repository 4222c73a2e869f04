mod firebase;
mod in_memory;

pub use firebase::{FirebaseAuthConfig, FirebaseAuthService, DEFAULT_IDENTITY_TOOLKIT_ENDPOINT};
pub use in_memory::InMemoryAuthService;
