pub mod config;
pub mod tracing;
pub mod wiring;

pub use self::tracing::init_tracing_subscriber;
pub use config::{default_config_path, load_config, resolve_config};
pub use wiring::{wire_dependencies, Wired, WiringError, WiringResult};
