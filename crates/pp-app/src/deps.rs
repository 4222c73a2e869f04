//! # Application Dependencies
//!
//! Dependency grouping for App construction.
//!
//! **Note**: This is NOT a Builder pattern.
//! - No build steps
//! - No default values
//! - No hidden logic
//! - Just parameter grouping

use std::sync::Arc;
use pp_core::ports::*;

/// Application dependency grouping (non-Builder, just parameter grouping)
///
/// All dependencies are required - no defaults, no optional fields.
pub struct AppDeps {
    // Auth dependencies
    pub auth_service: Arc<dyn AuthServicePort>,
    pub auth_events: Arc<dyn AuthEventPort>,

    // Storage dependencies
    pub saved_state: Arc<dyn SavedStatePort>,

    // Feed dependencies
    pub feed_source: Arc<dyn FeedSourcePort>,
}
