//! # Dependency Injection
//!
//! Turns an [`AppConfig`] into concrete adapters and assembles [`AppDeps`].
//! This is the only place that decides what an empty config value means.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use pp_app::{App, AppDeps};
use pp_core::auth::UserIdentity;
use pp_core::config::AppConfig;
use pp_core::feed::PostFeedItem;
use pp_core::ports::{AuthEvent, AuthServicePort};
use pp_infra::saved_state::DEFAULT_SAVED_STATE_FILE;
use pp_infra::{
    ChannelAuthEventEmitter, FirebaseAuthConfig, FirebaseAuthService, InMemoryAuthService,
    InMemoryFeedSource, JsonFileSavedState,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

const APP_DIR_NAME: &str = "pixelpost";
const LOGS_DIR_NAME: &str = "logs";

const BACKEND_FIREBASE: &str = "firebase";
const BACKEND_MEMORY: &str = "memory";

/// Account available with the `memory` backend.
pub const DEMO_IDENTIFIER: &str = "demo@pixelpost.app";
pub const DEMO_PASSWORD: &str = "pixelpost";

pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("unknown auth backend: {0}")]
    UnknownBackend(String),

    #[error("auth backend 'firebase' requires auth.api_key")]
    MissingApiKey,

    #[error("auth initialization failed: {0}")]
    AuthInit(String),

    #[error("saved state initialization failed: {0}")]
    SavedStateInit(String),

    #[error("no platform data directory available")]
    NoDataDir,
}

/// Wired application plus the UI end of the auth event channel.
pub struct Wired {
    pub app: App,
    pub events: UnboundedReceiver<AuthEvent>,
}

fn data_dir() -> WiringResult<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(WiringError::NoDataDir)
}

/// Saved-state file; defaults into the platform data dir.
pub fn resolve_saved_state_path(config: &AppConfig) -> WiringResult<PathBuf> {
    if !config.saved_state_path.as_os_str().is_empty() {
        return Ok(config.saved_state_path.clone());
    }
    Ok(data_dir()?.join(DEFAULT_SAVED_STATE_FILE))
}

/// Log directory; defaults into the platform data dir.
pub fn resolve_log_dir(config: &AppConfig) -> WiringResult<PathBuf> {
    if !config.log_dir.as_os_str().is_empty() {
        return Ok(config.log_dir.clone());
    }
    Ok(data_dir()?.join(LOGS_DIR_NAME))
}

fn create_auth_service(config: &AppConfig) -> WiringResult<Arc<dyn AuthServicePort>> {
    match config.auth_backend.as_str() {
        BACKEND_FIREBASE => {
            if config.auth_api_key.is_empty() {
                return Err(WiringError::MissingApiKey);
            }
            let mut firebase = FirebaseAuthConfig::new(config.auth_api_key.clone());
            if !config.auth_endpoint.is_empty() {
                firebase = firebase.with_endpoint(config.auth_endpoint.clone());
            }
            if config.auth_request_timeout_secs > 0 {
                firebase =
                    firebase.with_timeout(Duration::from_secs(config.auth_request_timeout_secs));
            }
            let service = FirebaseAuthService::new(firebase)
                .map_err(|e| WiringError::AuthInit(format!("{e:#}")))?;
            Ok(Arc::new(service))
        }
        "" | BACKEND_MEMORY => Ok(Arc::new(InMemoryAuthService::new().with_account(
            DEMO_IDENTIFIER,
            DEMO_PASSWORD,
            UserIdentity::new("demo")
                .with_email(DEMO_IDENTIFIER)
                .with_display_name("PixelPost Demo"),
        ))),
        other => Err(WiringError::UnknownBackend(other.to_string())),
    }
}

fn demo_posts() -> Vec<PostFeedItem> {
    let now = Utc::now();
    let post = |id: &str, user: &str, caption: &str, hours_ago: i64, likes: u32| PostFeedItem {
        id: id.to_string(),
        user_id: format!("uid-{user}"),
        user_name: user.to_string(),
        user_profile_image_url: None,
        image_urls: vec![format!("https://cdn.pixelpost.app/{id}.jpg")],
        image_url: format!("https://cdn.pixelpost.app/{id}.jpg"),
        is_carousel: false,
        caption: Some(caption.to_string()),
        location: None,
        created_at: now - ChronoDuration::hours(hours_ago),
        likes_count: likes,
        comments_count: 0,
        share_count: 0,
        share_url: None,
    };

    vec![
        post("p1", "ada", "first light over the harbour", 5, 12),
        post("p2", "grace", "new lens, who dis", 1, 40),
        post("p3", "linus", "cat on keyboard again", 26, 3),
    ]
}

/// Build every adapter named by `config` and assemble the [`App`].
pub fn wire_dependencies(config: &AppConfig) -> WiringResult<Wired> {
    let auth_service = create_auth_service(config)?;

    let saved_state_path = resolve_saved_state_path(config)?;
    let saved_state = JsonFileSavedState::open(&saved_state_path)
        .map_err(|e| WiringError::SavedStateInit(e.to_string()))?;

    let (emitter, events) = ChannelAuthEventEmitter::new();

    let backend = if config.auth_backend.is_empty() {
        BACKEND_MEMORY
    } else {
        config.auth_backend.as_str()
    };
    info!(
        backend,
        saved_state = %saved_state_path.display(),
        "dependencies wired"
    );

    let deps = AppDeps {
        auth_service,
        auth_events: Arc::new(emitter),
        saved_state: Arc::new(saved_state),
        feed_source: Arc::new(InMemoryFeedSource::new(demo_posts())),
    };

    Ok(Wired {
        app: App::new(deps),
        events,
    })
}
