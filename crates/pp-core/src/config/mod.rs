//! # Configuration DTO
//!
//! Pure data: TOML -> struct mapping only. No validation and no default value
//! policy here; missing keys become empty values and the wiring layer decides
//! what an empty value means.

use std::path::PathBuf;

/// Application configuration (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Auth backend selector, e.g. `"firebase"` or `"memory"` (may be empty)
    pub auth_backend: String,

    /// Firebase Web API key (may be empty)
    pub auth_api_key: String,

    /// Identity Toolkit base URL (may be empty)
    pub auth_endpoint: String,

    /// Request timeout in seconds, 0 when unset
    pub auth_request_timeout_secs: u64,

    /// Saved-state file path (path info only, no existence check)
    pub saved_state_path: PathBuf,

    /// Log directory (path info only)
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Create AppConfig from a TOML value.
    ///
    /// Must not contain validation or default logic. Empty strings are valid.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        Ok(Self {
            auth_backend: str_at("auth", "backend"),
            auth_api_key: str_at("auth", "api_key"),
            auth_endpoint: str_at("auth", "endpoint"),
            auth_request_timeout_secs: toml_value
                .get("auth")
                .and_then(|a| a.get("request_timeout_secs"))
                .and_then(|v| v.as_integer())
                .and_then(|v| u64::try_from(v).ok())
                .unwrap_or(0),
            saved_state_path: PathBuf::from(str_at("storage", "saved_state_path")),
            log_dir: PathBuf::from(str_at("logging", "directory")),
        })
    }

    /// Create empty AppConfig (all empty values).
    pub fn empty() -> Self {
        Self {
            auth_backend: String::new(),
            auth_api_key: String::new(),
            auth_endpoint: String::new(),
            auth_request_timeout_secs: 0,
            saved_state_path: PathBuf::new(),
            log_dir: PathBuf::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_toml_maps_all_sections() {
        let value: toml::Value = toml::from_str(
            r#"
            [auth]
            backend = "firebase"
            api_key = "key-123"
            endpoint = "http://localhost:9099"
            request_timeout_secs = 7

            [storage]
            saved_state_path = "/tmp/pp/state.json"

            [logging]
            directory = "/tmp/pp/logs"
            "#,
        )
        .unwrap();

        let config = AppConfig::from_toml(&value).unwrap();

        assert_eq!(config.auth_backend, "firebase");
        assert_eq!(config.auth_api_key, "key-123");
        assert_eq!(config.auth_endpoint, "http://localhost:9099");
        assert_eq!(config.auth_request_timeout_secs, 7);
        assert_eq!(config.saved_state_path, PathBuf::from("/tmp/pp/state.json"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/pp/logs"));
    }

    #[test]
    fn missing_keys_are_empty_facts() {
        let value: toml::Value = toml::from_str("[auth]\n").unwrap();
        assert_eq!(AppConfig::from_toml(&value).unwrap(), AppConfig::empty());
    }

    #[test]
    fn negative_timeout_is_treated_as_unset() {
        let value: toml::Value = toml::from_str("[auth]\nrequest_timeout_secs = -3\n").unwrap();
        assert_eq!(
            AppConfig::from_toml(&value).unwrap().auth_request_timeout_secs,
            0
        );
    }
}
