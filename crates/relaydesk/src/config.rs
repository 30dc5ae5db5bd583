//! Process-wide application configuration.

use serde::{Deserialize, Serialize};

/// Application configuration, sourced from the process environment.
///
/// These values double as the static fallback settings reported when the
/// remote settings table is empty or unreachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Supabase project URL.
    pub supabase_url: Option<String>,

    /// Supabase anonymous key (read access).
    pub supabase_anon_key: Option<String>,

    /// Supabase service role key (write access). Sensitive: resolved
    /// settings only ever report it masked.
    pub supabase_service_key: Option<String>,

    /// Display name of the application.
    pub app_name: String,

    /// Application version string.
    pub app_version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_anon_key: None,
            supabase_service_key: None,
            app_name: "Email Routing Manager".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Unset or empty variables leave the defaults in place.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.supabase_url = env_var("SUPABASE_URL");
        config.supabase_anon_key = env_var("SUPABASE_ANON_KEY");
        config.supabase_service_key = env_var("SUPABASE_SERVICE_KEY");
        if let Some(name) = env_var("APP_NAME") {
            config.app_name = name;
        }
        if let Some(version) = env_var("APP_VERSION") {
            config.app_version = version;
        }
        config
    }

    /// Whether enough credentials are configured to reach the remote store.
    pub fn has_remote_credentials(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_service_key.is_some()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.supabase_url.is_none());
        assert_eq!(config.app_name, "Email Routing Manager");
        assert!(!config.has_remote_credentials());
    }

    #[test]
    fn test_has_remote_credentials() {
        let config = AppConfig {
            supabase_url: Some("https://project.supabase.co".to_string()),
            supabase_service_key: Some("service-key".to_string()),
            ..AppConfig::default()
        };
        assert!(config.has_remote_credentials());
    }
}
