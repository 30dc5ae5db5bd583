//! Layered settings resolution: remote table first, static fallback second.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use super::sensitivity::MASKED_VALUE;
use super::types::{
    setting_description, KEY_APP_NAME, KEY_APP_VERSION, KEY_SUPABASE_ANON_KEY,
    KEY_SUPABASE_SERVICE_KEY, KEY_SUPABASE_URL,
};
use crate::config::AppConfig;
use crate::store::{SettingRecord, SettingsStore};

/// Where a resolved settings list came from.
///
/// Decided at the point of resolution and carried explicitly; never
/// inferred from the records themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsSource {
    Remote,
    Fallback,
}

/// Settings list together with its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub records: Vec<SettingRecord>,
    pub source: SettingsSource,
}

impl ResolvedSettings {
    /// Display-safe copy of the records: sensitive values replaced by the
    /// mask.
    pub fn masked(&self) -> Vec<SettingRecord> {
        self.records
            .iter()
            .cloned()
            .map(|mut record| {
                if record.is_encrypted {
                    record.setting_value = MASKED_VALUE.to_string();
                }
                record
            })
            .collect()
    }
}

/// Resolves effective settings from the remote store, falling back to the
/// process configuration.
pub struct SettingsResolver {
    store: Arc<dyn SettingsStore>,
    config: AppConfig,
}

impl SettingsResolver {
    pub fn new(store: Arc<dyn SettingsStore>, config: AppConfig) -> Self {
        Self { store, config }
    }

    /// Resolve the current settings.
    ///
    /// A store error is treated the same as an empty table: the resolver
    /// switches to the fallback list and never surfaces the error. No
    /// retries are attempted.
    pub async fn resolve(&self) -> ResolvedSettings {
        match self.store.list_all().await {
            Ok(records) if !records.is_empty() => ResolvedSettings {
                records,
                source: SettingsSource::Remote,
            },
            Ok(_) => {
                debug!("settings table empty, using fallback");
                self.fallback()
            }
            Err(err) => {
                warn!(error = %err, "settings store unavailable, using fallback");
                self.fallback()
            }
        }
    }

    /// The five well-known settings, built from process configuration.
    ///
    /// The service key value is never reported in full: masked when
    /// configured, empty otherwise.
    fn fallback(&self) -> ResolvedSettings {
        let now = Utc::now();
        let record = |key: &str, value: String, is_encrypted: bool| SettingRecord {
            setting_key: key.to_string(),
            setting_value: value,
            description: Some(setting_description(key)),
            is_encrypted,
            updated_at: now,
        };

        let service_key_value = if self.config.supabase_service_key.is_some() {
            MASKED_VALUE.to_string()
        } else {
            String::new()
        };

        let records = vec![
            record(
                KEY_SUPABASE_URL,
                self.config.supabase_url.clone().unwrap_or_default(),
                false,
            ),
            record(
                KEY_SUPABASE_ANON_KEY,
                self.config.supabase_anon_key.clone().unwrap_or_default(),
                false,
            ),
            record(KEY_SUPABASE_SERVICE_KEY, service_key_value, true),
            record(KEY_APP_NAME, self.config.app_name.clone(), false),
            record(KEY_APP_VERSION, self.config.app_version.clone(), false),
        ];

        ResolvedSettings {
            records,
            source: SettingsSource::Fallback,
        }
    }
}
