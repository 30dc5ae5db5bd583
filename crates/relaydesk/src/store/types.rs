//! Settings table records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::{is_sensitive, setting_description};

/// One row of the `system_settings` table.
///
/// `setting_key` is the sole uniqueness and upsert-conflict target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingRecord {
    pub setting_key: String,
    pub setting_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_encrypted: bool,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload for one setting.
#[derive(Debug, Clone, Serialize)]
pub struct NewSetting {
    pub setting_key: String,
    pub setting_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_encrypted: bool,
    pub updated_at: DateTime<Utc>,
}

impl NewSetting {
    /// Build an upsert payload from a key/value pair, classifying the key's
    /// sensitivity and attaching the canonical description.
    ///
    /// `is_encrypted` is a display/metadata flag only: the value is stored
    /// and transmitted in plaintext.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        let setting_key = key.into();
        Self {
            setting_value: value.into(),
            description: Some(setting_description(&setting_key)),
            is_encrypted: is_sensitive(&setting_key),
            updated_at: Utc::now(),
            setting_key,
        }
    }

    /// Convert into the record this payload results in after a successful
    /// upsert.
    pub fn into_record(self) -> SettingRecord {
        SettingRecord {
            setting_key: self.setting_key,
            setting_value: self.setting_value,
            description: self.description,
            is_encrypted: self.is_encrypted,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_setting_classifies_sensitivity() {
        let setting = NewSetting::new("supabase_service_key", "abc");
        assert!(setting.is_encrypted);
        assert_eq!(
            setting.description.as_deref(),
            Some("Supabase Service Role Key")
        );

        let setting = NewSetting::new("app_name", "Relaydesk");
        assert!(!setting.is_encrypted);
    }

    #[test]
    fn test_record_wire_names() {
        let setting = NewSetting::new("app_name", "Relaydesk").into_record();
        let json = serde_json::to_value(&setting).unwrap();
        assert_eq!(json["setting_key"], "app_name");
        assert_eq!(json["setting_value"], "Relaydesk");
        assert_eq!(json["is_encrypted"], false);
    }
}
