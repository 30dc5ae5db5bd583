//! Batch and wire types for settings reconciliation.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::reconciler::{ReconcileError, ReconciliationResult};

/// Well-known setting keys.
pub const KEY_SUPABASE_URL: &str = "supabase_url";
pub const KEY_SUPABASE_ANON_KEY: &str = "supabase_anon_key";
pub const KEY_SUPABASE_SERVICE_KEY: &str = "supabase_service_key";
pub const KEY_APP_NAME: &str = "app_name";
pub const KEY_APP_VERSION: &str = "app_version";

/// Keys that bulk deletion must never remove.
pub const PROTECTED_KEYS: [&str; 2] = [KEY_APP_NAME, KEY_APP_VERSION];

static DESCRIPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (KEY_SUPABASE_URL, "Supabase Project URL"),
        (KEY_SUPABASE_ANON_KEY, "Supabase Anonymous Key"),
        (KEY_SUPABASE_SERVICE_KEY, "Supabase Service Role Key"),
        (KEY_APP_NAME, "Application Name"),
        (KEY_APP_VERSION, "Application Version"),
        ("default_language", "Default Language"),
        ("max_email_per_domain", "Maximum Email Per Domain"),
        ("session_timeout", "Session Timeout (minutes)"),
    ])
});

/// Canonical description for a setting key.
pub fn setting_description(key: &str) -> String {
    match DESCRIPTIONS.get(key) {
        Some(description) => (*description).to_string(),
        None => format!("Setting for {key}"),
    }
}

/// Ordered key/value changes for one reconciliation pass.
///
/// Iteration order is the caller's submission order; it decides where newly
/// appended keys land in the env file. Inserting an existing key overwrites
/// its value without moving the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBatch {
    entries: Vec<(String, String)>,
}

impl UpdateBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key/value pair. An existing key keeps its position and gets
    /// the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pairs in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, String)> for UpdateBatch {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut batch = Self::new();
        for (key, value) in iter {
            batch.insert(key, value);
        }
        batch
    }
}

impl Serialize for UpdateBatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for UpdateBatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BatchVisitor;

        impl<'de> Visitor<'de> for BatchVisitor {
            type Value = UpdateBatch;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of string keys to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut batch = UpdateBatch::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    batch.insert(key, value);
                }
                Ok(batch)
            }
        }

        deserializer.deserialize_map(BatchVisitor)
    }
}

/// Inbound payload for a settings update.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingsRequest {
    pub settings: UpdateBatch,
}

/// Structured outcome returned to callers.
///
/// Distinguishes "nothing saved", "fully saved", and "partially saved with
/// named failures" - callers never see a bare error.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "failedKeys", skip_serializing_if = "Option::is_none")]
    pub failed_keys: Option<Vec<String>>,
}

impl From<&ReconciliationResult> for SettingsResponse {
    fn from(result: &ReconciliationResult) -> Self {
        if result.is_success() {
            Self {
                success: true,
                message: Some("Settings updated successfully".to_string()),
                saved: Some(result.saved()),
                error: None,
                failed_keys: None,
            }
        } else {
            Self {
                success: false,
                message: None,
                saved: Some(result.saved()),
                error: Some("Some settings could not be saved".to_string()),
                failed_keys: Some(result.failed_keys()),
            }
        }
    }
}

impl From<&ReconcileError> for SettingsResponse {
    fn from(error: &ReconcileError) -> Self {
        Self {
            success: false,
            message: None,
            saved: None,
            error: Some(error.to_string()),
            failed_keys: None,
        }
    }
}
