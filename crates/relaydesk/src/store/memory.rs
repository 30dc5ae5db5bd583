//! In-memory settings store.
//!
//! Backs tests and deployments running without remote credentials. Honors
//! the same contract as the remote table: `setting_key` uniqueness and
//! ordered listing.

use async_trait::async_trait;
use dashmap::DashMap;

use super::traits::SettingsStore;
use super::types::{NewSetting, SettingRecord};
use super::StoreResult;

/// Concurrent in-memory settings table.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, SettingRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<SettingRecord>> {
        let mut records: Vec<SettingRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| a.setting_key.cmp(&b.setting_key));
        Ok(records)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<SettingRecord>> {
        Ok(self.records.get(key).map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, setting: NewSetting) -> StoreResult<()> {
        self.records
            .insert(setting.setting_key.clone(), setting.into_record());
        Ok(())
    }

    async fn delete_all_except(&self, keep: &[&str]) -> StoreResult<u64> {
        let before = self.records.len();
        self.records.retain(|key, _| keep.contains(&key.as_str()));
        Ok((before - self.records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_overwrites_on_key() {
        let store = MemoryStore::new();
        store.upsert(NewSetting::new("app_name", "One")).await.unwrap();
        store.upsert(NewSetting::new("app_name", "Two")).await.unwrap();

        assert_eq!(store.len(), 1);
        let record = store.get("app_name").await.unwrap().unwrap();
        assert_eq!(record.setting_value, "Two");
    }

    #[tokio::test]
    async fn test_list_all_ordered_by_key() {
        let store = MemoryStore::new();
        store.upsert(NewSetting::new("b", "2")).await.unwrap();
        store.upsert(NewSetting::new("a", "1")).await.unwrap();

        let keys: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.setting_key)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_delete_all_except() {
        let store = MemoryStore::new();
        store.upsert(NewSetting::new("app_name", "x")).await.unwrap();
        store.upsert(NewSetting::new("app_version", "1")).await.unwrap();
        store.upsert(NewSetting::new("other", "y")).await.unwrap();

        let deleted = store
            .delete_all_except(&["app_name", "app_version"])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(store.get("other").await.unwrap().is_none());
        assert!(store.get("app_name").await.unwrap().is_some());
    }
}
