//! Test utilities and common setup.

use async_trait::async_trait;
use dashmap::DashSet;

use relaydesk::config::AppConfig;
use relaydesk::store::{
    MemoryStore, NewSetting, SettingRecord, SettingsStore, StoreError, StoreResult,
};

/// Config with remote credentials present, so validation passes.
pub fn test_config() -> AppConfig {
    AppConfig {
        supabase_url: Some("https://project.supabase.co".to_string()),
        supabase_anon_key: Some("anon-key".to_string()),
        supabase_service_key: Some("service-key".to_string()),
        ..AppConfig::default()
    }
}

/// Store wrapper that rejects upserts for chosen keys, for exercising
/// partial-failure aggregation.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    reject: DashSet<String>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_key(&self, key: &str) {
        self.reject.insert(key.to_string());
    }
}

#[async_trait]
impl SettingsStore for FlakyStore {
    async fn list_all(&self) -> StoreResult<Vec<SettingRecord>> {
        self.inner.list_all().await
    }

    async fn get(&self, key: &str) -> StoreResult<Option<SettingRecord>> {
        self.inner.get(key).await
    }

    async fn upsert(&self, setting: NewSetting) -> StoreResult<()> {
        if self.reject.contains(&setting.setting_key) {
            return Err(StoreError::ApiError {
                status: 500,
                message: format!("injected failure for {}", setting.setting_key),
            });
        }
        self.inner.upsert(setting).await
    }

    async fn delete_all_except(&self, keep: &[&str]) -> StoreResult<u64> {
        self.inner.delete_all_except(keep).await
    }
}

/// Store whose every call fails, for exercising the resolver fallback.
pub struct UnreachableStore;

#[async_trait]
impl SettingsStore for UnreachableStore {
    async fn list_all(&self) -> StoreResult<Vec<SettingRecord>> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<SettingRecord>> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn upsert(&self, _setting: NewSetting) -> StoreResult<()> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn delete_all_except(&self, _keep: &[&str]) -> StoreResult<u64> {
        Err(StoreError::Backend("connection refused".to_string()))
    }
}

/// Store whose upserts never complete, for exercising the per-upsert
/// timeout.
pub struct HangingStore;

#[async_trait]
impl SettingsStore for HangingStore {
    async fn list_all(&self) -> StoreResult<Vec<SettingRecord>> {
        Ok(Vec::new())
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<SettingRecord>> {
        Ok(None)
    }

    async fn upsert(&self, _setting: NewSetting) -> StoreResult<()> {
        futures::future::pending::<()>().await;
        Ok(())
    }

    async fn delete_all_except(&self, _keep: &[&str]) -> StoreResult<u64> {
        Ok(0)
    }
}
