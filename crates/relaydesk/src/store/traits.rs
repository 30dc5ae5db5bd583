//! Settings store trait definition.

use async_trait::async_trait;

use super::types::{NewSetting, SettingRecord};
use super::StoreResult;

/// A logical table of settings records with a unique constraint on
/// `setting_key`.
///
/// Implementations provide access to the hosted table store, whether remote
/// or in-memory.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// List every record, ordered by key.
    async fn list_all(&self) -> StoreResult<Vec<SettingRecord>>;

    /// Fetch a single record by key.
    async fn get(&self, key: &str) -> StoreResult<Option<SettingRecord>>;

    /// Insert or update one record; the conflict target is `setting_key`.
    async fn upsert(&self, setting: NewSetting) -> StoreResult<()>;

    /// Delete every record whose key is not in `keep`.
    ///
    /// Returns the number of deleted rows.
    async fn delete_all_except(&self, keep: &[&str]) -> StoreResult<u64>;
}
