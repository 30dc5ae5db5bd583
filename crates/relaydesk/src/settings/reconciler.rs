//! Reconciliation pass: validate, fan out upserts, aggregate, then sync the
//! local fallback env file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::types::{UpdateBatch, KEY_SUPABASE_SERVICE_KEY, KEY_SUPABASE_URL, PROTECTED_KEYS};
use crate::config::AppConfig;
use crate::envfile;
use crate::store::{NewSetting, SettingsStore, StoreError, StoreResult};

const DEFAULT_UPSERT_TIMEOUT: Duration = Duration::from_secs(30);

/// Validation failures that abort a pass before any network call.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The submitted batch had no entries.
    #[error("no settings provided")]
    EmptyBatch,

    /// A required credential key is neither in the batch nor configured.
    #[error("missing required setting: {0}")]
    MissingCredential(&'static str),
}

/// Outcome for one key of a batch.
#[derive(Debug, Clone)]
pub struct KeyOutcome {
    pub key: String,
    /// `None` on success, the failure reason otherwise.
    pub error: Option<String>,
}

/// Aggregate outcome of one reconciliation pass.
///
/// Partial success is a valid terminal state: keys that succeeded stay
/// committed, there is no cross-key rollback.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationResult {
    pub outcomes: Vec<KeyOutcome>,
}

impl ReconciliationResult {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.error.is_none())
    }

    /// Number of keys that were committed.
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_none()).count()
    }

    pub fn failed_keys(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| o.error.is_some())
            .map(|o| o.key.clone())
            .collect()
    }
}

/// Coordinates one reconciliation pass against the remote store and the
/// local fallback env file.
pub struct SettingsReconciler {
    store: Arc<dyn SettingsStore>,
    config: AppConfig,
    env_path: PathBuf,
    upsert_timeout: Duration,
    /// Serializes the env file's read-modify-write within this process.
    /// At most one pass in flight across processes remains the caller's
    /// contract.
    file_lock: Mutex<()>,
}

impl SettingsReconciler {
    pub fn new(store: Arc<dyn SettingsStore>, config: AppConfig, env_path: PathBuf) -> Self {
        Self {
            store,
            config,
            env_path,
            upsert_timeout: DEFAULT_UPSERT_TIMEOUT,
            file_lock: Mutex::new(()),
        }
    }

    pub fn with_upsert_timeout(mut self, timeout: Duration) -> Self {
        self.upsert_timeout = timeout;
        self
    }

    /// Apply a batch to the remote store.
    ///
    /// Per-key upserts run concurrently with no ordering guarantee and no
    /// dependency between keys. A failed key never aborts its siblings.
    /// Only a fully successful pass touches the fallback env file, and that
    /// side effect can never change the reported outcome.
    pub async fn apply(&self, batch: &UpdateBatch) -> Result<ReconciliationResult, ReconcileError> {
        if batch.is_empty() {
            return Err(ReconcileError::EmptyBatch);
        }
        self.validate(batch)?;

        let upserts = batch.iter().map(|(key, value)| {
            let setting = NewSetting::new(key, value);
            let key = key.to_string();
            async move {
                let error = match tokio::time::timeout(
                    self.upsert_timeout,
                    self.store.upsert(setting),
                )
                .await
                {
                    Ok(Ok(())) => None,
                    Ok(Err(err)) => Some(err.to_string()),
                    Err(_) => Some(StoreError::Timeout(self.upsert_timeout).to_string()),
                };
                if let Some(reason) = &error {
                    warn!(key = %key, reason = %reason, "setting upsert failed");
                }
                KeyOutcome { key, error }
            }
        });
        let outcomes = join_all(upserts).await;
        let result = ReconciliationResult { outcomes };

        if result.is_success() {
            info!(saved = result.saved(), "settings reconciled");
            self.sync_env_file(batch).await;
        } else {
            warn!(
                saved = result.saved(),
                failed = ?result.failed_keys(),
                "settings partially reconciled"
            );
        }
        Ok(result)
    }

    /// Bulk delete of every non-protected key. The application identity
    /// keys survive.
    pub async fn clear_unprotected(&self) -> StoreResult<u64> {
        let deleted = self.store.delete_all_except(&PROTECTED_KEYS).await?;
        info!(deleted, "cleared unprotected settings");
        Ok(deleted)
    }

    /// The required credential-like keys must be available from the batch
    /// or the process configuration before any upsert is attempted.
    fn validate(&self, batch: &UpdateBatch) -> Result<(), ReconcileError> {
        if !batch.contains_key(KEY_SUPABASE_URL) && self.config.supabase_url.is_none() {
            return Err(ReconcileError::MissingCredential(KEY_SUPABASE_URL));
        }
        if !batch.contains_key(KEY_SUPABASE_SERVICE_KEY)
            && self.config.supabase_service_key.is_none()
        {
            return Err(ReconcileError::MissingCredential(KEY_SUPABASE_SERVICE_KEY));
        }
        Ok(())
    }

    /// Best-effort update of the fallback env file. Failures are logged and
    /// swallowed: the store already committed and the file is only a cache.
    async fn sync_env_file(&self, batch: &UpdateBatch) {
        let _guard = self.file_lock.lock().await;
        if let Err(err) = envfile::merge_file(&self.env_path, batch).await {
            warn!(
                path = %self.env_path.display(),
                error = %err,
                "failed to update fallback env file"
            );
        }
    }
}
