//! Supabase PostgREST client for the settings table.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};

use super::error::{StoreError, StoreResult};
use super::traits::SettingsStore;
use super::types::{NewSetting, SettingRecord};

const SETTINGS_TABLE: &str = "system_settings";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the hosted settings table, speaking the PostgREST dialect.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    /// HTTP client.
    client: Client,
    /// Project base URL (e.g., "https://project.supabase.co").
    base_url: String,
    /// API key sent with every request. The service role key is required
    /// for writes; the anon key is enough for read-only use.
    api_key: String,
}

impl SupabaseStore {
    /// Create a new store client.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, SETTINGS_TABLE)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    async fn api_error(response: Response) -> StoreError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        StoreError::ApiError { status, message }
    }
}

#[async_trait]
impl SettingsStore for SupabaseStore {
    async fn list_all(&self) -> StoreResult<Vec<SettingRecord>> {
        let url = format!("{}?select=*&order=setting_key.asc", self.table_url());
        let response = self.authed(self.client.get(&url)).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn get(&self, key: &str) -> StoreResult<Option<SettingRecord>> {
        let url = format!(
            "{}?select=*&setting_key=eq.{}",
            self.table_url(),
            urlencoding::encode(key)
        );
        let response = self.authed(self.client.get(&url)).send().await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let records: Vec<SettingRecord> = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        Ok(records.into_iter().next())
    }

    async fn upsert(&self, setting: NewSetting) -> StoreResult<()> {
        let url = format!("{}?on_conflict=setting_key", self.table_url());
        let response = self
            .authed(self.client.post(&url))
            .header("Prefer", "resolution=merge-duplicates")
            .json(&setting)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => Ok(()),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn delete_all_except(&self, keep: &[&str]) -> StoreResult<u64> {
        let exclusion = keep.join(",");
        let url = format!(
            "{}?setting_key=not.in.({})",
            self.table_url(),
            urlencoding::encode(&exclusion)
        );
        let response = self
            .authed(self.client.delete(&url))
            .header("Prefer", "return=representation")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let deleted: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        Ok(deleted.len() as u64)
    }
}
