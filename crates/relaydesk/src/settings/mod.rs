//! System settings subsystem.
//!
//! Validates inbound update batches, reconciles them into the remote
//! settings table with partial-failure semantics, and resolves the
//! effective settings with a static fallback when the table is empty or
//! unreachable.

mod reconciler;
mod resolver;
mod sensitivity;
mod types;

pub use reconciler::{
    KeyOutcome, ReconcileError, ReconciliationResult, SettingsReconciler,
};
pub use resolver::{ResolvedSettings, SettingsResolver, SettingsSource};
pub use sensitivity::{is_sensitive, MASKED_VALUE};
pub use types::{
    setting_description, SettingsResponse, UpdateBatch, UpdateSettingsRequest, KEY_APP_NAME,
    KEY_APP_VERSION, KEY_SUPABASE_ANON_KEY, KEY_SUPABASE_SERVICE_KEY, KEY_SUPABASE_URL,
    PROTECTED_KEYS,
};
