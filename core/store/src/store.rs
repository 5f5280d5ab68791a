//! Settings store trait definition.

use async_trait::async_trait;

use noteveil_common::Result;

/// Persistence backend for the settings document.
///
/// The store moves opaque bytes; the policy layer owns the schema. Saves are
/// write-through: in-memory state is always updated before a save is
/// requested, and no read path depends on save completion.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Get the store name (e.g. "memory", "local").
    fn name(&self) -> &str;

    /// Load the persisted settings document.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` if a document exists
    /// - `Ok(None)` if nothing has been saved yet (first run)
    ///
    /// # Errors
    /// - I/O failure other than absence
    async fn load(&self) -> Result<Option<Vec<u8>>>;

    /// Persist the settings document, replacing any previous one.
    ///
    /// # Errors
    /// - I/O failure; the caller keeps its in-memory state either way
    async fn save(&self, data: &[u8]) -> Result<()>;
}
