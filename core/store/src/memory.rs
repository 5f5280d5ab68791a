//! In-memory settings store for testing.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::store::SettingsStore;
use noteveil_common::Result;

/// In-memory settings store.
///
/// Useful for testing and development. The document is lost on drop.
#[derive(Clone, Default)]
pub struct MemoryStore {
    document: Arc<RwLock<Option<Vec<u8>>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.document.read().unwrap().clone())
    }

    async fn save(&self, data: &[u8]) -> Result<()> {
        *self.document.write().unwrap() = Some(data.to_vec());
        Ok(())
    }
}
