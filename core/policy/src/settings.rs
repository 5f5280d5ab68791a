//! The persisted settings document.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use noteveil_common::{Error, NotePath, Result};

use crate::registry::LockRecord;

/// Smallest allowed blur intensity.
pub const BLUR_MIN: u8 = 1;

/// Largest allowed blur intensity.
pub const BLUR_MAX: u8 = 20;

/// Default blur intensity.
pub const BLUR_DEFAULT: u8 = 10;

/// The settings document, as persisted through a
/// [`noteveil_store::SettingsStore`].
///
/// Field names are part of the on-disk format read and written by UI
/// layers. Missing fields fall back to defaults, so documents from older
/// releases load cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Reserved. Round-trips untouched; unused by the policy engine.
    pub master_password: String,
    /// Lock records by vault path.
    pub locked_items: HashMap<NotePath, LockRecord>,
    /// How strongly obscured content is blurred (1..=20). UI concern only.
    pub blur_intensity: u8,
    /// Automatically revoke session grants when tabs close or switch away.
    pub auto_lock_on_close: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_password: String::new(),
            locked_items: HashMap::new(),
            blur_intensity: BLUR_DEFAULT,
            auto_lock_on_close: true,
        }
    }
}

impl Settings {
    /// Clamp a blur intensity into the supported range.
    pub fn clamp_blur(intensity: u8) -> u8 {
        intensity.clamp(BLUR_MIN, BLUR_MAX)
    }

    /// Serialize to bytes for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::Serialization(e.to_string()))
    }
}
