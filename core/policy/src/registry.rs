//! Lock registry: durable mapping from vault paths to lock records.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use noteveil_common::{NotePath, Passphrase};
use noteveil_digest::Digest;

/// Kind of vault item a lock record owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Folder,
}

/// One lock record per locked path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    /// Whether the locked item is a file or a folder.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Digest of the passphrase guarding the item.
    pub hashed_password: String,
}

/// The nearest lock record covering a path, with its owning key.
#[derive(Debug, Clone, Copy)]
pub struct CoveringLock<'a> {
    /// Path the record lives at: the covered path itself, or its nearest
    /// locked folder ancestor. Session grants are keyed by this path, so a
    /// folder-level unlock applies uniformly to all descendants.
    pub key: &'a NotePath,
    /// The record at `key`.
    pub record: &'a LockRecord,
}

/// Durable mapping from vault path to lock record.
///
/// Source of truth for "is this path protected". At most one record per
/// path. A Folder record covers itself and every descendant; a File record
/// covers only its own path.
pub struct LockRegistry {
    digest: Arc<dyn Digest>,
    records: HashMap<NotePath, LockRecord>,
}

impl LockRegistry {
    /// Create an empty registry using the given digest scheme.
    pub fn new(digest: Arc<dyn Digest>) -> Self {
        Self::with_records(digest, HashMap::new())
    }

    /// Create a registry from previously persisted records.
    pub fn with_records(digest: Arc<dyn Digest>, records: HashMap<NotePath, LockRecord>) -> Self {
        Self { digest, records }
    }

    /// Get the digest scheme records were written with.
    pub fn digest(&self) -> &dyn Digest {
        self.digest.as_ref()
    }

    /// Lock a path, inserting or overwriting its record.
    ///
    /// Overwrite is intentional: re-locking an item with a new passphrase is
    /// supported and replaces the old digest.
    pub fn set_lock(&mut self, path: NotePath, kind: ItemKind, passphrase: &Passphrase) {
        info!(path = %path, kind = ?kind, "Locking item");
        let record = LockRecord {
            kind,
            hashed_password: self.digest.digest(passphrase.as_str()),
        };
        self.records.insert(path, record);
    }

    /// Remove the lock record at `path`, if any.
    ///
    /// Returns whether a record existed. Removing an unlocked path is a
    /// benign no-op. Callers owning session state must evict any session
    /// grant keyed by `path` alongside this.
    pub fn remove_lock(&mut self, path: &NotePath) -> bool {
        let removed = self.records.remove(path).is_some();
        if removed {
            info!(path = %path, "Lock removed");
        } else {
            debug!(path = %path, "No lock to remove");
        }
        removed
    }

    /// Get the record stored at exactly `path`.
    pub fn record_at(&self, path: &NotePath) -> Option<&LockRecord> {
        self.records.get(path)
    }

    /// Find the nearest record covering `path`.
    ///
    /// A record at `path` itself is preferred; otherwise the nearest
    /// Folder-kind record among strict ancestors covers. File-kind records
    /// at ancestor paths cover nothing below them.
    pub fn covering(&self, path: &NotePath) -> Option<CoveringLock<'_>> {
        if let Some((key, record)) = self.records.get_key_value(path) {
            return Some(CoveringLock { key, record });
        }
        self.locked_folder_ancestor(path)
    }

    /// Find the nearest strict ancestor of `path` holding a Folder record.
    pub fn locked_folder_ancestor(&self, path: &NotePath) -> Option<CoveringLock<'_>> {
        for ancestor in path.ancestors() {
            if let Some((key, record)) = self.records.get_key_value(&ancestor) {
                if record.kind == ItemKind::Folder {
                    return Some(CoveringLock { key, record });
                }
            }
        }
        None
    }

    /// Check whether some record covers `path`.
    pub fn is_locked(&self, path: &NotePath) -> bool {
        self.covering(path).is_some()
    }

    /// Get all records, keyed by path.
    pub fn records(&self) -> &HashMap<NotePath, LockRecord> {
        &self.records
    }

    /// Iterate over locked paths and their records.
    pub fn iter(&self) -> impl Iterator<Item = (&NotePath, &LockRecord)> {
        self.records.iter()
    }

    /// Number of lock records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no locks exist.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
