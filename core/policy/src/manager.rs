//! Lock manager: the facade UI layers talk to.
//!
//! Owns the lock registry, the session policy engine, and the store handle,
//! and performs write-through persistence after every durable mutation.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use noteveil_common::{NotePath, Passphrase, Result};
use noteveil_digest::Digest;
use noteveil_store::SettingsStore;

use crate::registry::{ItemKind, LockRegistry};
use crate::session::SessionPolicy;
use crate::settings::Settings;

/// Facade over the lock registry and the session policy engine.
///
/// Explicitly constructed and explicitly owned; a UI layer holds exactly one
/// of these per vault. In-memory state is always mutated synchronously
/// before persistence is requested, so no read depends on a save having
/// completed.
pub struct LockManager {
    store: Arc<dyn SettingsStore>,
    registry: LockRegistry,
    session: SessionPolicy,
    /// Reserved settings field; round-trips through load/save untouched.
    master_password: String,
    blur_intensity: u8,
}

impl LockManager {
    /// Load a manager from the persisted settings document.
    ///
    /// An absent document yields defaults (first run).
    ///
    /// # Errors
    /// - Store read failure
    /// - Malformed settings document
    pub async fn load(store: Arc<dyn SettingsStore>, digest: Arc<dyn Digest>) -> Result<Self> {
        let settings = match store.load().await? {
            Some(bytes) => Settings::from_bytes(&bytes)?,
            None => Settings::default(),
        };
        debug!(
            store = store.name(),
            locked = settings.locked_items.len(),
            "Settings loaded"
        );

        let mut session = SessionPolicy::new();
        session.set_auto_relock(settings.auto_lock_on_close);

        Ok(Self {
            store,
            registry: LockRegistry::with_records(digest, settings.locked_items),
            session,
            master_password: settings.master_password,
            blur_intensity: Settings::clamp_blur(settings.blur_intensity),
        })
    }

    /// Lock a file or folder behind a passphrase.
    ///
    /// Re-locking an already locked path replaces its digest.
    ///
    /// # Errors
    /// - Persistence failure; the lock is held in memory regardless
    pub async fn lock_item(
        &mut self,
        path: NotePath,
        kind: ItemKind,
        passphrase: &Passphrase,
    ) -> Result<()> {
        self.registry.set_lock(path, kind, passphrase);
        self.persist().await
    }

    /// Remove the lock at `path`, if any. Returns whether one existed.
    ///
    /// Any session grant keyed by `path` is evicted alongside, so a removed
    /// lock cannot leave a stale grant behind.
    ///
    /// # Errors
    /// - Persistence failure; the removal is held in memory regardless
    pub async fn remove_lock(&mut self, path: &NotePath) -> Result<bool> {
        let removed = self.registry.remove_lock(path);
        self.session.evict(path);
        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }

    /// Try to unlock `path` for the session. See
    /// [`SessionPolicy::attempt_unlock`].
    pub fn attempt_unlock(&mut self, path: &NotePath, passphrase: &Passphrase) -> bool {
        self.session.attempt_unlock(&self.registry, path, passphrase)
    }

    /// Whether the UI must obscure `path` before rendering it.
    pub fn should_obscure(&self, path: &NotePath) -> bool {
        self.session.should_obscure(&self.registry, path)
    }

    /// Whether some lock record covers `path`.
    pub fn is_locked(&self, path: &NotePath) -> bool {
        self.registry.is_locked(path)
    }

    /// Whether `path` holds a session grant, directly or via an ancestor.
    pub fn is_session_unlocked(&self, path: &NotePath) -> bool {
        self.session.is_session_unlocked(path)
    }

    /// Explicitly revoke the session grants tied to `path`.
    pub fn relock(&mut self, path: &NotePath) -> bool {
        self.session.relock(&self.registry, path)
    }

    /// Forward an editor focus change. Returns whether any grant was
    /// revoked (a UI refresh signal).
    pub fn focus_changed(&mut self, new_active: Option<&NotePath>) -> bool {
        self.session.focus_changed(&self.registry, new_active)
    }

    /// Reconcile against a fresh snapshot of open editor paths. Returns
    /// whether any grant was revoked.
    pub fn sync_open_editors(&mut self, currently_open: HashSet<NotePath>) -> bool {
        self.session.editor_set_changed(&self.registry, currently_open)
    }

    /// Drop every session grant (host quit or plugin unload).
    pub fn clear_session(&mut self) {
        self.session.clear();
    }

    /// Locked paths and their kinds, for management UIs.
    pub fn locked_items(&self) -> impl Iterator<Item = (&NotePath, ItemKind)> {
        self.registry.iter().map(|(path, record)| (path, record.kind))
    }

    /// Current blur intensity (1..=20).
    pub fn blur_intensity(&self) -> u8 {
        self.blur_intensity
    }

    /// Set the blur intensity, clamped into 1..=20.
    ///
    /// # Errors
    /// - Persistence failure; the value is held in memory regardless
    pub async fn set_blur_intensity(&mut self, intensity: u8) -> Result<()> {
        self.blur_intensity = Settings::clamp_blur(intensity);
        self.persist().await
    }

    /// Whether closed tabs revoke their session grants.
    pub fn auto_lock_on_close(&self) -> bool {
        self.session.auto_relock()
    }

    /// Toggle automatic revocation on close/switch.
    ///
    /// # Errors
    /// - Persistence failure; the toggle is held in memory regardless
    pub async fn set_auto_lock_on_close(&mut self, enabled: bool) -> Result<()> {
        self.session.set_auto_relock(enabled);
        self.persist().await
    }

    fn snapshot(&self) -> Settings {
        Settings {
            master_password: self.master_password.clone(),
            locked_items: self.registry.records().clone(),
            blur_intensity: self.blur_intensity,
            auto_lock_on_close: self.session.auto_relock(),
        }
    }

    async fn persist(&self) -> Result<()> {
        let bytes = self.snapshot().to_bytes()?;
        if let Err(e) = self.store.save(&bytes).await {
            // In-memory state stays as applied; reverting a change the user
            // just saw succeed would be worse than a stale file.
            warn!(error = %e, store = self.store.name(), "Failed to persist settings");
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noteveil_digest::{Blake2Digest, RollingDigest};
    use noteveil_store::MemoryStore;

    fn path(s: &str) -> NotePath {
        NotePath::parse(s).unwrap()
    }

    fn open_set(paths: &[&str]) -> HashSet<NotePath> {
        paths.iter().map(|p| path(p)).collect()
    }

    async fn manager(store: Arc<dyn SettingsStore>) -> LockManager {
        LockManager::load(store, Arc::new(Blake2Digest)).await.unwrap()
    }

    #[tokio::test]
    async fn test_load_defaults_on_empty_store() {
        let manager = manager(Arc::new(MemoryStore::new())).await;

        assert!(!manager.is_locked(&path("anything.md")));
        assert_eq!(manager.blur_intensity(), 10);
        assert!(manager.auto_lock_on_close());
        assert_eq!(manager.locked_items().count(), 0);
    }

    #[tokio::test]
    async fn test_locks_survive_reload() {
        let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::new());

        let mut first = manager(store.clone()).await;
        first
            .lock_item(path("Secrets"), ItemKind::Folder, &"x".into())
            .await
            .unwrap();
        drop(first);

        let mut reloaded = manager(store).await;
        assert!(reloaded.is_locked(&path("Secrets/note.md")));
        // Session grants are not persisted: content starts obscured.
        assert!(reloaded.should_obscure(&path("Secrets/note.md")));
        assert!(reloaded.attempt_unlock(&path("Secrets/note.md"), &"x".into()));
        assert!(!reloaded.should_obscure(&path("Secrets/other.md")));
    }

    #[tokio::test]
    async fn test_remove_lock_evicts_session_grant() {
        let mut manager = manager(Arc::new(MemoryStore::new())).await;
        manager
            .lock_item(path("Secrets"), ItemKind::Folder, &"x".into())
            .await
            .unwrap();
        assert!(manager.attempt_unlock(&path("Secrets/a.md"), &"x".into()));

        assert!(manager.remove_lock(&path("Secrets")).await.unwrap());

        assert!(!manager.is_locked(&path("Secrets/a.md")));
        assert!(!manager.is_session_unlocked(&path("Secrets")));
        // Removing again is a benign no-op.
        assert!(!manager.remove_lock(&path("Secrets")).await.unwrap());
    }

    #[tokio::test]
    async fn test_single_file_wrong_then_right_passphrase() {
        let mut manager = manager(Arc::new(MemoryStore::new())).await;
        manager
            .lock_item(path("Diary.md"), ItemKind::File, &"p1".into())
            .await
            .unwrap();

        assert!(!manager.attempt_unlock(&path("Diary.md"), &"wrong".into()));
        assert!(manager.should_obscure(&path("Diary.md")));

        assert!(manager.attempt_unlock(&path("Diary.md"), &"p1".into()));
        assert!(!manager.should_obscure(&path("Diary.md")));
    }

    #[tokio::test]
    async fn test_folder_auto_lock_scenario() {
        let mut manager = manager(Arc::new(MemoryStore::new())).await;
        manager
            .lock_item(path("Secrets"), ItemKind::Folder, &"x".into())
            .await
            .unwrap();

        manager.sync_open_editors(open_set(&["Secrets/note.md", "Secrets/other.md"]));
        assert!(manager.should_obscure(&path("Secrets/note.md")));
        assert!(manager.attempt_unlock(&path("Secrets/note.md"), &"x".into()));
        assert!(!manager.should_obscure(&path("Secrets/other.md")));

        // note.md closes; the folder stays open through other.md.
        assert!(!manager.sync_open_editors(open_set(&["Secrets/other.md"])));
        assert!(!manager.should_obscure(&path("Secrets/note.md")));

        // other.md closes too; the next pass relocks the folder.
        assert!(manager.sync_open_editors(open_set(&[])));
        assert!(manager.should_obscure(&path("Secrets/note.md")));
    }

    #[tokio::test]
    async fn test_blur_intensity_clamped_and_persisted() {
        let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::new());

        let mut manager = manager(store.clone()).await;
        manager.set_blur_intensity(200).await.unwrap();
        assert_eq!(manager.blur_intensity(), 20);

        let reloaded = LockManager::load(store, Arc::new(Blake2Digest)).await.unwrap();
        assert_eq!(reloaded.blur_intensity(), 20);
    }

    #[tokio::test]
    async fn test_auto_lock_toggle_reaches_engine() {
        let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::new());

        let mut manager = manager(store.clone()).await;
        manager
            .lock_item(path("Secrets"), ItemKind::Folder, &"x".into())
            .await
            .unwrap();
        manager.set_auto_lock_on_close(false).await.unwrap();

        manager.sync_open_editors(open_set(&["Secrets/a.md"]));
        assert!(manager.attempt_unlock(&path("Secrets/a.md"), &"x".into()));
        assert!(!manager.sync_open_editors(open_set(&[])));
        assert!(!manager.should_obscure(&path("Secrets/a.md")));

        let reloaded = LockManager::load(store, Arc::new(Blake2Digest)).await.unwrap();
        assert!(!reloaded.auto_lock_on_close());
    }

    #[tokio::test]
    async fn test_persisted_document_shape() {
        let store = Arc::new(MemoryStore::new());

        let mut manager = LockManager::load(store.clone(), Arc::new(RollingDigest))
            .await
            .unwrap();
        manager
            .lock_item(path("Diary.md"), ItemKind::File, &"p1".into())
            .await
            .unwrap();

        let bytes = store.load().await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["lockedItems"]["Diary.md"]["type"], "file");
        assert_eq!(value["lockedItems"]["Diary.md"]["hashedPassword"], "2pt");
        assert_eq!(value["autoLockOnClose"], true);
    }

    #[tokio::test]
    async fn test_explicit_relock_and_clear() {
        let mut manager = manager(Arc::new(MemoryStore::new())).await;
        manager
            .lock_item(path("Diary.md"), ItemKind::File, &"p1".into())
            .await
            .unwrap();

        assert!(manager.attempt_unlock(&path("Diary.md"), &"p1".into()));
        assert!(manager.relock(&path("Diary.md")));
        assert!(manager.should_obscure(&path("Diary.md")));

        assert!(manager.attempt_unlock(&path("Diary.md"), &"p1".into()));
        manager.clear_session();
        assert!(manager.should_obscure(&path("Diary.md")));
    }
}
