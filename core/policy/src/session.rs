//! Session policy engine.
//!
//! Tracks which protected paths are viewable for the running session and
//! applies the grant/revoke rules across the path hierarchy and across
//! editor open/close events. State is transient: nothing here is ever
//! persisted, and a restart begins with every lock re-engaged.

use std::collections::HashSet;
use tracing::debug;

use noteveil_common::{NotePath, Passphrase};

use crate::registry::{ItemKind, LockRegistry};

/// Transient per-session lock policy state.
///
/// Holds the session unlock set, the set of paths currently shown in editor
/// surfaces, and the most recently focused path. The registry is passed
/// into each operation, so the engine can be constructed bare and tested
/// without any host.
///
/// All operations are synchronous and run to completion; embedders on
/// multi-threaded hosts must serialize calls behind a single exclusive
/// section, since mutations span multiple steps.
pub struct SessionPolicy {
    /// Paths granted session access. Keys are owning lock keys: a folder
    /// path here covers its whole subtree.
    unlocked: HashSet<NotePath>,
    /// Paths currently displayed in an editor surface.
    open: HashSet<NotePath>,
    /// Most recently focused editor path.
    last_active: Option<NotePath>,
    /// Revoke grants automatically when tabs close or switch away.
    auto_relock: bool,
}

impl SessionPolicy {
    /// Create a fresh session with no grants and auto-relock enabled.
    pub fn new() -> Self {
        Self {
            unlocked: HashSet::new(),
            open: HashSet::new(),
            last_active: None,
            auto_relock: true,
        }
    }

    /// Whether closed tabs revoke their session grants.
    pub fn auto_relock(&self) -> bool {
        self.auto_relock
    }

    /// Enable or disable automatic revocation on close/switch.
    pub fn set_auto_relock(&mut self, enabled: bool) {
        self.auto_relock = enabled;
    }

    /// Check whether `path` holds a session grant, directly or through an
    /// unlocked ancestor folder.
    pub fn is_session_unlocked(&self, path: &NotePath) -> bool {
        self.unlocked.contains(path)
            || path.ancestors().any(|ancestor| self.unlocked.contains(&ancestor))
    }

    /// The single predicate UI layers call before rendering content:
    /// locked and not session-unlocked.
    pub fn should_obscure(&self, registry: &LockRegistry, path: &NotePath) -> bool {
        registry.is_locked(path) && !self.is_session_unlocked(path)
    }

    /// Try to unlock `path` for the session.
    ///
    /// Returns false with no state change when no record covers `path`
    /// (caller error: the path is not actually locked) or when the
    /// passphrase does not match. On success the *owning key* is granted:
    /// unlocking a file inside a locked folder unlocks that folder's whole
    /// subtree for the session.
    pub fn attempt_unlock(
        &mut self,
        registry: &LockRegistry,
        path: &NotePath,
        passphrase: &Passphrase,
    ) -> bool {
        let Some(covering) = registry.covering(path) else {
            debug!(path = %path, "Unlock attempt on a path no record covers");
            return false;
        };

        if !registry
            .digest()
            .verify(passphrase.as_str(), &covering.record.hashed_password)
        {
            debug!(path = %path, "Unlock attempt rejected");
            return false;
        }

        debug!(path = %path, key = %covering.key, "Session grant added");
        self.unlocked.insert(covering.key.clone());
        true
    }

    /// Revoke the session grants tied to `path`.
    ///
    /// Used for explicit re-lock and for auto-lock on close. Two grants are
    /// in scope: the entry at `path` itself, and the grant of the nearest
    /// locked folder ancestor (the owning key when `path` sits inside a
    /// locked folder). Either survives while some open path other than
    /// `path` still lives under it; revoking a folder still displayed
    /// through a sibling tab would blank content the user is looking at.
    ///
    /// Idempotent; returns whether any grant was revoked.
    pub fn relock(&mut self, registry: &LockRegistry, path: &NotePath) -> bool {
        let mut revoked = false;

        let keep_own = registry
            .record_at(path)
            .is_some_and(|record| record.kind == ItemKind::Folder)
            && self.has_open_descendant(path, path);
        if !keep_own {
            revoked |= self.unlocked.remove(path);
        }

        if let Some(folder) = registry.locked_folder_ancestor(path) {
            if !self.has_open_descendant(folder.key, path) {
                revoked |= self.unlocked.remove(folder.key);
            }
        }

        if revoked {
            debug!(path = %path, "Session grant revoked");
        }
        revoked
    }

    /// Drop any grant keyed by exactly `path`.
    ///
    /// Called when a lock record is removed, so a deleted lock cannot leave
    /// a stale grant behind.
    pub fn evict(&mut self, path: &NotePath) {
        self.unlocked.remove(path);
    }

    /// Handle an editor focus change.
    ///
    /// If auto-relock is on and the previously focused path is locked and
    /// no open surface still shows it, its grants are revoked. The new
    /// path becomes last-active and is recorded as open.
    ///
    /// Returns whether any grant was revoked.
    pub fn focus_changed(&mut self, registry: &LockRegistry, new_active: Option<&NotePath>) -> bool {
        let mut revoked = false;

        if let Some(previous) = self.last_active.clone() {
            let moved_away = new_active != Some(&previous);
            if self.auto_relock
                && moved_away
                && registry.is_locked(&previous)
                && !self.open.contains(&previous)
            {
                revoked = self.relock(registry, &previous);
            }
        }

        self.last_active = new_active.cloned();
        if let Some(path) = new_active {
            self.open.insert(path.clone());
        }
        revoked
    }

    /// Reconcile against a fresh snapshot of open editor paths.
    ///
    /// Catches tab closures not observable through focus changes alone;
    /// hosts without precise close events call this periodically. Every
    /// locked path that dropped out of the snapshot is relocked when
    /// auto-relock is on.
    ///
    /// Returns whether any grant was revoked.
    pub fn editor_set_changed(
        &mut self,
        registry: &LockRegistry,
        currently_open: HashSet<NotePath>,
    ) -> bool {
        let closed: Vec<NotePath> = self.open.difference(&currently_open).cloned().collect();

        // Swap the snapshot in first: when several tabs under one folder
        // close at once, none of them may keep the folder grant alive.
        self.open = currently_open;

        let mut revoked = false;
        if self.auto_relock {
            for path in &closed {
                if registry.is_locked(path) {
                    revoked |= self.relock(registry, path);
                }
            }
        }
        revoked
    }

    /// Drop every session grant. Open-path tracking is unaffected.
    pub fn clear(&mut self) {
        self.unlocked.clear();
    }

    /// Check whether `path` is currently shown in an editor surface.
    pub fn is_open(&self, path: &NotePath) -> bool {
        self.open.contains(path)
    }

    /// Get the most recently focused path.
    pub fn last_active(&self) -> Option<&NotePath> {
        self.last_active.as_ref()
    }

    fn has_open_descendant(&self, folder: &NotePath, closing: &NotePath) -> bool {
        self.open
            .iter()
            .any(|open| open != closing && folder.is_ancestor_of(open))
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::new()
    }
}
