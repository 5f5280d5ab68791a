//! Lock policy engine for NoteVeil.
//!
//! This module provides:
//! - The lock registry: durable path-to-record mapping with hierarchical
//!   folder coverage
//! - The session policy engine: transient unlock grants and the
//!   auto-relock-on-close rules
//! - The persisted settings document and the [`LockManager`] facade
//!
//! # Architecture
//! The policy module sits between the UI layer and the settings store. UI
//! layers ask [`LockManager::should_obscure`] before rendering any file and
//! feed unlock attempts and editor lifecycle events back in; every durable
//! mutation is written through to the store after in-memory state changes.

pub mod manager;
pub mod registry;
pub mod session;
pub mod settings;

pub use manager::LockManager;
pub use registry::{CoveringLock, ItemKind, LockRecord, LockRegistry};
pub use session::SessionPolicy;
pub use settings::Settings;
