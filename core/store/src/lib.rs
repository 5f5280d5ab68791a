//! Settings persistence for NoteVeil.
//!
//! This module provides:
//! - The [`SettingsStore`] trait the lock manager persists through
//! - [`MemoryStore`] for tests and development
//! - [`LocalStore`] writing a single document on the local filesystem
//!
//! # Architecture
//! Stores move opaque bytes; the policy layer owns the document schema and
//! performs write-through saves after every registry or preference change.

pub mod local;
pub mod memory;
pub mod store;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use store::SettingsStore;
