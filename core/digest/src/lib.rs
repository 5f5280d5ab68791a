//! One-way passphrase digests for NoteVeil.
//!
//! This module provides:
//! - The [`Digest`] trait the lock registry validates credentials through
//! - [`Blake2Digest`], the default scheme for new vaults
//! - [`RollingDigest`], a compatibility scheme for legacy settings documents
//!
//! # Architecture
//! Digests are deterministic strings; verification compares in constant
//! time. The scheme is chosen once when constructing the lock manager, so
//! a vault's stored digests and its verifier always agree.

pub mod blake2b;
pub mod digest;
pub mod rolling;

pub use blake2b::Blake2Digest;
pub use digest::Digest;
pub use rolling::RollingDigest;
