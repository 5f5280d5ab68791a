//! The digest scheme trait.

use subtle::ConstantTimeEq;

/// A one-way digest over plaintext passphrases.
///
/// Schemes must be deterministic: the same plaintext always produces the
/// same digest string. Only digests are ever persisted; the plaintext never
/// leaves the caller.
///
/// None of the provided schemes are key-stretching password hashes. The
/// lock/blur layer obscures content from casual viewing and its digests
/// should not be treated as protection against a determined local attacker.
pub trait Digest: Send + Sync {
    /// Get the scheme name (e.g. "blake2", "rolling").
    fn name(&self) -> &str;

    /// Compute the digest of a plaintext passphrase.
    fn digest(&self, plaintext: &str) -> String;

    /// Compare a plaintext against a stored digest.
    ///
    /// The comparison is constant-time in the digest strings.
    fn verify(&self, plaintext: &str, expected: &str) -> bool {
        let computed = self.digest(plaintext);
        computed.as_bytes().ct_eq(expected.as_bytes()).into()
    }
}
