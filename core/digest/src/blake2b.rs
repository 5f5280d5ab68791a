//! Blake2b digest scheme.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::digest::Digest;

/// Default digest scheme: Blake2b-256 over the UTF-8 passphrase bytes,
/// base64-encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake2Digest;

impl Digest for Blake2Digest {
    fn name(&self) -> &str {
        "blake2"
    }

    fn digest(&self, plaintext: &str) -> String {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest as _};

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(plaintext.as_bytes());

        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}
