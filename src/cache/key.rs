//! Cache key generation using SHA-256 hashes

use sha2::{Digest, Sha256};

/// A positional call argument as it participates in a cache key.
///
/// Only primitives occur: resource identifiers and locations are strings,
/// row limits are integers, and the optional variants tag presence
/// explicitly so an absent argument never collides with an empty string.
#[derive(Debug, Clone, Copy)]
pub enum KeyArg<'a> {
    Str(&'a str),
    Int(u64),
    OptStr(Option<&'a str>),
    OptInt(Option<u64>),
}

/// Generate a deterministic cache key from operation, arguments, and
/// credential fingerprint.
///
/// The key is a SHA-256 hash over the operation name, the caller's
/// credential fingerprint, and each argument in positional order. Argument
/// order is fixed by the call signature, so it is hashed as given rather
/// than sorted. Values are type-tagged and length-framed so distinct
/// argument lists cannot collide by concatenation.
pub fn cache_key(operation: &str, args: &[KeyArg<'_>], fingerprint: &str) -> String {
    let mut hasher = Sha256::new();

    hasher.update(operation.as_bytes());
    hasher.update(b"|");
    hasher.update(fingerprint.as_bytes());
    hasher.update(b"|");

    for arg in args {
        match arg {
            KeyArg::Str(s) => {
                hasher.update(b"s");
                update_framed(&mut hasher, s.as_bytes());
            }
            KeyArg::Int(n) => {
                hasher.update(b"i");
                hasher.update(n.to_le_bytes());
            }
            KeyArg::OptStr(Some(s)) => {
                hasher.update(b"S");
                update_framed(&mut hasher, s.as_bytes());
            }
            KeyArg::OptStr(None) => hasher.update(b"-"),
            KeyArg::OptInt(Some(n)) => {
                hasher.update(b"I");
                hasher.update(n.to_le_bytes());
            }
            KeyArg::OptInt(None) => hasher.update(b"_"),
        }
    }

    // Return hex-encoded hash
    format!("{:x}", hasher.finalize())
}

fn update_framed(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
