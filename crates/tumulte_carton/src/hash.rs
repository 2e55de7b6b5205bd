//! Content fingerprints using xxHash3.
//!
//! Generated files (declaration documents, expression scopes) are only
//! written back into the virtual file system when their fingerprint changes,
//! so script versions move only on real edits.

use xxhash_rust::xxh3::xxh3_64;

/// A 64-bit fingerprint of some text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    #[inline]
    pub fn of(text: &str) -> Self {
        Self(xxh3_64(text.as_bytes()))
    }

    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Hex form (16 characters).
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(Fingerprint::of("<app></app>"), Fingerprint::of("<app></app>"));
        assert_ne!(Fingerprint::of("<app></app>"), Fingerprint::of("<app />"));
    }

    #[test]
    fn test_hex_format() {
        let hex = Fingerprint::of("export default {}").to_hex();
        assert_eq!(hex.len(), 16);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
