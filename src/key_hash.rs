//! Key hashing: the injectable hash seam and the built-in strategies.
//!
//! The map never hashes through `K: Hash`; every lookup asks its
//! [`KeyHasher`] for a `u64` and reduces it modulo the current capacity.
//! Feeding raw bytes (or chars, for DJB2) keeps results independent of
//! `str`'s `Hash` impl, which appends a terminator byte.

use crate::error::MapError;
use core::fmt;
use core::hash::{BuildHasher, Hasher};
use core::str::FromStr;
use std::collections::hash_map::DefaultHasher;

/// Maps a string key to a 64-bit hash. Must be deterministic for the
/// lifetime of the map that owns it.
pub trait KeyHasher {
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// SipHash with the standard library's fixed zero keys.
///
/// Deterministic within a toolchain only: std reserves the right to change
/// `DefaultHasher`'s algorithm between releases. Use [`Djb2`] when hashes
/// must stay stable across builds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DefaultKeyHasher;

impl KeyHasher for DefaultKeyHasher {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        let mut h = DefaultHasher::new();
        h.write(key.as_bytes());
        h.finish()
    }
}

/// DJB2: seed 5381, then `h = h * 33 + c` for each char, wrapping on overflow.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Djb2;

impl Djb2 {
    pub const SEED: u64 = 5381;
}

impl KeyHasher for Djb2 {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        key.chars().fold(Self::SEED, |h, c| {
            // (h << 5) + h == h * 33
            (h << 5).wrapping_add(h).wrapping_add(u64::from(c))
        })
    }
}

/// Adapts any std [`BuildHasher`] (e.g. `RandomState`) into a [`KeyHasher`].
///
/// Feeds the key's UTF-8 bytes to a fresh hasher rather than calling
/// `hash_one`, so no `str` terminator byte is mixed in.
#[derive(Clone, Debug, Default)]
pub struct FromBuildHasher<S>(pub S);

impl<S: BuildHasher> KeyHasher for FromBuildHasher<S> {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        let mut h = self.0.build_hasher();
        h.write(key.as_bytes());
        h.finish()
    }
}

/// Configuration-level selector between the built-in hashers.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum HashStrategy {
    #[default]
    Default,
    Djb2,
}

impl KeyHasher for HashStrategy {
    #[inline]
    fn hash_key(&self, key: &str) -> u64 {
        match self {
            HashStrategy::Default => DefaultKeyHasher.hash_key(key),
            HashStrategy::Djb2 => Djb2.hash_key(key),
        }
    }
}

impl fmt::Display for HashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HashStrategy::Default => "default",
            HashStrategy::Djb2 => "djb2",
        })
    }
}

impl FromStr for HashStrategy {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(HashStrategy::Default),
            "djb2" => Ok(HashStrategy::Djb2),
            _ => Err(MapError::UnknownHashStrategy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::RandomState;

    /// Invariant: DJB2 starts from the seed and folds `h * 33 + c` per char.
    #[test]
    fn djb2_known_values() {
        assert_eq!(Djb2.hash_key(""), 5381);
        assert_eq!(Djb2.hash_key("a"), 5381 * 33 + 97);
        assert_eq!(Djb2.hash_key("ab"), (5381 * 33 + 97) * 33 + 98);
    }

    /// Invariant: DJB2 hashes Unicode scalar values, not UTF-8 bytes.
    #[test]
    fn djb2_uses_char_codes() {
        assert_eq!(Djb2.hash_key("é"), 5381 * 33 + 0xE9);
    }

    /// Invariant: long keys wrap instead of overflowing.
    #[test]
    fn djb2_wraps_on_long_keys() {
        let key = "z".repeat(4096);
        let expected = key
            .chars()
            .fold(5381u64, |h, c| h.wrapping_mul(33).wrapping_add(c as u64));
        assert_eq!(Djb2.hash_key(&key), expected);
    }

    /// Invariant: the default hasher is deterministic across instances.
    #[test]
    fn default_hasher_is_reproducible() {
        let a = DefaultKeyHasher.hash_key("line_1");
        let b = DefaultKeyHasher.hash_key("line_1");
        assert_eq!(a, b);
        assert_eq!(HashStrategy::Default.hash_key("line_1"), a);
        assert_ne!(a, DefaultKeyHasher.hash_key("line_2"));
    }

    /// Invariant: the adapter hashes raw key bytes, without the terminator
    /// byte `str`'s `Hash` impl appends.
    #[test]
    fn build_hasher_adapter_skips_str_terminator() {
        #[derive(Clone, Default)]
        struct SipBuildHasher;
        impl BuildHasher for SipBuildHasher {
            type Hasher = DefaultHasher;
            fn build_hasher(&self) -> Self::Hasher {
                DefaultHasher::new()
            }
        }
        let adapted = FromBuildHasher(SipBuildHasher).hash_key("line_1");
        assert_eq!(adapted, DefaultKeyHasher.hash_key("line_1"));
        assert_ne!(adapted, SipBuildHasher.hash_one("line_1"));
    }

    /// Invariant: a single `BuildHasher` instance hashes a key consistently.
    #[test]
    fn build_hasher_adapter_is_stable_per_instance() {
        let h = FromBuildHasher(RandomState::new());
        assert_eq!(h.hash_key("k"), h.hash_key("k"));
    }

    #[test]
    fn closures_are_key_hashers() {
        let by_len = |k: &str| k.len() as u64;
        assert_eq!(by_len.hash_key("abc"), 3);
    }

    /// Invariant: strategy names round-trip through Display/FromStr; unknown
    /// names are rejected with the offending input.
    #[test]
    fn strategy_parse_and_display() {
        for s in [HashStrategy::Default, HashStrategy::Djb2] {
            assert_eq!(s.to_string().parse::<HashStrategy>().unwrap(), s);
        }
        assert_eq!(" DJB2 ".parse::<HashStrategy>().unwrap(), HashStrategy::Djb2);
        match "fnv".parse::<HashStrategy>() {
            Err(MapError::UnknownHashStrategy(name)) => assert_eq!(name, "fnv"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
