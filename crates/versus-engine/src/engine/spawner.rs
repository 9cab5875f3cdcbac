use std::{
    fmt::{self, Write as _},
    num::ParseIntError,
    str::FromStr,
};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ShapeKind;

/// Seed for a whole duel.
///
/// A 128-bit value from which each player's shape stream (and optionally the
/// AI's jitter) is derived, so the same seed replays the same sequence of
/// random spawns. Serialized as a 32-character hex string.
///
/// ```
/// use versus_engine::DuelSeed;
/// use rand::Rng as _;
///
/// let seed: DuelSeed = rand::rng().random();
/// let json = serde_json::to_string(&seed).unwrap();
/// assert_eq!(json.len(), 34);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuelSeed([u8; 16]);

impl DuelSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    /// Derives an independent stream seed for the given salt.
    #[must_use]
    pub fn derive(self, salt: u8) -> [u8; 16] {
        let mut bytes = self.0;
        bytes[15] ^= salt;
        bytes[0] ^= salt.rotate_left(4);
        bytes
    }
}

impl fmt::Debug for DuelSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DuelSeed({self})")
    }
}

impl fmt::Display for DuelSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for DuelSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid seed: expected 32 hex characters, got {len}")]
    Length { len: usize },
    #[display("invalid seed: {_0}")]
    Digit(ParseIntError),
}

impl FromStr for DuelSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::Length { len: s.len() });
        }
        let num = u128::from_str_radix(s, 16).map_err(ParseSeedError::Digit)?;
        Ok(Self::from_u128(num))
    }
}

impl<'de> Deserialize<'de> for DuelSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<DuelSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DuelSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        DuelSeed(seed)
    }
}

/// Random source of shapes for one board.
#[derive(Debug, Clone)]
pub struct ShapeSpawner {
    rng: Pcg32,
}

impl ShapeSpawner {
    #[must_use]
    pub fn with_seed(seed: [u8; 16]) -> Self {
        Self {
            rng: Pcg32::from_seed(seed),
        }
    }

    /// Draws one of the seven regular shapes uniformly.
    pub fn next_regular(&mut self) -> ShapeKind {
        self.rng.random()
    }

    /// Draws a gift shape (`I` or `O`) uniformly.
    pub fn next_easy(&mut self) -> ShapeKind {
        ShapeKind::EASY[self.rng.random_range(0..ShapeKind::EASY.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_known_value() {
        let seed = DuelSeed::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, "\"0123456789abcdef0123456789abcdef\"");
        let back: DuelSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seed);
    }

    #[test]
    fn test_seed_rejects_bad_hex() {
        assert!(serde_json::from_str::<DuelSeed>("\"1234\"").is_err());
        assert!(serde_json::from_str::<DuelSeed>("\"zz000000000000000000000000000000\"").is_err());
    }

    #[test]
    fn test_seed_from_str() {
        let seed: DuelSeed = "000000000000000000000000000000FF".parse().unwrap();
        assert_eq!(seed, DuelSeed::from_u128(0xff));
        assert!(matches!(
            "abc".parse::<DuelSeed>(),
            Err(ParseSeedError::Length { len: 3 })
        ));
        assert!(matches!(
            "zz000000000000000000000000000000".parse::<DuelSeed>(),
            Err(ParseSeedError::Digit(_))
        ));
    }

    #[test]
    fn test_seed_from_bytes_is_big_endian() {
        let mut bytes = [0; 16];
        bytes[15] = 0xff;
        assert_eq!(DuelSeed::from_bytes(bytes), DuelSeed::from_u128(0xff));
        let seed = DuelSeed::from_bytes([0xab; 16]);
        assert_eq!(seed.to_string(), "ab".repeat(16));
    }

    #[test]
    fn test_derived_streams_differ() {
        let seed = DuelSeed::from_u128(42);
        assert_ne!(seed.derive(0), seed.derive(1));
        assert_eq!(seed.derive(0), seed.derive(0));
    }

    #[test]
    fn test_same_seed_same_shapes() {
        let seed = DuelSeed::from_u128(7).derive(0);
        let mut a = ShapeSpawner::with_seed(seed);
        let mut b = ShapeSpawner::with_seed(seed);
        for _ in 0..50 {
            assert_eq!(a.next_regular(), b.next_regular());
        }
    }

    #[test]
    fn test_easy_shapes() {
        let mut spawner = ShapeSpawner::with_seed([3; 16]);
        let drawn: Vec<_> = (0..200).map(|_| spawner.next_easy()).collect();
        assert!(drawn.iter().all(|k| ShapeKind::EASY.contains(k)));
        assert!(drawn.contains(&ShapeKind::I));
        assert!(drawn.contains(&ShapeKind::O));
    }
}
