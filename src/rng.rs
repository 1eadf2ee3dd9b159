use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Seeds are kept non-negative and representable in 63 bits so they survive
/// any integer encoding a caller throws at them (JSON numbers, query strings).
pub const SEED_MASK: u64 = (1 << 63) - 1;

/// A seed-like value: either a number or free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedInput {
    Int(i64),
    Text(String),
}

impl From<i64> for SeedInput {
    fn from(n: i64) -> Self {
        SeedInput::Int(n)
    }
}

impl From<u64> for SeedInput {
    fn from(n: u64) -> Self {
        SeedInput::Int((n & SEED_MASK) as i64)
    }
}

impl From<&str> for SeedInput {
    fn from(s: &str) -> Self {
        SeedInput::Text(s.to_string())
    }
}

impl From<String> for SeedInput {
    fn from(s: String) -> Self {
        SeedInput::Text(s)
    }
}

/// Derive a canonical 63-bit seed from any seed-like input.
///
/// Integers use their absolute value masked to 63 bits, so `-42` and `42`
/// derive identically. Strings are hashed with SHA-256 and the first 8 bytes
/// read as a big-endian u64 before masking; this keeps string seeds stable
/// across platforms and runs, unlike process-randomized hashing.
pub fn derive_seed(input: &SeedInput) -> u64 {
    match input {
        SeedInput::Int(n) => n.unsigned_abs() & SEED_MASK,
        SeedInput::Text(s) => derive_seed_from_bytes(s.as_bytes()),
    }
}

/// Derive a seed directly from raw bytes. Callers holding possibly-invalid
/// UTF-8 should lossy-convert first; the digest works on whatever remains.
pub fn derive_seed_from_bytes(bytes: &[u8]) -> u64 {
    let digest = Sha256::digest(bytes);
    let mut first = [0u8; 8];
    first.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(first) & SEED_MASK
}

/// Generate a fresh high-entropy 63-bit seed from the OS-backed generator.
pub fn generate_seed() -> u64 {
    rand::thread_rng().gen::<u64>() & SEED_MASK
}

/// Seeded random stream for reproducible builds.
///
/// Every call to `new` returns an owned, independent generator; there is no
/// shared or global RNG anywhere, so concurrent builds against the same seed
/// cannot interfere with each other.
#[derive(Clone)]
pub struct BuildRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl BuildRng {
    /// Create a new BuildRng with an optional seed.
    /// If seed is None, generates a random seed.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(generate_seed) & SEED_MASK;
        let rng = ChaCha8Rng::seed_from_u64(seed);
        BuildRng { rng, seed }
    }

    /// Get the seed used for this stream
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random number in range [0, 1)
    pub fn random(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Generate a random integer in range [0, max)
    pub fn random_range(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..max)
    }

    /// Pick one element of a slice, or None if it is empty
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.random_range(items.len())])
        }
    }

    /// Fisher-Yates shuffle for a mutable slice
    pub fn shuffle<T>(&mut self, array: &mut [T]) {
        for i in (1..array.len()).rev() {
            let j = self.random_range(i + 1);
            array.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_repeatable() {
        for s in ["", "a", "Tokens", "some longer seed phrase"] {
            let input = SeedInput::from(s);
            assert_eq!(derive_seed(&input), derive_seed(&input));
            assert!(derive_seed(&input) <= SEED_MASK);
        }
    }

    #[test]
    fn test_derive_negative_matches_positive() {
        for n in [0i64, 1, 42, 999_999, i64::MAX, i64::MIN] {
            let pos = derive_seed(&SeedInput::Int(n));
            let neg = derive_seed(&SeedInput::Int(n.wrapping_neg()));
            assert_eq!(pos, neg, "derive({}) should match derive({})", n, -n);
            assert!(pos <= SEED_MASK);
        }
    }

    #[test]
    fn test_derive_string_anchor() {
        // Pinned so a platform or dependency change cannot silently shift
        // every permalink ever issued.
        let seed = derive_seed(&SeedInput::from("test-seed"));
        assert_eq!(seed, 6214070892065607348);
    }

    #[test]
    fn test_same_seed_produces_same_sequence() {
        let mut rng1 = BuildRng::new(Some(12345));
        let mut rng2 = BuildRng::new(Some(12345));

        for _ in 0..100 {
            let v1 = rng1.random();
            let v2 = rng2.random();
            assert_eq!(v1, v2, "Same seed should produce same random sequence");
        }
    }

    #[test]
    fn test_different_seeds_produce_different_sequences() {
        let mut rng1 = BuildRng::new(Some(12345));
        let mut rng2 = BuildRng::new(Some(54321));

        let mut same_count = 0;
        for _ in 0..100 {
            if (rng1.random() - rng2.random()).abs() < 1e-10 {
                same_count += 1;
            }
        }
        assert!(same_count < 5, "Different seeds should produce different sequences");
    }

    #[test]
    fn test_unseeded_streams_are_uncorrelated() {
        let mut rng1 = BuildRng::new(None);
        let mut rng2 = BuildRng::new(None);
        assert_ne!(rng1.seed(), rng2.seed());

        let mut same_count = 0;
        for _ in 0..100 {
            if (rng1.random() - rng2.random()).abs() < 1e-10 {
                same_count += 1;
            }
        }
        assert!(same_count < 5);
    }

    #[test]
    fn test_shuffle_reproducibility() {
        let mut arr1 = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut arr2 = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        let mut rng1 = BuildRng::new(Some(42));
        let mut rng2 = BuildRng::new(Some(42));

        rng1.shuffle(&mut arr1);
        rng2.shuffle(&mut arr2);

        assert_eq!(arr1, arr2, "Same seed should produce same shuffle");
    }

    #[test]
    fn test_generated_seed_fits_63_bits() {
        for _ in 0..100 {
            assert!(generate_seed() <= SEED_MASK);
        }
    }

    #[test]
    fn test_choose_empty_and_range() {
        let mut rng = BuildRng::new(Some(123));
        let empty: [u32; 0] = [];
        assert!(rng.choose(&empty).is_none());
        for _ in 0..1000 {
            let val = rng.random_range(10);
            assert!(val < 10, "random_range should be in [0, max)");
        }
    }
}
