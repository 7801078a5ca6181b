//! Deterministic payload generators

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Test data patterns for consistent testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestDataPattern {
    /// All zeros - highly compressible
    Zeros,
    /// Pseudo-random bytes - incompressible
    Random,
    /// Mixed compressible/incompressible data
    Mixed,
    /// English-like text
    Text,
}

/// Generate test data with specified pattern
///
/// The same `size`, `pattern` and `seed` always produce the same bytes.
pub fn generate_test_data(size: usize, pattern: TestDataPattern, seed: u64) -> Vec<u8> {
    match pattern {
        TestDataPattern::Zeros => vec![0u8; size],
        TestDataPattern::Random => random_bytes(size, seed),
        TestDataPattern::Mixed => {
            let noise = random_bytes(size, seed);
            (0..size)
                .map(|i| if i % 1000 < 300 { 0 } else { noise[i] })
                .collect()
        }
        TestDataPattern::Text => {
            const WORDS: [&str; 8] = [
                "the ", "quick ", "brown ", "fox ", "jumps ", "over ", "lazy ", "dog ",
            ];
            let picks = random_bytes(size / 3 + 1, seed);
            let mut data = Vec::with_capacity(size + 8);
            for pick in picks {
                if data.len() >= size {
                    break;
                }
                data.extend_from_slice(WORDS[usize::from(pick) % WORDS.len()].as_bytes());
            }
            data.truncate(size);
            data
        }
    }
}

fn random_bytes(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size + 8);
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);

    let mut block = 0u64;
    while data.len() < size {
        block.hash(&mut hasher);
        data.extend_from_slice(&hasher.finish().to_le_bytes());
        block += 1;
    }
    data.truncate(size);
    data
}

/// Standard payload sizes for round-trip tests
pub fn test_sizes() -> Vec<(&'static str, usize)> {
    vec![
        ("empty", 0),
        ("1B", 1),
        ("19B", 19),
        ("1KB", 1024),
        ("64KB", 64 * 1024),
        ("1MB", 1024 * 1024),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_are_deterministic() {
        for pattern in [
            TestDataPattern::Zeros,
            TestDataPattern::Random,
            TestDataPattern::Mixed,
            TestDataPattern::Text,
        ] {
            let first = generate_test_data(4099, pattern, 7);
            assert_eq!(first.len(), 4099);
            assert_eq!(first, generate_test_data(4099, pattern, 7));
        }
    }

    #[test]
    fn test_seeds_differ() {
        assert_ne!(
            generate_test_data(64, TestDataPattern::Random, 1),
            generate_test_data(64, TestDataPattern::Random, 2)
        );
    }
}
