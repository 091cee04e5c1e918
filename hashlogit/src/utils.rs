use std::hash::Hasher;

// Copied from https://prng.di.unimi.it/splitmix64.c
#[derive(Default)]
pub struct SplitMix64 {
    x: u64,
}

impl SplitMix64 {
    #[inline(always)]
    fn add(&mut self, i: u64) {
        self.x ^= i;
        self.x = self.x.wrapping_add(0x9e3779b97f4a7c15);
        self.x = (self.x ^ (self.x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        self.x = (self.x ^ (self.x >> 27)).wrapping_mul(0x94d049bb133111eb);
        self.x = self.x ^ (self.x >> 31);
    }
}

impl Hasher for SplitMix64 {
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.x
    }

    #[inline(always)]
    fn write(&mut self, bytes: &[u8]) {
        for &i in bytes {
            self.add(u64::from(i));
        }
    }

    #[inline(always)]
    fn write_u8(&mut self, i: u8) {
        self.add(u64::from(i));
    }
}

/// Hashes raw bytes with a fixed seed, so the result does not depend on the process or platform.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = SplitMix64::default();
    hasher.write(bytes);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes_empty() {
        assert_eq!(0, hash_bytes(b""));
    }

    #[test]
    fn test_hash_bytes_deterministic() {
        assert_eq!(hash_bytes(b"cat"), hash_bytes(b"cat"));
        assert_ne!(hash_bytes(b"cat"), hash_bytes(b"dog"));
        assert_ne!(hash_bytes(b"ab"), hash_bytes(b"ba"));
    }
}
