//! Streaming entropy pools and the bank that holds them.
//!
//! Each pool is a SHA-256 instance that absorbs entropy submissions as they
//! arrive and is only ever finalized when a reseed draws from it; finalizing
//! resets the pool in place, so a drained pool is indistinguishable from a
//! fresh one. The bank keeps the pools in an append-only sequence alongside
//! a per-pool counter of estimated entropy bits received since the last
//! drain.

use sha2::{Digest, Sha256};

// ---------------------------------------------------------------------------
// HashPool
// ---------------------------------------------------------------------------

/// One streaming SHA-256 entropy accumulator.
#[derive(Clone)]
pub struct HashPool {
    hasher: Sha256,
}

impl HashPool {
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Absorb 32-bit words, big-endian byte order.
    pub fn update_words(&mut self, words: &[u32]) {
        for w in words {
            self.hasher.update(w.to_be_bytes());
        }
    }

    /// Absorb raw bytes.
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Finalize into eight 32-bit words and reset the accumulator.
    pub fn drain(&mut self) -> [u32; 8] {
        let digest = self.hasher.finalize_reset();
        let mut words = [0u32; 8];
        for (w, chunk) in words.iter_mut().zip(digest.chunks_exact(4)) {
            *w = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }
}

impl Default for HashPool {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// PoolBank
// ---------------------------------------------------------------------------

/// Append-only sequence of entropy pools with per-pool bit accounting.
pub struct PoolBank {
    pools: Vec<HashPool>,
    bits: Vec<u64>,
}

impl PoolBank {
    /// A bank starts with a single empty pool.
    pub fn new() -> Self {
        Self {
            pools: vec![HashPool::new()],
            bits: vec![0],
        }
    }

    /// Number of pools. Always at least 1.
    pub fn count(&self) -> usize {
        self.pools.len()
    }

    /// Entropy bits currently credited to one pool.
    pub fn bits(&self, pool: usize) -> u64 {
        self.bits.get(pool).copied().unwrap_or(0)
    }

    /// Bits currently resident across all pools.
    pub fn total_bits(&self) -> u64 {
        self.bits.iter().sum()
    }

    /// Mutable access to one pool for feeding a submission.
    pub fn pool_mut(&mut self, pool: usize) -> &mut HashPool {
        &mut self.pools[pool]
    }

    /// Credit estimated entropy bits to one pool.
    pub fn credit(&mut self, pool: usize, bits: u64) {
        self.bits[pool] += bits;
    }

    /// Finalize one pool (resetting it) and zero its bit counter.
    /// Returns the digest and the bits that were credited.
    pub fn drain(&mut self, pool: usize) -> ([u32; 8], u64) {
        let digest = self.pools[pool].drain();
        let bits = std::mem::take(&mut self.bits[pool]);
        (digest, bits)
    }

    /// Append a fresh empty pool.
    pub fn grow(&mut self) {
        self.pools.push(HashPool::new());
        self.bits.push(0);
    }
}

impl Default for PoolBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_drain_resets() {
        let mut pool = HashPool::new();
        pool.update_words(&[1, 2, 3]);
        let first = pool.drain();

        // After draining, the pool behaves like a fresh instance.
        let mut fresh = HashPool::new();
        pool.update_words(&[4]);
        fresh.update_words(&[4]);
        assert_eq!(pool.drain(), fresh.drain());
        assert_ne!(first, fresh.drain());
    }

    #[test]
    fn pool_words_and_bytes_agree() {
        // update_words feeds big-endian bytes
        let mut a = HashPool::new();
        let mut b = HashPool::new();
        a.update_words(&[0x0102_0304]);
        b.update_bytes(&[1, 2, 3, 4]);
        assert_eq!(a.drain(), b.drain());
    }

    #[test]
    fn pool_drain_is_deterministic() {
        let mut a = HashPool::new();
        let mut b = HashPool::new();
        a.update_words(&[7, 8, 9]);
        b.update_words(&[7, 8, 9]);
        assert_eq!(a.drain(), b.drain());
    }

    #[test]
    fn bank_starts_with_one_pool() {
        let bank = PoolBank::new();
        assert_eq!(bank.count(), 1);
        assert_eq!(bank.bits(0), 0);
        assert_eq!(bank.total_bits(), 0);
    }

    #[test]
    fn bank_credit_and_drain_accounting() {
        let mut bank = PoolBank::new();
        bank.grow();
        bank.credit(0, 10);
        bank.credit(1, 32);
        assert_eq!(bank.total_bits(), 42);

        let (_, taken) = bank.drain(1);
        assert_eq!(taken, 32);
        assert_eq!(bank.bits(1), 0);
        assert_eq!(bank.total_bits(), 10);
    }

    #[test]
    fn bank_bits_out_of_range_is_zero() {
        let bank = PoolBank::new();
        assert_eq!(bank.bits(5), 0);
    }

    #[test]
    fn bank_grows_monotonically() {
        let mut bank = PoolBank::new();
        for expected in 2..=6 {
            bank.grow();
            assert_eq!(bank.count(), expected);
        }
    }
}
