//! Benchmark inputs for poolscope.
//!
//! - [`seeded_values`]: deterministic `u32` input of any length
//! - [`bench_pool`]: a [`SharedPool`] sized for the benchmark lengths
//! - [`LENGTHS`]: the lease sizes every group is measured at

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use poolscope::{SharedPool, SharedPoolConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lease sizes: a small scratch buffer, a page-sized one, and a large one.
pub const LENGTHS: [usize; 3] = [64, 4_096, 65_536];

/// `len` pseudo-random values drawn from a ChaCha8 stream seeded with `seed`.
pub fn seeded_values(len: usize, seed: u64) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.random()).collect()
}

/// Shared pool whose largest bucket covers every entry of [`LENGTHS`].
pub fn bench_pool() -> SharedPool<u32> {
    let config = SharedPoolConfig::new()
        .with_min_capacity(64)
        .with_max_capacity(LENGTHS[LENGTHS.len() - 1].next_power_of_two());
    match SharedPool::new(config) {
        Ok(pool) => pool,
        Err(e) => panic!("benchmark pool config rejected: {e}"),
    }
}
