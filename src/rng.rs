//! Seedable randomness, threaded explicitly through generation and
//! movement. One master seed fans out into named streams so the
//! topology draw and the per-tick movement draws stay independent and
//! a whole run is reproducible from a single `u64`.

use std::collections::HashMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const GENERATION_STREAM: &str = "generation";
pub const MOVEMENT_STREAM: &str = "movement";

pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    /// Borrow the named stream, creating it on first use with seed
    /// material drawn from the master stream.
    pub fn stream(&mut self, name: &str) -> StreamRng<'_> {
        let entry = self.streams.entry(name.to_string()).or_insert_with(|| {
            let derived = self.master.next_u64();
            ChaCha8Rng::seed_from_u64(derived)
        });
        StreamRng { inner: entry }
    }
}

pub struct StreamRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> RngCore for StreamRng<'a> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
