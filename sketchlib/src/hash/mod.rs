// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Seeded hashing shared by every sketch in this crate.
//!
//! All sketches hash tokens through the same contract: a deterministic
//! function of `(token, seed)` that is uniformly distributed in `[0, 1)`.
//! Column indices and ±1 signs are derived from that value, so any two
//! sketches that derive their seeds identically agree on where a token lands
//! and can be merged.
//!
//! # Usage
//!
//! ```rust
//! use sketchlib::hash::HashOracle;
//!
//! let oracle = HashOracle::new(42);
//! let h = oracle.hash("apple", 1);
//! assert!((0.0..1.0).contains(&h));
//!
//! let column = oracle.bucket("apple", 1, 128);
//! assert!(column < 128);
//! assert_eq!(column, oracle.bucket("apple", 1, 128));
//! ```

use std::hash::Hash;

mod murmurhash;

pub(crate) use self::murmurhash::murmurhash3_128;

/// Default seed base used by sketches that are not given one explicitly.
pub const DEFAULT_SEED: u32 = 42;

// 2^53: the unit value keeps the 53 most significant bits of the hash so that
// every output is exactly representable and strictly below 1.0.
const UNIT_SCALE: f64 = (1u64 << 53) as f64;

/// Hashes `token` under `seed` to a real in `[0, 1)`.
pub fn hash_unit<T: Hash + ?Sized>(token: &T, seed: u32) -> f64 {
    let (h1, _) = murmurhash3_128(token, seed);
    (h1 >> 11) as f64 / UNIT_SCALE
}

/// Maps `token` to a bucket in `[0, modulus)`.
///
/// # Panics
///
/// Panics if `modulus` is 0.
pub fn bucket<T: Hash + ?Sized>(token: &T, seed: u32, modulus: usize) -> usize {
    assert!(modulus > 0, "modulus must be positive");
    let index = (hash_unit(token, seed) * modulus as f64) as usize;
    // Float rounding can land exactly on `modulus` for very large moduli.
    index.min(modulus - 1)
}

/// Maps `token` to `-1` or `+1`.
pub fn sign<T: Hash + ?Sized>(token: &T, seed: u32) -> i64 {
    if hash_unit(token, seed) <= 0.5 { -1 } else { 1 }
}

/// Derives a family of per-row seeds from one seed base.
///
/// The seed for row `i` is `i * i * seed_base`. Oracles compare by value, so
/// two sketches configured with the same seed base always hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashOracle {
    seed_base: u32,
}

impl Default for HashOracle {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl HashOracle {
    /// Creates an oracle deriving its seeds from `seed_base`.
    pub fn new(seed_base: u32) -> Self {
        Self { seed_base }
    }

    /// Returns the seed base.
    pub fn seed_base(&self) -> u32 {
        self.seed_base
    }

    /// Returns the seed used for `index`.
    pub fn seed(&self, index: usize) -> u32 {
        let i = index as u32;
        i.wrapping_mul(i).wrapping_mul(self.seed_base)
    }

    /// Returns the first `count` seeds.
    pub fn seeds(&self, count: usize) -> Vec<u32> {
        (0..count).map(|i| self.seed(i)).collect()
    }

    /// Hashes `token` with the seed for `index`, in `[0, 1)`.
    pub fn hash<T: Hash + ?Sized>(&self, token: &T, index: usize) -> f64 {
        hash_unit(token, self.seed(index))
    }

    /// Bucket of `token` in `[0, modulus)` using the seed for `index`.
    pub fn bucket<T: Hash + ?Sized>(&self, token: &T, index: usize, modulus: usize) -> usize {
        bucket(token, self.seed(index), modulus)
    }

    /// Sign of `token` using the seed for `index`.
    pub fn sign<T: Hash + ?Sized>(&self, token: &T, index: usize) -> i64 {
        sign(token, self.seed(index))
    }
}
