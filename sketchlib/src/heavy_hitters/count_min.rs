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

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::HashMap;
use std::hash::Hash;

use super::DEFAULT_EPSILON;
use super::DEFAULT_PHI;
use super::HeavyHitters;
use super::check_fraction;
use crate::countmin::CountMinSketch;
use crate::error::Error;
use crate::hash::DEFAULT_SEED;

const DEFAULT_DELTA: f64 = 0.01;

/// Heavy hitters over a Count-Min table, for the cash-register model.
///
/// Every insertion re-estimates the token and, if the estimate reaches the
/// cutoff `phi * l1_norm`, records `(estimate, token)` on a min-heap. Entries
/// whose recorded estimate falls below the growing cutoff are popped from the
/// top. The heap may hold stale or duplicate entries for a token; queries
/// re-read the live estimate of every surviving token.
///
/// # Examples
///
/// ```
/// # use sketchlib::heavy_hitters::CountMinHeavyHitters;
/// let mut sketch = CountMinHeavyHitters::new(0.3, 0.1, 0.01, 42);
/// sketch.insert("apple", 40_000);
/// sketch.insert("banana", 10_000);
///
/// let hitters = sketch.heavy_hitters();
/// assert!(hitters["apple"] >= 40_000);
/// assert!(!hitters.contains_key("banana"));
/// ```
#[derive(Debug, Clone)]
pub struct CountMinHeavyHitters<T> {
    phi: f64,
    epsilon: f64,
    delta: f64,
    seed: u32,
    table: CountMinSketch,
    l1_norm: i64,
    candidates: BinaryHeap<Reverse<(i64, T)>>,
}

impl<T: Hash + Ord + Clone> Default for CountMinHeavyHitters<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PHI, DEFAULT_EPSILON, DEFAULT_DELTA, DEFAULT_SEED)
    }
}

impl<T: Hash + Ord + Clone> CountMinHeavyHitters<T> {
    /// Creates a new sketch reporting tokens above `phi` of the stream weight,
    /// with a Count-Min table of width `ceil(1 / (phi * epsilon))`.
    ///
    /// # Panics
    ///
    /// Panics if `phi`, `epsilon` or `delta` is not in (0, 1).
    pub fn new(phi: f64, epsilon: f64, delta: f64, seed: u32) -> Self {
        check_fraction("phi", phi);
        check_fraction("epsilon", epsilon);
        check_fraction("delta", delta);
        Self {
            phi,
            epsilon,
            delta,
            seed,
            table: CountMinSketch::with_error(phi * epsilon, delta, seed),
            l1_norm: 0,
            candidates: BinaryHeap::new(),
        }
    }

    /// Creates an empty sketch mergeable with `original`.
    pub fn from_existing(original: &Self) -> Self {
        original.clone_empty()
    }

    /// Returns the heavy hitter fraction.
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Returns the relative error.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the failure probability of the underlying table.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns the total weight inserted.
    pub fn l1_norm(&self) -> i64 {
        self.l1_norm
    }

    /// Returns the number of heap entries, stale ones included.
    pub fn num_candidates(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.l1_norm == 0
    }

    /// Returns the Count-Min estimate of the frequency of `token`.
    pub fn estimate(&self, token: &T) -> i64 {
        self.table.estimate(token)
    }

    /// Adds `count` occurrences of `token`.
    ///
    /// # Panics
    ///
    /// Panics if `count` is negative.
    pub fn insert(&mut self, token: T, count: i64) {
        if count == 0 {
            return;
        }
        assert!(count > 0, "count may not be negative");
        self.l1_norm += count;
        let cutoff = self.cutoff();
        self.table.insert(&token, count);
        let estimate = self.table.estimate(&token);
        if estimate as f64 >= cutoff {
            self.candidates.push(Reverse((estimate, token)));
        }
        self.remove_below_cutoff(cutoff);
    }

    /// Returns every surviving candidate with its current estimate.
    pub fn heavy_hitters(&self) -> HashMap<T, i64> {
        self.candidates
            .iter()
            .map(|Reverse((_, token))| (token.clone(), self.table.estimate(token)))
            .collect()
    }

    /// Merges another sketch into this one.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigMismatch`](crate::error::ErrorKind::ConfigMismatch)
    /// if the sketches differ in phi, epsilon, delta, seed or table shape.
    pub fn merge(&mut self, other: &Self) -> Result<(), Error> {
        if self.phi.to_bits() != other.phi.to_bits() {
            return Err(Error::config_mismatch("phi", self.phi, other.phi));
        }
        if self.epsilon.to_bits() != other.epsilon.to_bits() {
            return Err(Error::config_mismatch("epsilon", self.epsilon, other.epsilon));
        }
        if self.delta.to_bits() != other.delta.to_bits() {
            return Err(Error::config_mismatch("delta", self.delta, other.delta));
        }
        if self.seed != other.seed {
            return Err(Error::config_mismatch("seed", self.seed, other.seed));
        }
        self.table.merge(&other.table)?;
        self.l1_norm += other.l1_norm;
        self.candidates.extend(other.candidates.iter().cloned());
        self.remove_below_cutoff(self.cutoff());
        log::debug!(
            "merged count-min heavy hitters, l1 norm now {}, {} candidates",
            self.l1_norm,
            self.candidates.len()
        );
        Ok(())
    }

    /// Returns a sketch with the same configuration and no data.
    pub fn clone_empty(&self) -> Self {
        Self {
            phi: self.phi,
            epsilon: self.epsilon,
            delta: self.delta,
            seed: self.seed,
            table: self.table.clone_empty(),
            l1_norm: 0,
            candidates: BinaryHeap::new(),
        }
    }

    fn cutoff(&self) -> f64 {
        self.phi * self.l1_norm as f64
    }

    fn remove_below_cutoff(&mut self, cutoff: f64) {
        let before = self.candidates.len();
        while let Some(Reverse((estimate, _))) = self.candidates.peek() {
            if *estimate as f64 >= cutoff {
                break;
            }
            self.candidates.pop();
        }
        let removed = before - self.candidates.len();
        if removed > 0 {
            log::trace!("pruned {removed} heavy hitter candidates below cutoff {cutoff}");
        }
    }
}

impl<T: Hash + Ord + Clone> HeavyHitters<T> for CountMinHeavyHitters<T> {
    fn insert(&mut self, token: T, count: i64) {
        Self::insert(self, token, count)
    }

    fn heavy_hitters(&self) -> HashMap<T, i64> {
        Self::heavy_hitters(self)
    }

    fn merge(&mut self, other: &Self) -> Result<(), Error> {
        Self::merge(self, other)
    }

    fn clone_empty(&self) -> Self {
        Self::clone_empty(self)
    }
}
