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

use std::collections::HashMap;
use std::hash::Hash;

use super::DEFAULT_EPSILON;
use super::DEFAULT_PHI;
use super::HeavyHitters;
use super::check_fraction;
use crate::error::Error;

/// Misra-Gries frequent items summary.
///
/// Keeps at most `k - 1` counters where `k = ceil(1 / (phi * epsilon))`. A
/// token without a counter either takes a free slot or, when all slots are
/// taken, is absorbed by decrementing every counter. Counters underestimate
/// true frequencies by at most `m / k`.
///
/// # Examples
///
/// ```
/// # use sketchlib::heavy_hitters::MisraGries;
/// let mut sketch = MisraGries::new(0.3, 0.01);
/// for token in ["apple", "apple", "orange", "apple"] {
///     sketch.update(token);
/// }
/// assert_eq!(sketch.k(), 334);
/// assert_eq!(sketch.estimate(&"apple"), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MisraGries<T: Hash + Eq> {
    phi: f64,
    epsilon: f64,
    k: usize,
    counters: HashMap<T, i64>,
    m: i64,
}

impl<T: Hash + Eq + Clone> Default for MisraGries<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PHI, DEFAULT_EPSILON)
    }
}

impl<T: Hash + Eq + Clone> MisraGries<T> {
    /// Creates a new summary for heavy hitter fraction `phi` and relative
    /// error `epsilon`.
    ///
    /// # Panics
    ///
    /// Panics if `phi` or `epsilon` is not in (0, 1).
    pub fn new(phi: f64, epsilon: f64) -> Self {
        check_fraction("phi", phi);
        check_fraction("epsilon", epsilon);
        let k = (1.0 / (phi * epsilon)).ceil() as usize;
        Self {
            phi,
            epsilon,
            k: k.max(2),
            counters: HashMap::new(),
            m: 0,
        }
    }

    /// Returns the heavy hitter fraction.
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Returns the relative error.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns `k`; at most `k - 1` counters are kept.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the number of tokens inserted.
    pub fn m(&self) -> i64 {
        self.m
    }

    /// Returns the number of live counters.
    pub fn num_counters(&self) -> usize {
        self.counters.len()
    }

    /// Returns true if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.m == 0
    }

    /// Returns the counter of `token`, a lower bound of its frequency.
    pub fn estimate(&self, token: &T) -> i64 {
        self.counters.get(token).copied().unwrap_or(0)
    }

    /// Adds one occurrence of `token`.
    pub fn update(&mut self, token: T) {
        self.insert(token, 1);
    }

    /// Adds `count` occurrences of `token`, with the same outcome as `count`
    /// successive unit updates.
    ///
    /// # Panics
    ///
    /// Panics if `count` is negative.
    pub fn insert(&mut self, token: T, count: i64) {
        if count == 0 {
            return;
        }
        assert!(count > 0, "count may not be negative");

        let mut remaining = count;
        while remaining > 0 {
            if let Some(counter) = self.counters.get_mut(&token) {
                *counter += remaining;
                self.m += remaining;
                return;
            }
            if self.counters.len() < self.capacity() {
                self.counters.insert(token, remaining);
                self.m += remaining;
                return;
            }
            // Every unit arriving while the table is full decrements all
            // counters, until one reaches zero and frees a slot.
            let smallest = self.counters.values().copied().min().unwrap_or(0);
            let absorbed = remaining.min(smallest);
            self.counters.retain(|_, value| {
                *value -= absorbed;
                *value > 0
            });
            self.m += absorbed;
            remaining -= absorbed;
        }
    }

    /// Returns every counter above `(1 - epsilon) * phi * m`.
    pub fn heavy_hitters(&self) -> HashMap<T, i64> {
        let threshold = (1.0 - self.epsilon) * self.phi * self.m as f64;
        self.counters
            .iter()
            .filter(|(_, value)| **value as f64 > threshold)
            .map(|(token, value)| (token.clone(), *value))
            .collect()
    }

    /// Merges another summary into this one.
    ///
    /// Matching counters are summed. If more than `k - 1` counters remain, the
    /// `k`-th largest value is subtracted from every counter and non-positive
    /// counters are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigMismatch`](crate::error::ErrorKind::ConfigMismatch)
    /// if the summaries differ in phi or epsilon.
    pub fn merge(&mut self, other: &Self) -> Result<(), Error> {
        if self.phi.to_bits() != other.phi.to_bits() {
            return Err(Error::config_mismatch("phi", self.phi, other.phi));
        }
        if self.epsilon.to_bits() != other.epsilon.to_bits() {
            return Err(Error::config_mismatch("epsilon", self.epsilon, other.epsilon));
        }
        self.m += other.m;
        for (token, value) in other.counters.iter() {
            *self.counters.entry(token.clone()).or_insert(0) += *value;
        }
        self.prune_counters();
        Ok(())
    }

    /// Returns a summary with the same configuration and no data.
    pub fn clone_empty(&self) -> Self {
        Self {
            phi: self.phi,
            epsilon: self.epsilon,
            k: self.k,
            counters: HashMap::new(),
            m: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.k - 1
    }

    fn prune_counters(&mut self) {
        let capacity = self.capacity();
        if self.counters.len() <= capacity {
            return;
        }
        let mut values: Vec<i64> = self.counters.values().copied().collect();
        values.sort_unstable_by(|a, b| b.cmp(a));
        let offset = values[capacity];
        self.counters.retain(|_, value| {
            *value -= offset;
            *value > 0
        });
        log::debug!(
            "reduced merged misra-gries counters by {offset}, {} counters remain",
            self.counters.len()
        );
    }
}

impl<T: Hash + Eq + Clone> HeavyHitters<T> for MisraGries<T> {
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
