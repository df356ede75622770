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

use std::hash::Hash;

use crate::error::Error;
use crate::hash::HashOracle;

/// Count-Min sketch for point frequency queries.
///
/// See the [countmin module level documentation](crate::countmin) for more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMinSketch {
    width: usize,
    depth: usize,
    oracle: HashOracle,
    seeds: Vec<u32>,
    // Row-major `depth × width` grid.
    counts: Vec<i64>,
    total_weight: i64,
}

impl CountMinSketch {
    /// Creates a new sketch with `width` columns and enough rows to fail with
    /// probability at most `delta`.
    ///
    /// # Panics
    ///
    /// Panics if `width` is 0 or `delta` is not in (0, 1).
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlib::countmin::CountMinSketch;
    /// let sketch = CountMinSketch::new(100, 0.01, 42);
    /// assert_eq!(sketch.width(), 100);
    /// assert_eq!(sketch.depth(), 5);
    /// ```
    pub fn new(width: usize, delta: f64, seed: u32) -> Self {
        assert!(width > 0, "width must be at least 1");
        Self::with_dimensions(width, Self::suggest_depth(delta), seed)
    }

    /// Creates a new sketch whose additive error is at most `epsilon` times the
    /// total weight with probability at least `1 - delta`.
    ///
    /// # Panics
    ///
    /// Panics if `epsilon` or `delta` is not in (0, 1).
    pub fn with_error(epsilon: f64, delta: f64, seed: u32) -> Self {
        Self::new(Self::suggest_width(epsilon), delta, seed)
    }

    /// Creates a new sketch with an explicit number of rows.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `depth` is 0.
    pub fn with_dimensions(width: usize, depth: usize, seed: u32) -> Self {
        assert!(width > 0, "width must be at least 1");
        assert!(depth > 0, "depth must be at least 1");
        let oracle = HashOracle::new(seed);
        Self {
            width,
            depth,
            oracle,
            seeds: oracle.seeds(depth),
            counts: vec![0; width * depth],
            total_weight: 0,
        }
    }

    /// Suggests the number of columns for a relative error `epsilon`.
    ///
    /// # Panics
    ///
    /// Panics if `epsilon` is not in (0, 1).
    pub fn suggest_width(epsilon: f64) -> usize {
        assert!(
            epsilon > 0.0 && epsilon < 1.0,
            "epsilon must be in (0, 1), got {epsilon}"
        );
        (1.0 / epsilon).ceil() as usize
    }

    /// Suggests the number of rows for a failure probability `delta`.
    ///
    /// # Panics
    ///
    /// Panics if `delta` is not in (0, 1).
    pub fn suggest_depth(delta: f64) -> usize {
        assert!(
            delta > 0.0 && delta < 1.0,
            "delta must be in (0, 1), got {delta}"
        );
        ((1.0 / delta).ln().ceil() as usize).max(1)
    }

    /// Returns a sketch with the same configuration and all counters at zero.
    ///
    /// The result shares no storage with `self` and always merges with it.
    pub fn clone_empty(&self) -> Self {
        Self {
            width: self.width,
            depth: self.depth,
            oracle: self.oracle,
            seeds: self.seeds.clone(),
            counts: vec![0; self.counts.len()],
            total_weight: 0,
        }
    }

    /// Creates an empty sketch mergeable with `original`.
    pub fn from_existing(original: &Self) -> Self {
        original.clone_empty()
    }

    /// Returns the number of columns per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the failure probability guaranteed by the number of rows,
    /// `e^-depth`.
    pub fn delta(&self) -> f64 {
        (-(self.depth as f64)).exp()
    }

    /// Returns the seed base the row seeds were derived from.
    pub fn seed(&self) -> u32 {
        self.oracle.seed_base()
    }

    /// Returns the per-row hash seeds.
    pub fn seeds(&self) -> &[u32] {
        &self.seeds
    }

    /// Returns the sum of all inserted counts.
    pub fn total_weight(&self) -> i64 {
        self.total_weight
    }

    /// Returns true if every counter is zero.
    ///
    /// Insertions that cancel out, such as `+10` then `-10` for one token,
    /// leave the sketch empty.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Adds one occurrence of `token`.
    pub fn update<T: Hash + ?Sized>(&mut self, token: &T) {
        self.insert(token, 1);
    }

    /// Adds `count` occurrences of `token`.
    ///
    /// Negative counts are accepted and act as deletions; estimates are only
    /// guaranteed to be one-sided while every token's net count stays
    /// non-negative.
    pub fn insert<T: Hash + ?Sized>(&mut self, token: &T, count: i64) {
        for row in 0..self.depth {
            let index = self.cell(token, row);
            self.counts[index] += count;
        }
        self.total_weight += count;
    }

    /// Returns the estimated frequency of `token`.
    pub fn estimate<T: Hash + ?Sized>(&self, token: &T) -> i64 {
        (0..self.depth)
            .map(|row| self.counts[self.cell(token, row)])
            .min()
            .unwrap_or(0)
    }

    /// Returns the upper bound of the frequency of `token`.
    pub fn upper_bound<T: Hash + ?Sized>(&self, token: &T) -> i64 {
        self.estimate(token)
    }

    /// Returns the lower bound of the frequency of `token`, holding with
    /// probability at least `1 - delta`.
    pub fn lower_bound<T: Hash + ?Sized>(&self, token: &T) -> i64 {
        (self.estimate(token) - self.error_bound()).max(0)
    }

    /// Returns the additive error bound `total_weight / width`, rounded up.
    pub fn error_bound(&self) -> i64 {
        let total = self.total_weight.max(0);
        let width = self.width as i64;
        (total + width - 1) / width
    }

    /// Merges another sketch into this one.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigMismatch`](crate::error::ErrorKind::ConfigMismatch)
    /// if the sketches differ in width, depth or seeds. `self` is left
    /// untouched in that case.
    pub fn merge(&mut self, other: &CountMinSketch) -> Result<(), Error> {
        self.check_compatible(other)?;
        for (ours, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *ours += *theirs;
        }
        self.total_weight += other.total_weight;
        log::debug!(
            "merged count-min sketch {}x{}, total weight now {}",
            self.depth,
            self.width,
            self.total_weight
        );
        Ok(())
    }

    /// Resets every counter to zero, keeping the configuration.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.total_weight = 0;
    }

    pub(crate) fn check_compatible(&self, other: &CountMinSketch) -> Result<(), Error> {
        if self.width != other.width {
            return Err(Error::config_mismatch("width", self.width, other.width));
        }
        if self.depth != other.depth {
            return Err(Error::config_mismatch("depth", self.depth, other.depth));
        }
        if self.seeds != other.seeds {
            return Err(Error::config_mismatch(
                "seeds",
                format!("{:?}", self.seeds),
                format!("{:?}", other.seeds),
            ));
        }
        Ok(())
    }

    #[inline]
    fn cell<T: Hash + ?Sized>(&self, token: &T, row: usize) -> usize {
        row * self.width + crate::hash::bucket(token, self.seeds[row], self.width)
    }
}
