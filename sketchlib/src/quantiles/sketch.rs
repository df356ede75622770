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

use super::builder::QuantileSketchBuilder;
use super::dyadic::DyadicBlock;
use super::dyadic::decompose;
use crate::countmin::CountMinSketch;
use crate::error::Error;
use crate::error::ErrorKind;

/// Count-Min based quantile sketch over the integers `[1, range_max]`.
///
/// See the [quantiles module level documentation](crate::quantiles) for more.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileSketch {
    epsilon: f64,
    delta: f64,
    range_max: u64,
    max_count: u64,
    seed: u32,
    levels: u32,
    l1_norm: i64,
    // One table per level in `0..=levels`.
    tables: Vec<CountMinSketch>,
}

impl QuantileSketch {
    /// Creates a new sketch for values in `[1, range_max]`.
    ///
    /// # Panics
    ///
    /// Panics if `range_max` is 0 or above [`MAX_RANGE`](super::MAX_RANGE), or
    /// if `epsilon` or `delta` is not in (0, 1). Use [`QuantileSketch::builder`]
    /// to receive these as errors instead.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sketchlib::quantiles::QuantileSketch;
    /// let sketch = QuantileSketch::new(0.1, 0.01, 20, 42);
    /// assert_eq!(sketch.levels(), 6);
    /// assert!(sketch.is_empty());
    /// ```
    pub fn new(epsilon: f64, delta: f64, range_max: u64, seed: u32) -> Self {
        Self::builder(range_max)
            .epsilon(epsilon)
            .delta(delta)
            .seed(seed)
            .build()
            .unwrap_or_else(|err| panic!("invalid quantile sketch config: {err}"))
    }

    /// Returns a builder for a sketch over `[1, range_max]`.
    pub fn builder(range_max: u64) -> QuantileSketchBuilder {
        QuantileSketchBuilder::new(range_max)
    }

    pub(super) fn make(
        epsilon: f64,
        delta: f64,
        range_max: u64,
        max_count: u64,
        seed: u32,
    ) -> Self {
        let levels = ceil_log2(range_max) + 1;
        let width = table_width(epsilon, max_count);
        let table = CountMinSketch::new(width, delta, seed);
        let tables = (0..=levels).map(|_| table.clone_empty()).collect();
        Self {
            epsilon,
            delta,
            range_max,
            max_count,
            seed,
            levels,
            l1_norm: 0,
            tables,
        }
    }

    /// Returns a sketch with the same configuration and no data.
    pub fn clone_empty(&self) -> Self {
        Self {
            l1_norm: 0,
            tables: self.tables.iter().map(|t| t.clone_empty()).collect(),
            ..*self
        }
    }

    /// Creates an empty sketch mergeable with `original`.
    pub fn from_existing(original: &Self) -> Self {
        original.clone_empty()
    }

    /// Returns the relative rank error.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns the failure probability.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Returns the largest value the sketch accepts.
    pub fn range_max(&self) -> u64 {
        self.range_max
    }

    /// Returns the stream weight the tables were sized for.
    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns `ceil(log2(range_max)) + 1`.
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Returns the column count shared by every level table.
    pub fn width(&self) -> usize {
        self.tables[0].width()
    }

    /// Returns the total weight inserted.
    pub fn l1_norm(&self) -> i64 {
        self.l1_norm
    }

    /// Returns true if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.l1_norm == 0
    }

    /// Inserts one occurrence of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DomainError`] if `value` is outside `[1, range_max]`.
    pub fn update(&mut self, value: u64) -> Result<(), Error> {
        self.insert(value, 1)
    }

    /// Inserts `value` with the given weight.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DomainError`] if `value` is outside `[1, range_max]`.
    pub fn insert(&mut self, value: u64, weight: i64) -> Result<(), Error> {
        self.check_value(value)?;
        for (level, table) in self.tables.iter_mut().enumerate() {
            let block = DyadicBlock::containing(value, level as u32);
            table.insert(&block.index(), weight);
        }
        self.l1_norm += weight;
        Ok(())
    }

    /// Returns the canonical dyadic decomposition of `[lower, upper]`.
    pub fn decompose(&self, lower: u64, upper: u64) -> Vec<DyadicBlock> {
        decompose(lower, upper, self.levels)
    }

    /// Estimates the weight inserted at values in `[1, upper]`.
    ///
    /// `upper` above `range_max` is clamped; `upper == 0` yields 0.
    pub fn estimate_prefix_count(&self, upper: u64) -> i64 {
        self.estimate_range_count(1, upper)
    }

    /// Estimates the weight inserted at values in `[lower, upper]`.
    pub fn estimate_range_count(&self, lower: u64, upper: u64) -> i64 {
        let upper = upper.min(self.range_max);
        self.decompose(lower, upper)
            .iter()
            .map(|block| self.tables[block.level() as usize].estimate(&block.index()))
            .sum()
    }

    /// Returns the smallest value whose estimated prefix weight reaches
    /// `q * l1_norm`.
    ///
    /// Returns `Ok(None)` for an empty sketch or when no value reaches the
    /// threshold. `q == 0` always yields the smallest value, 1.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DomainError`] if `q` is not in `[0, 1]`.
    pub fn query(&self, q: f64) -> Result<Option<u64>, Error> {
        if !(0.0..=1.0).contains(&q) {
            return Err(
                Error::new(ErrorKind::DomainError, "query fraction must be in [0, 1]")
                    .with_context("q", q),
            );
        }
        if self.is_empty() {
            return Ok(None);
        }
        if q == 0.0 {
            return Ok(Some(1));
        }

        let threshold = q * self.l1_norm as f64;
        let (mut lower, mut upper) = (1u64, self.range_max);
        let mut result = None;
        while lower <= upper {
            let mid = lower + (upper - lower) / 2;
            if (self.estimate_prefix_count(mid) as f64) < threshold {
                lower = mid + 1;
            } else {
                result = Some(mid);
                upper = mid - 1;
            }
        }
        Ok(result)
    }

    /// Returns the estimated normalized rank of `value`: the fraction of the
    /// stream weight at or below it.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DomainError`] if `value` is outside `[1, range_max]`.
    pub fn rank(&self, value: u64) -> Result<Option<f64>, Error> {
        self.check_value(value)?;
        if self.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            self.estimate_prefix_count(value) as f64 / self.l1_norm as f64,
        ))
    }

    /// Returns the estimated values at each of the given ranks.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::DomainError`] if any rank is not in `[0, 1]`.
    pub fn quantiles(&self, ranks: &[f64]) -> Result<Vec<Option<u64>>, Error> {
        ranks.iter().map(|&q| self.query(q)).collect()
    }

    /// Merges another sketch into this one.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigMismatch`] if the sketches differ in epsilon,
    /// delta, range, seed or table shape. `self` is left untouched in that case.
    pub fn merge(&mut self, other: &QuantileSketch) -> Result<(), Error> {
        if self.epsilon.to_bits() != other.epsilon.to_bits() {
            return Err(Error::config_mismatch("epsilon", self.epsilon, other.epsilon));
        }
        if self.delta.to_bits() != other.delta.to_bits() {
            return Err(Error::config_mismatch("delta", self.delta, other.delta));
        }
        if self.range_max != other.range_max {
            return Err(Error::config_mismatch(
                "range_max",
                self.range_max,
                other.range_max,
            ));
        }
        if self.seed != other.seed {
            return Err(Error::config_mismatch("seed", self.seed, other.seed));
        }
        self.tables[0].check_compatible(&other.tables[0])?;

        for (ours, theirs) in self.tables.iter_mut().zip(other.tables.iter()) {
            ours.merge(theirs)?;
        }
        self.l1_norm += other.l1_norm;
        log::debug!(
            "merged quantile sketch over [1, {}], l1 norm now {}",
            self.range_max,
            self.l1_norm
        );
        Ok(())
    }

    fn check_value(&self, value: u64) -> Result<(), Error> {
        if value == 0 || value > self.range_max {
            return Err(Error::new(
                ErrorKind::DomainError,
                format!("value must be in [1, {}]", self.range_max),
            )
            .with_context("value", value));
        }
        Ok(())
    }
}

fn ceil_log2(n: u64) -> u32 {
    if n <= 1 {
        0
    } else {
        u64::BITS - (n - 1).leading_zeros()
    }
}

// Prefix queries add up one estimate per level, so each table only gets a
// logarithmic share of the error budget.
fn table_width(epsilon: f64, max_count: u64) -> usize {
    let log_count = (max_count.max(2) as f64).log2();
    ((3.0 * log_count / epsilon).ceil() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(10), 4);
        assert_eq!(ceil_log2(16), 4);
        assert_eq!(ceil_log2(17), 5);
    }

    #[test]
    fn test_every_level_sees_the_full_weight() {
        let mut sketch = QuantileSketch::new(0.1, 0.05, 20, 42);
        sketch.insert(5, 3).unwrap();
        sketch.insert(17, 2).unwrap();
        assert_eq!(sketch.tables.len(), 7);
        for table in &sketch.tables {
            assert_eq!(table.total_weight(), sketch.l1_norm());
        }
        // The top level holds a single block spanning the whole range.
        assert_eq!(sketch.tables[6].estimate(&1u64), 5);
    }

    #[test]
    fn test_table_width() {
        assert_eq!(table_width(0.5, 16), 24);
        assert_eq!(table_width(0.5, 1), 6);
    }
}
