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

use super::DEFAULT_DELTA;
use super::DEFAULT_EPSILON;
use super::MAX_RANGE;
use super::sketch::QuantileSketch;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::hash::DEFAULT_SEED;

/// Builder for creating [`QuantileSketch`] instances.
///
/// # Examples
///
/// ```
/// use sketchlib::quantiles::QuantileSketch;
///
/// let sketch = QuantileSketch::builder(10_000)
///     .epsilon(0.01)
///     .delta(0.05)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// assert_eq!(sketch.range_max(), 10_000);
/// ```
#[derive(Debug, Clone)]
pub struct QuantileSketchBuilder {
    range_max: u64,
    epsilon: f64,
    delta: f64,
    seed: u32,
    max_count: Option<u64>,
}

impl QuantileSketchBuilder {
    pub(super) fn new(range_max: u64) -> Self {
        Self {
            range_max,
            epsilon: DEFAULT_EPSILON,
            delta: DEFAULT_DELTA,
            seed: DEFAULT_SEED,
            max_count: None,
        }
    }

    /// Sets the relative rank error.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the probability that an estimate exceeds the error bound.
    pub fn delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Sets the hash seed.
    ///
    /// Sketches built with different seeds cannot be merged.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the expected maximum stream weight used to size the tables.
    ///
    /// Defaults to `range_max`.
    pub fn max_count(mut self, max_count: u64) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Builds the sketch.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`] if `range_max` is 0 or above
    /// [`MAX_RANGE`](super::MAX_RANGE), if `epsilon` or `delta` is not in
    /// (0, 1), or if `max_count` is 0.
    pub fn build(self) -> Result<QuantileSketch, Error> {
        if self.range_max == 0 || self.range_max > MAX_RANGE {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                format!("range_max must be in [1, {MAX_RANGE}]"),
            )
            .with_context("range_max", self.range_max));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(
                Error::new(ErrorKind::ConfigInvalid, "epsilon must be in (0, 1)")
                    .with_context("epsilon", self.epsilon),
            );
        }
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(
                Error::new(ErrorKind::ConfigInvalid, "delta must be in (0, 1)")
                    .with_context("delta", self.delta),
            );
        }
        let max_count = self.max_count.unwrap_or(self.range_max);
        if max_count == 0 {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "max_count must be at least 1",
            ));
        }
        Ok(QuantileSketch::make(
            self.epsilon,
            self.delta,
            self.range_max,
            max_count,
            self.seed,
        ))
    }
}
