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

//! Heavy hitter detection: tokens whose frequency exceeds a fraction `phi` of
//! the stream weight.
//!
//! Two strategies share the [`HeavyHitters`] capability set:
//!
//! - [`CountMinHeavyHitters`] layers a min-heap of candidates on a Count-Min
//!   table. It is randomized and only valid in the cash-register model
//!   (positive counts).
//! - [`MisraGries`] keeps at most `k - 1` exact counters and needs no hashing.
//!   It never misses a token above `phi * m` and never reports one below
//!   `(phi - epsilon) * m`.
//!
//! # Usage
//!
//! ```rust
//! use sketchlib::heavy_hitters::HeavyHitters;
//! use sketchlib::heavy_hitters::MisraGries;
//!
//! let mut left = MisraGries::new(0.3, 0.01);
//! let mut right = left.clone_empty();
//! left.insert("apple", 40_000);
//! left.insert("banana", 10_000);
//! right.insert("apple", 20_000);
//! right.insert("orange", 50_000);
//!
//! let merged = left.merged(&right).unwrap();
//! let hitters = merged.heavy_hitters();
//! assert!(hitters.contains_key("apple"));
//! assert!(hitters.contains_key("orange"));
//! assert!(!hitters.contains_key("banana"));
//! ```

use std::collections::HashMap;

use crate::error::Error;

mod count_min;
mod misra_gries;

pub use self::count_min::CountMinHeavyHitters;
pub use self::misra_gries::MisraGries;

/// Default heavy hitter fraction.
pub const DEFAULT_PHI: f64 = 0.05;
/// Default relative error, as a fraction of `phi`.
pub const DEFAULT_EPSILON: f64 = 0.2;

/// Capabilities shared by heavy hitter sketches.
pub trait HeavyHitters<T>: Clone {
    /// Adds `count` occurrences of `token`.
    fn insert(&mut self, token: T, count: i64);

    /// Returns the reported heavy hitters with their estimated frequencies.
    ///
    /// An empty sketch reports an empty map.
    fn heavy_hitters(&self) -> HashMap<T, i64>;

    /// Merges another sketch of identical configuration into this one.
    fn merge(&mut self, other: &Self) -> Result<(), Error>;

    /// Returns an empty sketch that can be merged with this one.
    fn clone_empty(&self) -> Self;

    /// Returns a new sketch equal to `self` merged with `other`, leaving both
    /// operands untouched.
    fn merged(&self, other: &Self) -> Result<Self, Error> {
        let mut result = self.clone();
        result.merge(other)?;
        Ok(result)
    }
}

pub(crate) fn check_fraction(name: &str, value: f64) {
    assert!(
        value > 0.0 && value < 1.0,
        "{name} must be in (0, 1), got {value}"
    );
}
