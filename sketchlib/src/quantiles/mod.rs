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

//! Quantile sketch built from Count-Min tables over dyadic intervals.
//!
//! Values are integers in `[1, range_max]`. Level `i` of the sketch is a
//! Count-Min table keyed by the index of the block of `2^i` consecutive values
//! a value falls into. The weight of any prefix `[1, v]` is the sum of at most
//! one block per level, found by the canonical dyadic decomposition, so a
//! quantile is a binary search over `v` on those prefix estimates.
//!
//! Estimates inherit the one-sided error of Count-Min: prefix weights are never
//! underestimated for non-negative streams, so a reported quantile can sit
//! slightly below the exact one but its true rank stays within
//! `epsilon * l1_norm` of the requested rank with probability `1 - delta`.
//!
//! # Usage
//!
//! ```rust
//! # use sketchlib::quantiles::QuantileSketch;
//! let mut sketch = QuantileSketch::new(0.01, 0.01, 1000, 42);
//! for value in 1..=1000 {
//!     sketch.update(value).unwrap();
//! }
//! let median = sketch.query(0.5).unwrap().unwrap();
//! assert!((490..=510).contains(&median));
//! ```
//!
//! # Configuration
//!
//! ```rust
//! # use sketchlib::quantiles::QuantileSketch;
//! let sketch = QuantileSketch::builder(1 << 20)
//!     .epsilon(0.05)
//!     .delta(0.001)
//!     .seed(7)
//!     .max_count(1_000_000)
//!     .build()
//!     .unwrap();
//! assert_eq!(sketch.levels(), 21);
//! ```

mod builder;
mod dyadic;
mod sketch;

pub use self::builder::QuantileSketchBuilder;
pub use self::dyadic::DyadicBlock;
pub use self::sketch::QuantileSketch;

/// Default relative rank error.
pub const DEFAULT_EPSILON: f64 = 0.1;
/// Default failure probability.
pub const DEFAULT_DELTA: f64 = 0.01;
/// Largest supported `range_max`.
pub const MAX_RANGE: u64 = 1 << 62;
