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

//! Count-Min sketch implementation for frequency estimation.
//!
//! The Count-Min sketch is a `depth × width` grid of counters. Every row hashes
//! a token to one column and adds the token's count there; a point query reads
//! the token's counter in every row and returns the minimum. Collisions can
//! only inflate counters, so for streams of non-negative counts the estimate
//! never falls below the true frequency. With probability at least `1 - delta`
//! it exceeds the true frequency by no more than `total_weight / width`.
//!
//! # Usage
//!
//! ```rust
//! use sketchlib::countmin::CountMinSketch;
//!
//! let mut sketch = CountMinSketch::new(256, 0.01, 42);
//!
//! sketch.update("apple");
//! sketch.insert("banana", 3);
//!
//! let banana = sketch.estimate("banana");
//! assert!(banana >= 3);
//! ```
//!
//! # Mergeable Siblings
//!
//! Two tables can be merged only when they share width, depth and seeds. Use
//! [`CountMinSketch::clone_empty`] to obtain a sibling that is guaranteed to be
//! compatible:
//!
//! ```rust
//! use sketchlib::countmin::CountMinSketch;
//!
//! let mut left = CountMinSketch::with_error(0.01, 0.01, 7);
//! let mut right = left.clone_empty();
//!
//! left.insert("apple", 2);
//! right.insert("apple", 5);
//! left.merge(&right).unwrap();
//!
//! assert!(left.estimate("apple") >= 7);
//! ```

mod sketch;

pub use self::sketch::CountMinSketch;
