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

//! Mergeable streaming sketches for frequencies, heavy hitters and quantiles.
//!
//! Every sketch here trades a bounded, tunable error for memory that does not
//! grow with the stream, and every sketch can be merged with a sibling of the
//! same configuration to summarize the concatenated streams. The intended way
//! to scale is one sketch per shard, merged once the shards are done.
//!
//! - [`countmin`]: Count-Min frequency table.
//! - [`quantiles`]: quantiles over an integer range from dyadic Count-Min tables.
//! - [`heavy_hitters`]: Count-Min and Misra-Gries heavy hitter detectors.
//! - [`hash`]: the seeded hash every sketch goes through.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod countmin;
pub mod error;
pub mod hash;
pub mod heavy_hitters;
pub mod quantiles;
