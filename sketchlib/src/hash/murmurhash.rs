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

/// MurmurHash3 x64 128-bit digest of `token`, fed through its [`Hash`] impl.
pub(crate) fn murmurhash3_128<T: Hash + ?Sized>(token: &T, seed: u32) -> (u64, u64) {
    let mut hasher = mur3::Hasher128::with_seed(seed);
    token.hash(&mut hasher);
    hasher.finish128()
}
