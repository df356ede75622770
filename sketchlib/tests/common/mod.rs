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

#![allow(dead_code)]

/// Xorshift generator, enough to shuffle test streams reproducibly.
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn seeded(seed: u64) -> Self {
        let state = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Returns a value in `[0, bound)`.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_below(i as u64 + 1) as usize;
            items.swap(i, j);
        }
    }
}

/// Stream of 200,000 fruit tokens in shuffled order: "apple" and "orange"
/// 60,000 times each, "banana" 40,000 times, "mango" and "kiwi" 20,000 times.
pub fn fruit_stream(seed: u64) -> Vec<&'static str> {
    let mut tokens = Vec::with_capacity(200_000);
    for (token, count) in [
        ("apple", 60_000),
        ("orange", 60_000),
        ("banana", 40_000),
        ("mango", 20_000),
        ("kiwi", 20_000),
    ] {
        tokens.extend(std::iter::repeat_n(token, count));
    }
    XorShift64::seeded(seed).shuffle(&mut tokens);
    tokens
}
