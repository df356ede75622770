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

//! Dyadic blocks and the canonical decomposition of integer ranges.

/// A dyadic block of the value domain: the `index`-th run of `2^level`
/// consecutive values, i.e. `[(index - 1) * 2^level + 1, index * 2^level]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DyadicBlock {
    level: u32,
    index: u64,
}

impl DyadicBlock {
    /// Returns the block at `level` that contains `value`.
    ///
    /// `value` is 1-based.
    ///
    /// # Panics
    ///
    /// Panics if `value` is 0.
    pub fn containing(value: u64, level: u32) -> Self {
        assert!(value >= 1, "dyadic values are 1-based");
        Self {
            level,
            index: ((value - 1) >> level) + 1,
        }
    }

    /// Returns the level, i.e. `log2` of the block length.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Returns the 1-based position of the block within its level.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns the number of values covered.
    pub fn len(&self) -> u64 {
        1 << self.level
    }

    /// Always false: a block covers at least one value.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the first value covered.
    pub fn start(&self) -> u64 {
        ((self.index - 1) << self.level) + 1
    }

    /// Returns the last value covered.
    pub fn end(&self) -> u64 {
        self.index << self.level
    }
}

/// Splits `[lower, upper]` into the fewest disjoint dyadic blocks no larger
/// than `2^max_level`, ordered by start.
///
/// Each step peels the largest aligned block that fits off whichever end of
/// the remaining range admits the larger one. An empty range yields no blocks.
pub(crate) fn decompose(lower: u64, upper: u64, max_level: u32) -> Vec<DyadicBlock> {
    let lower = lower.max(1);
    if upper < lower {
        return Vec::new();
    }

    let mut head = Vec::new();
    let mut tail = Vec::new();
    // Half-open, 0-based: [lo, hi) covers values lo + 1 ..= hi.
    let (mut lo, mut hi) = (lower - 1, upper);
    while lo < hi {
        let fits = (hi - lo).ilog2().min(max_level);
        let lo_level = lo.trailing_zeros().min(fits);
        let hi_level = hi.trailing_zeros().min(fits);
        if lo_level >= hi_level {
            head.push(DyadicBlock {
                level: lo_level,
                index: (lo >> lo_level) + 1,
            });
            lo += 1 << lo_level;
        } else {
            hi -= 1 << hi_level;
            tail.push(DyadicBlock {
                level: hi_level,
                index: (hi >> hi_level) + 1,
            });
        }
    }
    head.extend(tail.into_iter().rev());
    head
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(blocks: &[DyadicBlock]) -> Vec<(u64, u64)> {
        blocks.iter().map(|b| (b.start(), b.end())).collect()
    }

    #[test]
    fn test_containing_block() {
        let positions: Vec<u64> = (0..5).map(|i| DyadicBlock::containing(5, i).index()).collect();
        assert_eq!(positions, vec![5, 3, 2, 1, 1]);

        let block = DyadicBlock::containing(20, 2);
        assert_eq!((block.start(), block.end(), block.len()), (17, 20, 4));
    }

    #[test]
    #[should_panic(expected = "dyadic values are 1-based")]
    fn test_containing_rejects_zero() {
        DyadicBlock::containing(0, 3);
    }

    #[test]
    fn test_prefix_decomposition_follows_binary_digits() {
        assert_eq!(spans(&decompose(1, 7, 63)), vec![(1, 4), (5, 6), (7, 7)]);
        assert_eq!(spans(&decompose(1, 8, 63)), vec![(1, 8)]);
        assert_eq!(spans(&decompose(1, 1, 63)), vec![(1, 1)]);

        for upper in 1..=4096u64 {
            let blocks = decompose(1, upper, 63);
            assert_eq!(blocks.len() as u32, upper.count_ones(), "upper={upper}");
        }
    }

    #[test]
    fn test_inner_range_decomposition() {
        assert_eq!(
            spans(&decompose(2, 7, 63)),
            vec![(2, 2), (3, 4), (5, 6), (7, 7)]
        );
        assert_eq!(
            spans(&decompose(3, 14, 63)),
            vec![(3, 4), (5, 8), (9, 12), (13, 14)]
        );
        assert_eq!(spans(&decompose(5, 5, 63)), vec![(5, 5)]);
    }

    #[test]
    fn test_decomposition_is_exact_cover() {
        for lower in 1..=64u64 {
            for upper in lower..=96 {
                let blocks = decompose(lower, upper, 63);
                let mut next = lower;
                for block in &blocks {
                    assert_eq!(block.start(), next, "gap in [{lower}, {upper}]");
                    assert_eq!(block.len(), 1 << block.level());
                    assert_eq!((block.start() - 1) % block.len(), 0, "misaligned block");
                    next = block.end() + 1;
                }
                assert_eq!(next, upper + 1);
                // Canonical decompositions use at most two blocks per level.
                assert!(blocks.len() <= 2 * (upper.ilog2() as usize + 1));
            }
        }
    }

    #[test]
    fn test_empty_and_capped_ranges() {
        assert!(decompose(5, 4, 63).is_empty());
        assert_eq!(spans(&decompose(1, 8, 1)), vec![(1, 2), (3, 4), (5, 6), (7, 8)]);
    }
}
