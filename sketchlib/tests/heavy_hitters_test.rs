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

mod common;

use std::collections::HashMap;

use common::fruit_stream;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;
use googletest::prelude::ge;
use sketchlib::error::ErrorKind;
use sketchlib::heavy_hitters::CountMinHeavyHitters;
use sketchlib::heavy_hitters::HeavyHitters;
use sketchlib::heavy_hitters::MisraGries;

fn feed<H: HeavyHitters<&'static str>>(sketch: &mut H, tokens: &[&'static str]) {
    for token in tokens {
        sketch.insert(*token, 1);
    }
}

fn assert_fruit_hitters(hitters: &HashMap<&'static str, i64>) {
    assert!(hitters.contains_key("apple"), "apple missing: {hitters:?}");
    assert!(hitters.contains_key("orange"), "orange missing: {hitters:?}");
    assert!(!hitters.contains_key("banana"), "banana reported: {hitters:?}");
    assert!(!hitters.contains_key("mango"), "mango reported: {hitters:?}");
    assert!(!hitters.contains_key("kiwi"), "kiwi reported: {hitters:?}");
}

fn split_merge_scenario<H: HeavyHitters<&'static str>>(empty: H) -> HashMap<&'static str, i64> {
    let mut left = empty.clone_empty();
    let mut right = empty.clone_empty();
    left.insert("apple", 40_000);
    left.insert("banana", 10_000);
    right.insert("apple", 20_000);
    right.insert("orange", 50_000);
    left.merged(&right).unwrap().heavy_hitters()
}

#[test]
fn test_misra_gries_finds_heavy_hitters() {
    let mut sketch = MisraGries::new(0.3, 0.01);
    feed(&mut sketch, &fruit_stream(1));

    assert_eq!(sketch.m(), 200_000);
    assert!(sketch.num_counters() < sketch.k());
    let hitters = sketch.heavy_hitters();
    assert_fruit_hitters(&hitters);
    assert_eq!(hitters["apple"], 60_000);
}

#[test]
fn test_misra_gries_merge() {
    let hitters = split_merge_scenario(MisraGries::new(0.3, 0.01));
    assert!(hitters.contains_key("apple"));
    assert!(hitters.contains_key("orange"));
    assert!(!hitters.contains_key("banana"));
    assert_eq!(hitters["apple"], 60_000);
}

#[test]
fn test_misra_gries_bounded_counters() {
    let mut sketch = MisraGries::new(0.2, 0.5);
    assert_eq!(sketch.k(), 10);
    for i in 0..10_000u64 {
        sketch.update(i % 37);
        assert!(sketch.num_counters() < sketch.k());
    }
    sketch.insert(7, 5_000);
    assert!(sketch.heavy_hitters().contains_key(&7));
}

#[test]
fn test_misra_gries_merge_keeps_counters_bounded() {
    let mut left = MisraGries::new(0.2, 0.5);
    let mut right = left.clone_empty();
    for i in 0..9u64 {
        left.insert(i, 100 + i as i64);
        right.insert(i + 9, 100 + i as i64);
    }
    left.merge(&right).unwrap();
    assert!(left.num_counters() < left.k());
    assert_eq!(left.m(), 2 * (0..9).map(|i| 100 + i).sum::<i64>());
}

#[test]
fn test_misra_gries_merge_incompatible() {
    let mut sketch = MisraGries::<&str>::new(0.3, 0.01);
    let err = sketch.merge(&MisraGries::new(0.2, 0.01)).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::ConfigMismatch));
    assert_that!(err.message(), contains_substring("phi"));

    let err = sketch.merge(&MisraGries::new(0.3, 0.02)).unwrap_err();
    assert_that!(err.message(), contains_substring("epsilon"));
}

#[test]
fn test_misra_gries_merge_mismatch_leaves_receiver_untouched() {
    let mut sketch = MisraGries::new(0.3, 0.01);
    sketch.insert("apple", 40);
    sketch.insert("banana", 10);
    let snapshot = sketch.clone();

    let mut other = MisraGries::new(0.2, 0.01);
    other.insert("orange", 500);
    assert!(sketch.merge(&other).is_err());
    assert_eq!(sketch, snapshot);
}

#[test]
fn test_count_min_finds_heavy_hitters() {
    let mut sketch = CountMinHeavyHitters::new(0.3, 0.1, 0.01, 42);
    feed(&mut sketch, &fruit_stream(2));

    assert_eq!(sketch.l1_norm(), 200_000);
    let hitters = sketch.heavy_hitters();
    assert_fruit_hitters(&hitters);
    assert_that!(hitters["apple"], ge(60_000));
    assert_that!(hitters["orange"], ge(60_000));
}

#[test]
fn test_count_min_merge() {
    let hitters = split_merge_scenario(CountMinHeavyHitters::new(0.3, 0.1, 0.01, 42));
    assert!(hitters.contains_key("apple"));
    assert!(hitters.contains_key("orange"));
    assert!(!hitters.contains_key("banana"));
    assert_that!(hitters["apple"], ge(60_000));
}

#[test]
fn test_count_min_merged_leaves_operands_untouched() {
    let mut left = CountMinHeavyHitters::new(0.3, 0.1, 0.01, 42);
    let mut right = CountMinHeavyHitters::from_existing(&left);
    left.insert("apple", 10);
    right.insert("orange", 30);

    let merged = HeavyHitters::merged(&left, &right).unwrap();
    assert_eq!(merged.l1_norm(), 40);
    assert_eq!(left.l1_norm(), 10);
    assert_eq!(right.l1_norm(), 30);
    assert!(left.heavy_hitters().contains_key("apple"));
    assert!(merged.heavy_hitters().contains_key("orange"));
}

#[test]
fn test_count_min_merge_incompatible() {
    let mut sketch = CountMinHeavyHitters::<&str>::new(0.3, 0.1, 0.01, 42);

    let err = sketch
        .merge(&CountMinHeavyHitters::new(0.3, 0.1, 0.01, 7))
        .unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::ConfigMismatch));
    assert_that!(err.message(), contains_substring("seed"));

    let err = sketch
        .merge(&CountMinHeavyHitters::new(0.2, 0.1, 0.01, 42))
        .unwrap_err();
    assert_that!(err.message(), contains_substring("phi"));

    let err = sketch
        .merge(&CountMinHeavyHitters::new(0.3, 0.2, 0.01, 42))
        .unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::ConfigMismatch));
    assert_that!(err.message(), contains_substring("epsilon"));

    let err = sketch
        .merge(&CountMinHeavyHitters::new(0.3, 0.1, 0.05, 42))
        .unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::ConfigMismatch));
    assert_that!(err.message(), contains_substring("delta"));
}

#[test]
fn test_count_min_merge_mismatch_leaves_receiver_untouched() {
    let mut sketch = CountMinHeavyHitters::new(0.3, 0.1, 0.01, 42);
    sketch.insert("apple", 40);
    sketch.insert("banana", 10);
    let hitters = sketch.heavy_hitters();
    let candidates = sketch.num_candidates();

    let mut other = CountMinHeavyHitters::new(0.3, 0.1, 0.01, 7);
    other.insert("orange", 500);
    assert!(sketch.merge(&other).is_err());
    assert!(
        sketch
            .merge(&CountMinHeavyHitters::new(0.3, 0.1, 0.05, 42))
            .is_err()
    );

    assert_eq!(sketch.l1_norm(), 50);
    assert_eq!(sketch.num_candidates(), candidates);
    assert_eq!(sketch.heavy_hitters(), hitters);
}

#[test]
fn test_empty_sketches_report_nothing() {
    assert!(MisraGries::<String>::default().heavy_hitters().is_empty());
    assert!(
        CountMinHeavyHitters::<String>::default()
            .heavy_hitters()
            .is_empty()
    );
}

#[test]
#[should_panic(expected = "phi must be in (0, 1)")]
fn test_invalid_phi_panics() {
    MisraGries::<u64>::new(0.0, 0.1);
}
