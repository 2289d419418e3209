// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Summaries of a tube cached in a binary aggregation tree.
//!
//! Leaves are the slices in time order. Every node stores the hull of the envelopes below it, whether one of them is empty, the hulls of their lower and upper bounds, and the ranges of the lower and upper primitives `∫ env.lb` and `∫ env.ub` over its slice bounds. Queries over a range of slices therefore cost `O(log n)`; the tube rebuilds the whole tree lazily after a write.

use crate::interval::Interval;
use crate::ops::*;
use crate::tube::slice::Slice;
use gcollections::ops::*;

#[derive(Debug, Clone, Copy)]
pub(super) struct Summary {
  pub codomain: Interval,
  pub has_empty: bool,
  pub lower_bounds: Interval,
  pub upper_bounds: Interval,
  pub lower_primitive: Interval,
  pub upper_primitive: Interval
}

impl Summary
{
  fn neutral() -> Summary {
    Summary {
      codomain: Interval::empty(),
      has_empty: false,
      lower_bounds: Interval::empty(),
      upper_bounds: Interval::empty(),
      lower_primitive: Interval::empty(),
      upper_primitive: Interval::empty()
    }
  }

  fn merge(&self, other: &Summary) -> Summary {
    Summary {
      codomain: self.codomain.hull(&other.codomain),
      has_empty: self.has_empty || other.has_empty,
      lower_bounds: self.lower_bounds.hull(&other.lower_bounds),
      upper_bounds: self.upper_bounds.hull(&other.upper_bounds),
      lower_primitive: self.lower_primitive.hull(&other.lower_primitive),
      upper_primitive: self.upper_primitive.hull(&other.upper_primitive)
    }
  }
}

#[derive(Debug, Clone, Default)]
pub(super) struct Aggregate {
  leaves: usize,
  tree: Vec<Summary>,
  lower_primitive: Vec<Interval>,
  upper_primitive: Vec<Interval>
}

impl Aggregate
{
  /// `slices` are given in time order.
  pub fn build<'a, I>(slices: I) -> Aggregate
  where
    I: ExactSizeIterator<Item=&'a Slice>
  {
    let leaves = slices.len();
    let mut lower_primitive = Vec::with_capacity(leaves + 1);
    let mut upper_primitive = Vec::with_capacity(leaves + 1);
    lower_primitive.push(Interval::singleton(0.0));
    upper_primitive.push(Interval::singleton(0.0));
    let mut tree = vec![Summary::neutral(); 2 * leaves];
    for (k, s) in slices.enumerate() {
      let dt = width(s.domain());
      let env = s.envelope();
      let (lb, ub) =
        if env.is_empty() { (Interval::empty(), Interval::empty()) }
        else { (bound(env.lower()), bound(env.upper())) };
      let lo = lower_primitive[k] + dt * lb;
      let hi = upper_primitive[k] + dt * ub;
      lower_primitive.push(lo);
      upper_primitive.push(hi);
      tree[leaves + k] = Summary {
        codomain: env,
        has_empty: s.is_empty(),
        lower_bounds: lb,
        upper_bounds: ub,
        lower_primitive: lower_primitive[k].hull(&lo),
        upper_primitive: upper_primitive[k].hull(&hi)
      };
    }
    for node in (1..leaves).rev() {
      tree[node] = tree[2 * node].merge(&tree[2 * node + 1]);
    }
    Aggregate { leaves, tree, lower_primitive, upper_primitive }
  }

  /// Summary of the slices of indexes `first..=last`; the neutral summary if the range is empty.
  pub fn query(&self, first: usize, last: usize) -> Summary {
    let mut res = Summary::neutral();
    if first > last || last >= self.leaves {
      return res;
    }
    let (mut l, mut r) = (first + self.leaves, last + self.leaves + 1);
    while l < r {
      if l % 2 == 1 {
        res = res.merge(&self.tree[l]);
        l += 1;
      }
      if r % 2 == 1 {
        r -= 1;
        res = res.merge(&self.tree[r]);
      }
      l /= 2;
      r /= 2;
    }
    res
  }

  pub fn root(&self) -> Summary {
    if self.leaves == 0 { Summary::neutral() }
    else { self.query(0, self.leaves - 1) }
  }

  /// Enclosures of `∫ env.lb` and `∫ env.ub` from the beginning of the tube to the input gate of slice `index`.
  pub fn primitives_at_bound(&self, index: usize) -> (Interval, Interval) {
    (self.lower_primitive[index], self.upper_primitive[index])
  }
}

// An infinite bound is not a singleton, it is kept as a half-line so that it propagates to the primitives.
fn bound(x: f64) -> Interval {
  if x == f64::INFINITY { Interval::new(f64::MAX, f64::INFINITY) }
  else if x == f64::NEG_INFINITY { Interval::new(f64::NEG_INFINITY, f64::MIN) }
  else { Interval::singleton(x) }
}

fn width(domain: Interval) -> Interval {
  Interval::singleton(domain.upper()) - Interval::singleton(domain.lower())
}
