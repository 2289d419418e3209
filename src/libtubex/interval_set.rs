// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Closed interval set over the reals.
//!
//! It stores disjoint intervals ordered by their bounds. `[1..2] U [5..6]` is stored as `{[1..2], [5..6]}`. Intervals sharing a bound are merged, so `[1..2] U [2..3]` is `{[1..3]}`. It is the result type of the inversion of a tube when the different solution intervals must be kept apart.
//!
//! # See also
//! [interval](../interval/index.html)

use crate::interval::Interval;
use crate::ops::*;
use gcollections::kind::*;
use gcollections::ops::*;
use std::iter::Peekable;
use std::fmt::{Display, Error, Formatter};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntervalSet {
  intervals: Vec<Interval>
}

impl IntervalSet
{
  pub fn interval_count(&self) -> usize {
    self.intervals.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
    self.intervals.iter()
  }

  fn from_interval(i: Interval) -> IntervalSet {
    let mut res = IntervalSet::empty();
    if !i.is_empty() {
      res.push(i);
    }
    res
  }

  fn front(&self) -> &Interval {
    debug_assert!(!self.is_empty(), "Cannot access the first interval of an empty set.");
    &self.intervals[0]
  }

  fn back(&self) -> &Interval {
    debug_assert!(!self.is_empty(), "Cannot access the last interval of an empty set.");
    &self.intervals[self.intervals.len() - 1]
  }

  /// Smallest interval enclosing the set.
  pub fn span(&self) -> Interval {
    if self.is_empty() {
      Interval::empty()
    }
    else {
      Interval::new(self.front().lower(), self.back().upper())
    }
  }

  fn push(&mut self, x: Interval) {
    debug_assert!(!x.is_empty(), "Cannot push empty interval.");
    debug_assert!(self.is_empty() || !joinable(self.back(), &x),
      "The intervals array must be ordered and intervals must not be joinable. For a safe push, use the union operation.");
    self.intervals.push(x);
  }

  /// Appends `x` at the back of the set, merging it with the last interval when they touch. Empty intervals are ignored.
  pub fn join_or_push(&mut self, x: Interval) {
    if x.is_empty() {
      return;
    }
    match self.intervals.pop() {
      None => self.push(x),
      Some(last) => {
        debug_assert!(last.lower() <= x.lower(),
          "This operation is only for pushing interval to the back of the array, possibly overlapping with the last element.");
        if joinable(&last, &x) {
          self.push(last.hull(&x));
        }
        else {
          self.push(last);
          self.push(x);
        }
      }
    }
  }
}

fn joinable(first: &Interval, second: &Interval) -> bool {
  first.upper() >= second.lower()
}

impl Collection for IntervalSet
{
  type Item = f64;
}

impl Range for IntervalSet
{
  fn new(lb: f64, ub: f64) -> IntervalSet {
    IntervalSet::from_interval(Interval::new(lb, ub))
  }
}

impl Bounded for IntervalSet
{
  fn lower(&self) -> f64 {
    self.span().lower()
  }

  fn upper(&self) -> f64 {
    self.span().upper()
  }
}

impl Empty for IntervalSet
{
  fn empty() -> IntervalSet {
    IntervalSet { intervals: vec![] }
  }
}

impl IsEmpty for IntervalSet
{
  fn is_empty(&self) -> bool {
    self.intervals.is_empty()
  }
}

impl Extend<Interval> for IntervalSet
{
  fn extend<I>(&mut self, iterable: I)
  where
    I: IntoIterator<Item=Interval>
  {
    for interval in iterable {
      self.join_or_push(interval);
    }
  }
}

impl FromIterator<Interval> for IntervalSet
{
  /// The intervals must come ordered by their lower bounds.
  fn from_iter<I>(iterable: I) -> IntervalSet
  where
    I: IntoIterator<Item=Interval>
  {
    let mut res = IntervalSet::empty();
    res.extend(iterable);
    res
  }
}

impl Contains for IntervalSet
{
  fn contains(&self, value: &f64) -> bool {
    let idx = self.intervals.partition_point(|i| i.upper() < *value);
    idx < self.intervals.len() && self.intervals[idx].contains(value)
  }
}

impl Diameter for IntervalSet
{
  /// Total length of the intervals.
  fn diam(&self) -> f64 {
    self.intervals.iter().map(|i| i.diam()).sum()
  }
}

fn advance_one<I, F>(a: &mut Peekable<I>, b: &mut Peekable<I>, choose: F) -> Option<Interval>
where
  I: Iterator<Item=Interval>,
  F: Fn(&Interval, &Interval) -> bool
{
  let who_advance = match (a.peek(), b.peek()) {
    (Some(i), Some(j)) => choose(i, j),
    _ => return None
  };
  let to_advance = if who_advance { a } else { b };
  to_advance.next()
}

fn advance_lower<I>(a: &mut Peekable<I>, b: &mut Peekable<I>) -> Option<Interval>
where
  I: Iterator<Item=Interval>
{
  advance_one(a, b, |i, j| i.lower() < j.lower())
}

// Advance the one with the lower upper bound.
fn advance_lub<I>(a: &mut Peekable<I>, b: &mut Peekable<I>) -> Option<Interval>
where
  I: Iterator<Item=Interval>
{
  advance_one(a, b, |i, j| i.upper() < j.upper())
}

impl Union for IntervalSet
{
  type Output = IntervalSet;

  fn union(&self, rhs: &IntervalSet) -> IntervalSet {
    let a = &mut self.intervals.iter().cloned().peekable();
    let b = &mut rhs.intervals.iter().cloned().peekable();
    let mut res = IntervalSet::empty();
    while let Some(lower) = advance_lower(a, b) {
      res.join_or_push(lower);
    }
    res.extend(a);
    res.extend(b);
    res
  }
}

// Returns `false` when one of the iterator is consumed.
// Iterators are not consumed if the intervals are already overlapping.
fn advance_to_first_overlapping<I>(a: &mut Peekable<I>, b: &mut Peekable<I>) -> bool
where
  I: Iterator<Item=Interval>
{
  loop {
    let overlapping = match (a.peek(), b.peek()) {
      (Some(i), Some(j)) => i.overlap(j),
      _ => return false
    };
    if overlapping {
      return true;
    }
    advance_lower(a, b);
  }
}

impl Intersection for IntervalSet
{
  type Output = IntervalSet;

  fn intersection(&self, rhs: &IntervalSet) -> IntervalSet {
    let a = &mut self.intervals.iter().cloned().peekable();
    let b = &mut rhs.intervals.iter().cloned().peekable();
    let mut res = IntervalSet::empty();
    while advance_to_first_overlapping(a, b) {
      if let (Some(i), Some(j)) = (a.peek(), b.peek()) {
        res.join_or_push(i.intersection(j));
      }
      advance_lub(a, b);
    }
    res
  }
}

impl Intersection<Interval> for IntervalSet
{
  type Output = IntervalSet;

  fn intersection(&self, rhs: &Interval) -> IntervalSet {
    self.intersection(&IntervalSet::from_interval(*rhs))
  }
}

impl Display for IntervalSet
{
  fn fmt(&self, formatter: &mut Formatter) -> Result<(), Error> {
    if self.is_empty() {
      return formatter.write_str("{}");
    }
    formatter.write_str("{")?;
    for (k, i) in self.intervals.iter().enumerate() {
      if k > 0 {
        formatter.write_str(", ")?;
      }
      formatter.write_fmt(format_args!("{}", i))?;
    }
    formatter.write_str("}")
  }
}
