// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Slice: the atomic piece of a tube.
//!
//! A slice encloses the unknown function over its time `domain` by the interval `envelope` and, at both ends of the domain, by the `input_gate` and `output_gate`. Every gate is shared with the neighbouring slice, the tube keeps the two copies equal.
//!
//! Knowing the derivative to lie in an interval `v` over the slice, the feasible values at time `τ` are bounded by two polygonal lines:
//!
//! ```text
//! U(τ) = min(in.ub + v.ub (τ - t0), out.ub - v.lb (t1 - τ), envelope.ub)
//! L(τ) = max(in.lb + v.lb (τ - t0), out.lb - v.ub (t1 - τ), envelope.lb)
//! ```
//!
//! These bounds are used to evaluate ("interpolate") the slice at any instant and to invert it. Without derivative information, `v` is the whole real line and the bounds reduce to the gates at the ends and the envelope inside.

use crate::interval::Interval;
use crate::ops::*;
use crate::rounding::*;
use crate::trajectory::Trajectory;
use gcollections::ops::*;
use std::fmt::{Display, Error, Formatter};

/// Stable identifier of a slice inside its tube; sampling never invalidates it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SliceId(pub(super) usize);

#[derive(Debug, Clone)]
pub struct Slice {
  pub(super) domain: Interval,
  pub(super) envelope: Interval,
  pub(super) input_gate: Interval,
  pub(super) output_gate: Interval,
  pub(super) prev: Option<SliceId>,
  pub(super) next: Option<SliceId>
}

impl Slice
{
  pub(super) fn new(domain: Interval, codomain: Interval) -> Slice {
    debug_assert!(!domain.is_empty() && domain.is_bounded() && !domain.is_degenerate(),
      "A slice domain must be bounded and non-degenerate.");
    Slice {
      domain,
      envelope: codomain,
      input_gate: codomain,
      output_gate: codomain,
      prev: None,
      next: None
    }
  }

  /// Overwrites the envelope and both gates.
  pub(super) fn set(&mut self, y: Interval) {
    self.envelope = y;
    self.input_gate = y;
    self.output_gate = y;
  }

  pub fn domain(&self) -> Interval {
    self.domain
  }

  pub fn envelope(&self) -> Interval {
    self.envelope
  }

  /// Enclosure of the values over the whole domain, gates included.
  pub fn codomain(&self) -> Interval {
    self.envelope
  }

  pub fn input_gate(&self) -> Interval {
    self.input_gate
  }

  pub fn output_gate(&self) -> Interval {
    self.output_gate
  }

  pub fn prev(&self) -> Option<SliceId> {
    self.prev
  }

  pub fn next(&self) -> Option<SliceId> {
    self.next
  }

  /// `diam(domain) * diam(envelope)`, infinite when the envelope is unbounded.
  pub fn volume(&self) -> f64 {
    if self.envelope.is_empty() { 0.0 }
    else { self.domain.diam() * self.envelope.diam() }
  }

  /// Value at `t`: the gate on a bound of the domain, the envelope inside, the empty set outside.
  pub fn eval(&self, t: f64) -> Interval {
    if t == self.domain.lower() { self.input_gate }
    else if t == self.domain.upper() { self.output_gate }
    else if self.domain.contains(&t) { self.envelope }
    else { Interval::empty() }
  }

  /// Value over `t`: a gate if `t` only touches the domain on a bound, the envelope otherwise.
  pub fn eval_over(&self, t: Interval) -> Interval {
    let t = t.intersection(&self.domain);
    if t.is_empty() { t }
    else if t.is_degenerate() { self.eval(t.lower()) }
    else { self.envelope }
  }

  pub fn is_interior_subset(&self, other: &Slice) -> bool {
    self.domain == other.domain
    && self.envelope.is_interior_subset(&other.envelope)
    && self.input_gate.is_interior_subset(&other.input_gate)
    && self.output_gate.is_interior_subset(&other.output_gate)
  }

  pub fn is_superset(&self, other: &Slice) -> bool {
    other.is_subset(self)
  }

  /// The trajectory is enclosed over the whole domain of the slice.
  pub fn contains(&self, traj: &Trajectory) -> bool {
    match traj.eval(self.domain) {
      Ok(values) => values.is_subset(&self.envelope)
        && self.input_gate.contains(&traj.value(self.domain.lower()))
        && self.output_gate.contains(&traj.value(self.domain.upper())),
      Err(_) => false
    }
  }

  /// Enclosure of the feasible values over `t` (clipped to the domain) of the functions whose derivative lies in `v`.
  pub fn interpol(&self, t: Interval, v: Interval) -> Interval {
    let t = t.intersection(&self.domain);
    if t.is_empty() || self.is_empty() || v.is_empty() {
      return Interval::empty();
    }
    let mut candidates = vec![];
    if self.is_finite_polygon(v) {
      candidates.push(Interval::singleton(t.lower()));
      candidates.push(Interval::singleton(t.upper()));
      if !v.is_degenerate() {
        let (x0, x1) = (self.input_gate, self.output_gate);
        let upper_delta = Interval::singleton(x1.upper()) - Interval::singleton(x0.upper());
        let lower_delta = Interval::singleton(x0.lower()) - Interval::singleton(x1.lower());
        candidates.push(self.crossing(v, upper_delta, v.lower()).intersection(&t));
        candidates.push(self.crossing(v, lower_delta, -v.upper()).intersection(&t));
      }
    }
    else {
      candidates.push(t);
    }
    let (lb, ub) = candidates.into_iter()
      .filter(|c| !c.is_empty())
      .fold((f64::INFINITY, f64::NEG_INFINITY), |(lb, ub), c| {
        (lb.min(self.lower_over(c, v)), ub.max(self.upper_over(c, v)))
      });
    Interval::new(lb.max(self.envelope.lower()), ub.min(self.envelope.upper()))
  }

  /// Over-approximation of the instants of `search` (clipped to the domain) at which a function of the slice with a derivative in `v` can take a value in `y`.
  pub fn invert(&self, y: Interval, v: Interval, search: Interval) -> Interval {
    let t = search.intersection(&self.domain);
    if t.is_empty() || y.is_empty() || v.is_empty() || self.is_empty()
     || !self.envelope.overlap(&y)
    {
      return Interval::empty();
    }
    let (t0, t1) = (self.domain.lower(), self.domain.upper());
    let (x0, x1) = (self.input_gate, self.output_gate);
    t.intersection(&solve_geq(v.upper(), t0, sub_down(y.lower(), x0.upper())))
     .intersection(&solve_geq(v.lower(), t1, sub_down(y.lower(), x1.upper())))
     .intersection(&solve_geq(-v.lower(), t0, sub_down(x0.lower(), y.upper())))
     .intersection(&solve_geq(-v.upper(), t1, sub_down(x1.lower(), y.upper())))
  }

  fn is_finite_polygon(&self, v: Interval) -> bool {
    self.input_gate.is_bounded() && self.output_gate.is_bounded() && v.is_bounded()
  }

  // Instant at which the two lines of a bound cross: `t0 + (delta - slope * dt) / (v.ub - v.lb)`.
  fn crossing(&self, v: Interval, delta: Interval, slope: f64) -> Interval {
    let t0 = Interval::singleton(self.domain.lower());
    let dt = Interval::singleton(self.domain.upper()) - t0;
    let width = Interval::singleton(v.upper()) - Interval::singleton(v.lower());
    t0 + (delta - dt * slope) / width
  }

  // Upper bound of `min(in.ub + v.ub (τ - t0), out.ub - v.lb (t1 - τ))` over `τ ∈ c`.
  fn upper_over(&self, c: Interval, v: Interval) -> f64 {
    let (t0, t1) = (self.domain.lower(), self.domain.upper());
    let a = v.upper();
    let d = if a >= 0.0 { sub_up(c.upper(), t0) } else { sub_down(c.lower(), t0) };
    let u1 = add_up(self.input_gate.upper(), mul_up(a, d));
    let b = -v.lower();
    let e = if b >= 0.0 { sub_up(t1, c.lower()) } else { sub_down(t1, c.upper()) };
    let u2 = add_up(self.output_gate.upper(), mul_up(b, e));
    u1.min(u2)
  }

  // Lower bound of `max(in.lb + v.lb (τ - t0), out.lb - v.ub (t1 - τ))` over `τ ∈ c`.
  fn lower_over(&self, c: Interval, v: Interval) -> f64 {
    let (t0, t1) = (self.domain.lower(), self.domain.upper());
    let a = v.lower();
    let d = if a >= 0.0 { sub_down(c.lower(), t0) } else { sub_up(c.upper(), t0) };
    let l1 = add_down(self.input_gate.lower(), mul_down(a, d));
    let b = -v.upper();
    let e = if b <= 0.0 { sub_up(t1, c.lower()) } else { sub_down(t1, c.upper()) };
    let l2 = add_down(self.output_gate.lower(), mul_down(b, e));
    l1.max(l2)
  }
}

// Over-approximation of `{τ | a (τ - t) >= r}`, `r` being already rounded down.
fn solve_geq(a: f64, t: f64, r: f64) -> Interval {
  if r == f64::NEG_INFINITY { Interval::whole() }
  else if a == 0.0 {
    if r <= 0.0 { Interval::whole() } else { Interval::empty() }
  }
  else if a == f64::INFINITY { Interval::new(t, f64::INFINITY) }
  else if a == f64::NEG_INFINITY { Interval::new(f64::NEG_INFINITY, t) }
  else if r == f64::INFINITY { Interval::empty() }
  else if a > 0.0 { Interval::new(add_down(t, div_down(r, a)), f64::INFINITY) }
  else { Interval::new(f64::NEG_INFINITY, add_up(t, div_up(r, a))) }
}

impl PartialEq for Slice
{
  fn eq(&self, other: &Slice) -> bool {
    self.domain == other.domain
    && self.envelope == other.envelope
    && self.input_gate == other.input_gate
    && self.output_gate == other.output_gate
  }
}

impl IsEmpty for Slice
{
  /// The envelope or one of the gates is empty.
  fn is_empty(&self) -> bool {
    self.envelope.is_empty() || self.input_gate.is_empty() || self.output_gate.is_empty()
  }
}

impl Subset for Slice
{
  fn is_subset(&self, other: &Slice) -> bool {
    self.domain == other.domain
    && self.envelope.is_subset(&other.envelope)
    && self.input_gate.is_subset(&other.input_gate)
    && self.output_gate.is_subset(&other.output_gate)
  }
}

impl ProperSubset for Slice
{
  fn is_proper_subset(&self, other: &Slice) -> bool {
    self.is_subset(other) && self != other
  }
}

impl Display for Slice
{
  fn fmt(&self, formatter: &mut Formatter) -> Result<(), Error> {
    write!(formatter, "Slice {}↦({}){}({})",
      self.domain, self.input_gate, self.envelope, self.output_gate)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn i(lb: f64, ub: f64) -> Interval {
    Interval::new(lb, ub)
  }

  fn slice(domain: Interval, input: Interval, envelope: Interval, output: Interval) -> Slice {
    let mut s = Slice::new(domain, envelope);
    s.input_gate = input;
    s.output_gate = output;
    s
  }

  #[test]
  fn accessors_test() {
    let s = slice(i(0.0, 2.0), i(0.0, 1.0), i(-1.0, 3.0), i(2.0, 3.0));
    assert_eq!(s.volume(), 8.0);
    assert_eq!(s.eval(0.0), i(0.0, 1.0));
    assert_eq!(s.eval(2.0), i(2.0, 3.0));
    assert_eq!(s.eval(1.0), i(-1.0, 3.0));
    assert!(s.eval(3.0).is_empty());
    assert_eq!(s.eval_over(i(2.0, 5.0)), i(2.0, 3.0));
    assert_eq!(s.eval_over(i(1.0, 5.0)), i(-1.0, 3.0));
    assert!(!s.is_empty());
    let mut e = s.clone();
    e.output_gate = Interval::empty();
    assert!(e.is_empty());
    assert_eq!(format!("{}", slice(i(0.0, 1.0), i(0.0, 0.0), i(0.0, 1.0), i(1.0, 1.0))),
      "Slice [0, 1]↦([0, 0])[0, 1]([1, 1])");
  }

  #[test]
  fn comparison_test() {
    let big = slice(i(0.0, 1.0), i(-2.0, 2.0), i(-2.0, 2.0), i(-2.0, 2.0));
    let small = slice(i(0.0, 1.0), i(-1.0, 1.0), i(-1.0, 1.0), i(-1.0, 1.0));
    let shifted = slice(i(0.0, 2.0), i(-1.0, 1.0), i(-1.0, 1.0), i(-1.0, 1.0));
    assert!(small.is_subset(&big));
    assert!(small.is_proper_subset(&big));
    assert!(small.is_interior_subset(&big));
    assert!(big.is_superset(&small));
    assert!(!big.is_subset(&small));
    assert!(!small.is_subset(&shifted));
    assert!(small == small.clone());
  }

  #[test]
  fn interpol_without_derivative() {
    let s = slice(i(0.0, 1.0), i(0.0, 0.5), i(-1.0, 1.0), i(0.5, 1.0));
    assert_eq!(s.interpol(i(0.0, 0.0), Interval::whole()), i(0.0, 0.5));
    assert_eq!(s.interpol(i(1.0, 1.0), Interval::whole()), i(0.5, 1.0));
    assert_eq!(s.interpol(i(0.2, 0.8), Interval::whole()), i(-1.0, 1.0));
  }

  #[test]
  fn interpol_with_derivative() {
    // x(0) = 0, x(2) in [0, 4], x' in [0, 1].
    let s = slice(i(0.0, 2.0), i(0.0, 0.0), i(-10.0, 10.0), i(0.0, 4.0));
    let v = i(0.0, 1.0);
    let x1 = s.interpol(i(1.0, 1.0), v);
    assert!(x1.lower() <= 0.0 && x1.lower() > -1e-12);
    assert!(x1.upper() >= 1.0 && x1.upper() < 1.0 + 1e-12);
    let all = s.interpol(s.domain(), v);
    assert!(all.is_superset(&i(0.0, 2.0)) && all.diam() < 2.0 + 1e-12);

    // Both gates constrain the upper bound: the peak is reached at the crossing of the two lines.
    let s = slice(i(0.0, 2.0), i(0.0, 0.0), i(-10.0, 10.0), i(0.0, 0.0));
    let v = i(-1.0, 1.0);
    let peak = s.interpol(s.domain(), v);
    assert!(peak.is_superset(&i(-1.0, 1.0)) && peak.diam() < 2.0 + 1e-12);
    let inconsistent = slice(i(0.0, 1.0), i(0.0, 0.0), i(-10.0, 10.0), i(5.0, 5.0));
    assert!(inconsistent.interpol(i(0.5, 0.5), i(-1.0, 1.0)).is_empty());
  }

  #[test]
  fn invert_test() {
    let s = slice(i(0.0, 1.0), i(0.0, 1.0), i(0.0, 1.0), i(0.0, 1.0));
    assert!(s.invert(i(2.0, 3.0), Interval::whole(), Interval::whole()).is_empty());
    assert_eq!(s.invert(i(0.5, 3.0), Interval::whole(), Interval::whole()), i(0.0, 1.0));
    assert_eq!(s.invert(i(0.5, 3.0), Interval::whole(), i(0.25, 4.0)), i(0.25, 1.0));

    // x(0) = 0, x' in [1, 2]: x(τ) >= τ, so x(τ) <= 0.5 requires τ <= 0.5.
    let s = slice(i(0.0, 2.0), i(0.0, 0.0), i(0.0, 4.0), i(2.0, 4.0));
    let t = s.invert(i(0.0, 0.5), i(1.0, 2.0), Interval::whole());
    assert!(t.lower() == 0.0);
    assert!(t.upper() >= 0.5 && t.upper() < 0.5 + 1e-12);
    // x(τ) <= 2τ, so x(τ) >= 3 requires τ >= 1.5.
    let t = s.invert(i(3.0, 10.0), i(1.0, 2.0), Interval::whole());
    assert!(t.lower() <= 1.5 && t.lower() > 1.5 - 1e-12);
    assert_eq!(t.upper(), 2.0);
  }

  #[test]
  fn contains_test() {
    let s = slice(i(0.0, 1.0), i(0.0, 0.0), i(0.0, 1.0), i(1.0, 1.0));
    let inside = Trajectory::new(vec![(0.0, 0.0), (1.0, 1.0)]);
    let outside = Trajectory::new(vec![(0.0, 0.0), (0.5, 1.5), (1.0, 1.0)]);
    let short = Trajectory::new(vec![(0.0, 0.0), (0.5, 0.5)]);
    assert!(s.contains(&inside));
    assert!(!s.contains(&outside));
    assert!(!s.contains(&short));
  }
}
