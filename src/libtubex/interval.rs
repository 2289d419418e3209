// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Closed interval of reals with outward-rounded arithmetic.
//!
//! An interval `[a..b]` is the set of reals `{x | a <= x <= b}`, possibly unbounded on either side. Every arithmetic operation returns an interval guaranteed to contain all the results of the real operation on members of the operands: bounds are rounded outward (see the [rounding module](../rounding/index.html)).
//!
//! The empty set is stored as `[+oo..-oo]`, any constructor receiving `lb > ub` (or an "infinite singleton" such as `[+oo..+oo]`) normalizes its result to this representation. Therefore the derived equality is the set equality.
//!
//! # Examples
//!
//! ```rust
//! use tubex::prelude::*;
//!
//! let a = Interval::new(1.0, 2.0);
//! let b = Interval::new(-1.0, 3.0);
//! assert_eq!(a + b, Interval::new(0.0, 5.0));
//! assert!(a.is_subset(&b));
//! assert_eq!(a.intersection(&Interval::new(4.0, 5.0)), Interval::empty());
//! assert_eq!(Interval::new(1.0, 0.0), Interval::empty());
//! ```

use crate::error::*;
use crate::ops::*;
use crate::rounding::*;
use gcollections::kind::*;
use gcollections::ops::*;
use num_traits::{One, Zero};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt::{Display, Error, Formatter};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Interval {
  lb: f64,
  ub: f64
}

impl Interval
{
  /// `[0..+oo]`
  pub fn pos_reals() -> Interval {
    Interval::new(0.0, f64::INFINITY)
  }

  /// `[-oo..0]`
  pub fn neg_reals() -> Interval {
    Interval::new(f64::NEG_INFINITY, 0.0)
  }

  pub fn is_degenerate(&self) -> bool {
    self.is_singleton()
  }

  pub fn is_unbounded(&self) -> bool {
    !self.is_empty() && (self.lb == f64::NEG_INFINITY || self.ub == f64::INFINITY)
  }

  pub fn is_bounded(&self) -> bool {
    !self.is_unbounded()
  }

  /// Midpoint of the interval; `NaN` for the empty set and the largest finite float of the right sign for half-lines.
  pub fn mid(&self) -> f64 {
    if self.is_empty() { f64::NAN }
    else if self.lb == f64::NEG_INFINITY {
      if self.ub == f64::INFINITY { 0.0 } else { f64::MIN }
    }
    else if self.ub == f64::INFINITY { f64::MAX }
    else {
      let m = 0.5 * self.lb + 0.5 * self.ub;
      m.max(self.lb).min(self.ub)
    }
  }

  /// `x` lies in the interior of the interval.
  pub fn interior_contains(&self, x: f64) -> bool {
    self.lb < x && x < self.ub
  }

  pub fn is_superset(&self, other: &Interval) -> bool {
    other.is_subset(self)
  }

  /// The interval is included in the interior of `other`. The empty set is an interior subset of any interval.
  pub fn is_interior_subset(&self, other: &Interval) -> bool {
    if self.is_empty() { true }
    else if other.is_empty() { false }
    else {
      (other.lb == f64::NEG_INFINITY || other.lb < self.lb)
      && (other.ub == f64::INFINITY || self.ub < other.ub)
    }
  }

  /// Widens both bounds by `rad`, which must be non-negative.
  pub fn inflate(&self, rad: f64) -> Interval {
    debug_assert!(rad >= 0.0, "Inflation radius must be non-negative.");
    if self.is_empty() { *self }
    else {
      Interval::new(sub_down(self.lb, rad), add_up(self.ub, rad))
    }
  }

  /// Splits the interval at `lb + ratio * diam` (at the midpoint when unbounded). `ratio` lies in `]0..1[`.
  pub fn bisect(&self, ratio: f64) -> Result<(Interval, Interval)> {
    debug_assert!(ratio > 0.0 && ratio < 1.0, "Bisection ratio must lie in ]0,1[.");
    if self.is_empty() || self.is_degenerate() {
      return Err(TubeError::DegenerateBisection(*self));
    }
    let pt =
      if self.is_unbounded() { self.mid() }
      else { self.lb + ratio * (self.ub - self.lb) };
    let pt = pt.max(self.lb).min(self.ub);
    Ok((Interval::new(self.lb, pt), Interval::new(pt, self.ub)))
  }

  pub fn sqr(&self) -> Interval {
    if self.is_empty() { *self }
    else if self.lb >= 0.0 {
      Interval::new(mul_down(self.lb, self.lb), mul_up(self.ub, self.ub))
    }
    else if self.ub <= 0.0 {
      Interval::new(mul_down(self.ub, self.ub), mul_up(self.lb, self.lb))
    }
    else {
      let m = (-self.lb).max(self.ub);
      Interval::new(0.0, mul_up(m, m))
    }
  }

  pub fn abs(&self) -> Interval {
    if self.is_empty() { *self }
    else if self.lb >= 0.0 { *self }
    else if self.ub <= 0.0 { -*self }
    else { Interval::new(0.0, (-self.lb).max(self.ub)) }
  }

  pub fn exp(&self) -> Interval {
    if self.is_empty() { *self }
    else {
      Interval::new(
        widen_down(self.lb.exp()).max(0.0),
        widen_up(self.ub.exp()))
    }
  }

  pub fn cos(&self) -> Interval {
    if self.is_empty() { return *self; }
    if self.is_unbounded() || self.diam() >= 2.0 * PI {
      return Interval::new(-1.0, 1.0);
    }
    let (c_lb, c_ub) = (self.lb.cos(), self.ub.cos());
    let mut lb = widen_down(c_lb.min(c_ub));
    let mut ub = widen_up(c_lb.max(c_ub));
    // Extrema are reached at multiples of `pi`, the test is loosened by a few ulps so that an uncertain extremum is kept.
    let (a, b) = (widen_down(self.lb / PI), widen_up(self.ub / PI));
    let k = a.ceil();
    if k <= b {
      if (k as i64).rem_euclid(2) == 0 { ub = 1.0; } else { lb = -1.0; }
      if k + 1.0 <= b { lb = -1.0; ub = 1.0; }
    }
    Interval::new(lb.max(-1.0), ub.min(1.0))
  }

  pub fn sin(&self) -> Interval {
    (*self - Interval::new(FRAC_PI_2, next_up(FRAC_PI_2))).cos()
  }
}

// Elementary functions are correct to within one ulp, two are added for safety.
fn widen_down(x: f64) -> f64 {
  next_down(next_down(x))
}

fn widen_up(x: f64) -> f64 {
  next_up(next_up(x))
}

impl Collection for Interval
{
  type Item = f64;
}

impl Range for Interval
{
  fn new(lb: f64, ub: f64) -> Interval {
    if lb.is_nan() || ub.is_nan() || lb > ub
     || lb == f64::INFINITY || ub == f64::NEG_INFINITY
    {
      Interval::empty()
    }
    else {
      Interval { lb, ub }
    }
  }
}

impl Bounded for Interval
{
  /// `+oo` for the empty set.
  fn lower(&self) -> f64 {
    self.lb
  }

  /// `-oo` for the empty set.
  fn upper(&self) -> f64 {
    self.ub
  }
}

impl Singleton for Interval
{
  fn singleton(x: f64) -> Interval {
    Interval::new(x, x)
  }
}

impl Empty for Interval
{
  fn empty() -> Interval {
    Interval { lb: f64::INFINITY, ub: f64::NEG_INFINITY }
  }
}

impl Whole for Interval
{
  fn whole() -> Interval {
    Interval { lb: f64::NEG_INFINITY, ub: f64::INFINITY }
  }
}

impl IsSingleton for Interval
{
  fn is_singleton(&self) -> bool {
    self.lb == self.ub
  }
}

impl IsEmpty for Interval
{
  fn is_empty(&self) -> bool {
    self.lb > self.ub
  }
}

impl Diameter for Interval
{
  fn diam(&self) -> f64 {
    if self.is_empty() { 0.0 }
    else { sub_up(self.ub, self.lb) }
  }
}

impl Contains for Interval
{
  fn contains(&self, value: &f64) -> bool {
    self.lb <= *value && *value <= self.ub
  }
}

impl Subset for Interval
{
  fn is_subset(&self, other: &Interval) -> bool {
    if self.is_empty() { true }
    else {
      other.lb <= self.lb && self.ub <= other.ub
    }
  }
}

impl ProperSubset for Interval
{
  fn is_proper_subset(&self, other: &Interval) -> bool {
    self.is_subset(other) && self != other
  }
}

impl Intersection for Interval
{
  type Output = Interval;
  fn intersection(&self, other: &Interval) -> Interval {
    Interval::new(self.lb.max(other.lb), self.ub.min(other.ub))
  }
}

impl Intersection<f64> for Interval
{
  type Output = Interval;
  fn intersection(&self, value: &f64) -> Interval {
    if self.contains(value) { Interval::singleton(*value) }
    else { Interval::empty() }
  }
}

impl Hull for Interval
{
  type Output = Interval;
  fn hull(&self, other: &Interval) -> Interval {
    if self.is_empty() { *other }
    else if other.is_empty() { *self }
    else {
      Interval::new(self.lb.min(other.lb), self.ub.max(other.ub))
    }
  }
}

impl Hull<f64> for Interval
{
  type Output = Interval;
  fn hull(&self, value: &f64) -> Interval {
    self.hull(&Interval::singleton(*value))
  }
}

impl Overlap for Interval
{
  fn overlap(&self, other: &Interval) -> bool {
    !self.intersection(other).is_empty()
  }
}

impl Disjoint for Interval
{
  fn is_disjoint(&self, other: &Interval) -> bool {
    !self.overlap(other)
  }
}

impl Display for Interval
{
  fn fmt(&self, formatter: &mut Formatter) -> std::result::Result<(), Error> {
    if self.is_empty() {
      formatter.write_str("[ empty ]")
    }
    else {
      formatter.write_fmt(format_args!("[{}, {}]", self.lb, self.ub))
    }
  }
}

impl Serialize for Interval
{
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: Serializer
  {
    if self.is_empty() {
      serializer.serialize_none()
    }
    else {
      serializer.serialize_some(&(self.lb, self.ub))
    }
  }
}

impl<'de> Deserialize<'de> for Interval
{
  fn deserialize<D>(deserializer: D) -> std::result::Result<Interval, D::Error>
  where
    D: Deserializer<'de>
  {
    match Option::<(f64, f64)>::deserialize(deserializer)? {
      Some((lb, ub)) => Ok(Interval::new(lb, ub)),
      None => Ok(Interval::empty())
    }
  }
}

impl Neg for Interval
{
  type Output = Interval;
  fn neg(self) -> Interval {
    if self.is_empty() { self }
    else { Interval::new(-self.ub, -self.lb) }
  }
}

impl Add for Interval
{
  type Output = Interval;
  fn add(self, other: Interval) -> Interval {
    if self.is_empty() || other.is_empty() { Interval::empty() }
    else {
      Interval::new(add_down(self.lb, other.lb), add_up(self.ub, other.ub))
    }
  }
}

impl Sub for Interval
{
  type Output = Interval;
  fn sub(self, other: Interval) -> Interval {
    if self.is_empty() || other.is_empty() { Interval::empty() }
    else {
      Interval::new(sub_down(self.lb, other.ub), sub_up(self.ub, other.lb))
    }
  }
}

impl Mul for Interval
{
  type Output = Interval;
  fn mul(self, other: Interval) -> Interval {
    if self.is_empty() || other.is_empty() { return Interval::empty(); }
    let corners = [
      (self.lb, other.lb), (self.lb, other.ub),
      (self.ub, other.lb), (self.ub, other.ub)];
    let lb = corners.iter().map(|&(a, b)| mul_down(a, b)).fold(f64::INFINITY, f64::min);
    let ub = corners.iter().map(|&(a, b)| mul_up(a, b)).fold(f64::NEG_INFINITY, f64::max);
    Interval::new(lb, ub)
  }
}

impl Div for Interval
{
  type Output = Interval;
  fn div(self, other: Interval) -> Interval {
    if self.is_empty() || other.is_empty()
     || (other.lb == 0.0 && other.ub == 0.0)
    {
      Interval::empty()
    }
    else if !other.contains(&0.0) {
      let inv = Interval::new(div_down(1.0, other.ub), div_up(1.0, other.lb));
      self * inv
    }
    // Extended division, `other` contains zero.
    else if self.contains(&0.0) { Interval::whole() }
    else if other.lb == 0.0 {
      if self.lb > 0.0 { Interval::new(div_down(self.lb, other.ub), f64::INFINITY) }
      else { Interval::new(f64::NEG_INFINITY, div_up(self.ub, other.ub)) }
    }
    else if other.ub == 0.0 {
      if self.lb > 0.0 { Interval::new(f64::NEG_INFINITY, div_up(self.lb, other.lb)) }
      else { Interval::new(div_down(self.ub, other.lb), f64::INFINITY) }
    }
    else { Interval::whole() }
  }
}

macro_rules! scalar_arithmetics
{
  ( $( $op_trait:ident, $op:ident, $assign_trait:ident, $assign_op:ident );* ) => {$(
    impl $op_trait<f64> for Interval
    {
      type Output = Interval;
      fn $op(self, other: f64) -> Interval {
        self.$op(Interval::singleton(other))
      }
    }

    impl $op_trait<Interval> for f64
    {
      type Output = Interval;
      fn $op(self, other: Interval) -> Interval {
        Interval::singleton(self).$op(other)
      }
    }

    impl $assign_trait for Interval
    {
      fn $assign_op(&mut self, other: Interval) {
        *self = self.$op(other);
      }
    }

    impl $assign_trait<f64> for Interval
    {
      fn $assign_op(&mut self, other: f64) {
        *self = self.$op(other);
      }
    }
  )*}
}

scalar_arithmetics!(
  Add, add, AddAssign, add_assign;
  Sub, sub, SubAssign, sub_assign;
  Mul, mul, MulAssign, mul_assign;
  Div, div, DivAssign, div_assign
);

impl Zero for Interval
{
  fn zero() -> Interval {
    Interval::singleton(0.0)
  }

  fn is_zero(&self) -> bool {
    self.lb == 0.0 && self.ub == 0.0
  }
}

impl One for Interval
{
  fn one() -> Interval {
    Interval::singleton(1.0)
  }
}

#[allow(non_upper_case_globals)]
#[cfg(test)]
mod tests {
  use super::*;
  use serde_test::{assert_tokens, Token};

  const INF: f64 = f64::INFINITY;

  fn i(lb: f64, ub: f64) -> Interval {
    Interval::new(lb, ub)
  }

  fn encloses(result: Interval, lb: f64, ub: f64) -> bool {
    result.lower() <= lb && ub <= result.upper()
  }

  #[test]
  fn normalization_test() {
    let cases = vec![
      (i(1.0, 0.0), true),
      (i(INF, INF), true),
      (i(-INF, -INF), true),
      (i(f64::NAN, 1.0), true),
      (i(0.0, 0.0), false),
      (i(-INF, INF), false)
    ];
    for (x, empty) in cases {
      assert!(x.is_empty() == empty, "{:?}.is_empty() should be {}", x, empty);
      if empty {
        assert_eq!(x, Interval::empty());
      }
    }
    assert_eq!(Interval::whole(), i(-INF, INF));
    assert_eq!(Interval::pos_reals(), i(0.0, INF));
    assert_eq!(Interval::neg_reals(), i(-INF, 0.0));
  }

  #[test]
  fn classification_test() {
    assert!(Interval::singleton(3.0).is_degenerate());
    assert!(!i(0.0, 1.0).is_degenerate());
    assert!(Interval::pos_reals().is_unbounded());
    assert!(!Interval::empty().is_unbounded());
    assert!(i(0.0, 1.0).is_bounded());
    assert_eq!(i(-1.0, 3.0).diam(), 4.0);
    assert_eq!(i(-1.0, 3.0).rad(), 2.0);
    assert_eq!(i(-1.0, 3.0).mid(), 1.0);
    assert_eq!(Interval::whole().mid(), 0.0);
    assert_eq!(Interval::pos_reals().mid(), f64::MAX);
    assert_eq!(Interval::whole().diam(), INF);
    assert_eq!(Interval::empty().diam(), 0.0);
    assert!(Interval::empty().mid().is_nan());
  }

  #[test]
  fn set_operations_test() {
    let i0_10 = i(0.0, 10.0);
    let i5_15 = i(5.0, 15.0);
    let i20_30 = i(20.0, 30.0);
    assert_eq!(i0_10.intersection(&i5_15), i(5.0, 10.0));
    assert_eq!(i0_10.intersection(&i20_30), Interval::empty());
    assert_eq!(i0_10.intersection(&3.0), Interval::singleton(3.0));
    assert_eq!(i0_10.hull(&i20_30), i(0.0, 30.0));
    assert_eq!(Interval::empty().hull(&i5_15), i5_15);
    assert!(i0_10.overlap(&i5_15));
    assert!(i0_10.is_disjoint(&i20_30));
    assert!(i(10.0, 10.0).overlap(&i0_10));
    assert!(i(1.0, 2.0).is_subset(&i0_10));
    assert!(i0_10.is_superset(&i(1.0, 2.0)));
    assert!(i0_10.is_subset(&i0_10));
    assert!(!i0_10.is_proper_subset(&i0_10));
    assert!(Interval::empty().is_subset(&Interval::empty()));
    assert!(i(1.0, 2.0).is_interior_subset(&i0_10));
    assert!(!i(0.0, 2.0).is_interior_subset(&i0_10));
    assert!(i(0.0, 2.0).is_interior_subset(&Interval::whole()));
    assert!(i0_10.contains(&10.0));
    assert!(!i0_10.interior_contains(10.0));
    assert!(i0_10.interior_contains(5.0));
    assert_eq!(i(1.0, 2.0).inflate(1.0), i(0.0, 3.0));
  }

  #[test]
  fn arithmetic_test() {
    let cases = vec![
      (i(1.0, 2.0), i(3.0, 4.0), i(4.0, 6.0), i(-3.0, -1.0), i(3.0, 8.0)),
      (i(-1.0, 2.0), i(-3.0, 4.0), i(-4.0, 6.0), i(-5.0, 5.0), i(-6.0, 8.0)),
      (i(0.0, 0.0), Interval::whole(), Interval::whole(), Interval::whole(), i(0.0, 0.0)),
      (Interval::empty(), i(1.0, 2.0), Interval::empty(), Interval::empty(), Interval::empty()),
      (i(1.0, INF), i(2.0, 3.0), i(3.0, INF), i(-2.0, INF), i(2.0, INF))
    ];
    for (x, y, sum, diff, prod) in cases {
      assert!(x + y == sum, "{} + {} = {} (expected {})", x, y, x + y, sum);
      assert!(x - y == diff, "{} - {} = {} (expected {})", x, y, x - y, diff);
      assert!(x * y == prod, "{} * {} = {} (expected {})", x, y, x * y, prod);
    }
    assert_eq!(-i(1.0, 2.0), i(-2.0, -1.0));
    assert_eq!(i(1.0, 2.0) * 2.0, i(2.0, 4.0));
    assert_eq!(2.0 + i(1.0, 2.0), i(3.0, 4.0));
    let mut x = i(1.0, 2.0);
    x += 1.0;
    x *= i(-1.0, 1.0);
    assert_eq!(x, i(-3.0, 3.0));
  }

  #[test]
  fn outward_rounding_test() {
    let third = i(1.0, 1.0) / 3.0;
    assert!(third.lower() < third.upper());
    assert!(third.lower() <= 1.0 / 3.0 && 1.0 / 3.0 <= third.upper());
    let s = i(0.1, 0.1) + i(0.2, 0.2);
    assert!(s.contains(&(0.1 + 0.2)));
    assert!(!s.is_degenerate());
  }

  #[test]
  fn division_test() {
    let cases = vec![
      (i(1.0, 2.0), i(1.0, 2.0), i(0.5, 2.0)),
      (i(1.0, 2.0), i(0.0, 0.0), Interval::empty()),
      (i(1.0, 2.0), i(0.0, 2.0), i(0.5, INF)),
      (i(-2.0, -1.0), i(0.0, 2.0), i(-INF, -0.5)),
      (i(1.0, 2.0), i(-2.0, 0.0), i(-INF, -0.5)),
      (i(-2.0, -1.0), i(-2.0, 0.0), i(0.5, INF)),
      (i(1.0, 2.0), i(-1.0, 1.0), Interval::whole()),
      (i(-1.0, 2.0), i(0.0, 1.0), Interval::whole()),
      (i(1.0, INF), i(1.0, INF), i(0.0, INF))
    ];
    for (x, y, expected) in cases {
      let r = x / y;
      assert!(r == expected, "{} / {} = {} (expected {})", x, y, r, expected);
    }
  }

  #[test]
  fn elementary_functions_test() {
    assert_eq!(i(-2.0, 1.0).sqr(), i(0.0, 4.0));
    assert_eq!(i(-3.0, -2.0).sqr(), i(4.0, 9.0));
    assert_eq!(i(-3.0, 2.0).abs(), i(0.0, 3.0));
    assert_eq!(i(-3.0, -2.0).abs(), i(2.0, 3.0));

    let c = i(0.0, 0.1).cos();
    assert!(c.upper() == 1.0 && encloses(c, 0.1f64.cos(), 1.0));
    let c = i(3.0, 3.5).cos();
    assert!(c.lower() == -1.0);
    let c = i(1.0, 2.0).cos();
    assert!(encloses(c, 2.0f64.cos(), 1.0f64.cos()));
    assert!(c.diam() < 1.0);
    assert_eq!(i(0.0, 7.0).cos(), i(-1.0, 1.0));
    assert_eq!(Interval::whole().sin(), i(-1.0, 1.0));

    let s = i(1.0, 2.0).sin();
    assert!(s.upper() == 1.0 && encloses(s, 1.0f64.sin(), 1.0));
    let s = i(3.125, 3.125).sin();
    assert!(s.contains(&3.125f64.sin()));

    let e = i(0.0, 1.0).exp();
    assert!(encloses(e, 1.0, std::f64::consts::E));
    assert_eq!(i(-INF, 0.0).exp().lower(), 0.0);
  }

  #[test]
  fn bisect_test() {
    assert_eq!(i(0.0, 4.0).bisect(0.5).unwrap(), (i(0.0, 2.0), i(2.0, 4.0)));
    assert_eq!(i(0.0, 4.0).bisect(0.25).unwrap(), (i(0.0, 1.0), i(1.0, 4.0)));
    let (l, r) = Interval::whole().bisect(0.5).unwrap();
    assert_eq!(l.hull(&r), Interval::whole());
    assert!(Interval::singleton(1.0).bisect(0.5).is_err());
    assert!(Interval::empty().bisect(0.5).is_err());
  }

  #[test]
  fn matrix_scalar_test() {
    assert!(Interval::zero().is_zero());
    assert_eq!(Interval::one() * i(2.0, 3.0), i(2.0, 3.0));
  }

  #[test]
  fn display_test() {
    assert_eq!(format!("{}", i(1.0, 2.5)), "[1, 2.5]");
    assert_eq!(format!("{}", Interval::empty()), "[ empty ]");
  }

  #[test]
  fn serde_test() {
    assert_tokens(&i(1.0, 2.0), &[
      Token::Some,
      Token::Tuple { len: 2 },
      Token::F64(1.0),
      Token::F64(2.0),
      Token::TupleEnd
    ]);
    assert_tokens(&Interval::empty(), &[Token::None]);
  }
}
