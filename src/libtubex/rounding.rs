// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Directed rounding of the four basic floating-point operations.
//!
//! The hardware rounds to nearest. Rather than switching the rounding mode, each operation computes its nearest result together with the exact rounding error (error-free transformations: `TwoSum` for additions, fused multiply-add for products and quotients) and steps one ulp away when the exact result lies on the wrong side. The results are therefore the tightest representable bounds, and exact operations are left untouched.

/// Smallest float strictly greater than `x`.
pub fn next_up(x: f64) -> f64 {
  if x.is_nan() || x == f64::INFINITY {
    x
  }
  else if x == 0.0 {
    f64::from_bits(1)
  }
  else if x > 0.0 {
    f64::from_bits(x.to_bits() + 1)
  }
  else {
    f64::from_bits(x.to_bits() - 1)
  }
}

/// Greatest float strictly smaller than `x`.
pub fn next_down(x: f64) -> f64 {
  -next_up(-x)
}

// `exact` was rounded to `r`; `err` has the sign of `exact - r`.
fn down(r: f64, err: f64) -> f64 {
  if err < 0.0 { next_down(r) } else { r }
}

fn up(r: f64, err: f64) -> f64 {
  if err > 0.0 { next_up(r) } else { r }
}

// Overflow to an infinity is only sound on the side it points to.
fn finite_down(r: f64, a: f64, b: f64) -> Option<f64> {
  if r.is_finite() { None }
  else if r == f64::INFINITY && a.is_finite() && b.is_finite() { Some(f64::MAX) }
  else { Some(r) }
}

fn finite_up(r: f64, a: f64, b: f64) -> Option<f64> {
  if r.is_finite() { None }
  else if r == f64::NEG_INFINITY && a.is_finite() && b.is_finite() { Some(f64::MIN) }
  else { Some(r) }
}

fn two_sum_err(a: f64, b: f64, s: f64) -> f64 {
  let bb = s - a;
  (a - (s - bb)) + (b - bb)
}

pub fn add_down(a: f64, b: f64) -> f64 {
  let s = a + b;
  finite_down(s, a, b).unwrap_or_else(|| down(s, two_sum_err(a, b, s)))
}

pub fn add_up(a: f64, b: f64) -> f64 {
  let s = a + b;
  finite_up(s, a, b).unwrap_or_else(|| up(s, two_sum_err(a, b, s)))
}

pub fn sub_down(a: f64, b: f64) -> f64 {
  add_down(a, -b)
}

pub fn sub_up(a: f64, b: f64) -> f64 {
  add_up(a, -b)
}

// By convention of interval arithmetic, `0 * oo = 0`.
fn product(a: f64, b: f64) -> f64 {
  if a == 0.0 || b == 0.0 { 0.0 } else { a * b }
}

pub fn mul_down(a: f64, b: f64) -> f64 {
  let p = product(a, b);
  finite_down(p, a, b).unwrap_or_else(|| down(p, a.mul_add(b, -p)))
}

pub fn mul_up(a: f64, b: f64) -> f64 {
  let p = product(a, b);
  finite_up(p, a, b).unwrap_or_else(|| up(p, a.mul_add(b, -p)))
}

// `a - q * b` is exact, so the sign of the quotient error is the sign of `(a - q * b) / b`.
fn quotient_err(a: f64, b: f64, q: f64) -> f64 {
  let r = (-q).mul_add(b, a);
  if r == 0.0 { 0.0 }
  else if (r < 0.0) == (b < 0.0) { 1.0 }
  else { -1.0 }
}

pub fn div_down(a: f64, b: f64) -> f64 {
  let q = a / b;
  finite_down(q, a, b).unwrap_or_else(|| {
    if b.is_finite() { down(q, quotient_err(a, b, q)) } else { q }
  })
}

pub fn div_up(a: f64, b: f64) -> f64 {
  let q = a / b;
  finite_up(q, a, b).unwrap_or_else(|| {
    if b.is_finite() { up(q, quotient_err(a, b, q)) } else { q }
  })
}
