// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Linear observer contractor: `x' = A x + b u` in the plane.
//!
//! Gates are handled as convex polygons, much tighter than boxes for the correlated components of a linear flow. Over a slice of width `dt`, the flow maps the gate polygon by `exp(A dt)` and adds an input term enclosed in `dt * exp(A [0, dt]) b u`. The matrix exponential is given by the caller as an interval enclosure.
//!
//! Polygons are simplified to a bounded number of vertices after each update.

use crate::ctc::*;
use crate::geometry::*;
use crate::interval::Interval;
use crate::ops::*;
use crate::tube::{Tube, TubeVector};
use gcollections::ops::*;
use log::{debug, trace};
use nalgebra::{Matrix2, Vector2};
use std::fmt::{Debug, Formatter};

/// Enclosure of `exp(A t)` over the time interval `t`.
pub type ExpAt = Box<dyn Fn(&Matrix2<f64>, Interval) -> Matrix2<Interval>>;

pub const DEFAULT_MAX_VERTICES: usize = 15;

pub struct CtcLinobs {
  a: Matrix2<f64>,
  b: Vector2<f64>,
  exp_at: ExpAt,
  max_vertices: usize
}

impl CtcLinobs
{
  pub fn new<F>(a: Matrix2<f64>, b: Vector2<f64>, exp_at: F) -> CtcLinobs
  where
    F: Fn(&Matrix2<f64>, Interval) -> Matrix2<Interval> + 'static
  {
    CtcLinobs { a, b, exp_at: Box::new(exp_at), max_vertices: DEFAULT_MAX_VERTICES }
  }

  pub fn with_max_vertices(self, max_vertices: usize) -> CtcLinobs {
    CtcLinobs { max_vertices, ..self }
  }

  pub fn max_vertices(&self) -> usize {
    self.max_vertices
  }

  /// Narrows the gate polygon `p_k` with the image of `p_prev` by the flow over `dt`, `u` enclosing the input over the slice.
  pub fn ctc_fwd_gate(&self, p_k: &ConvexPolygon, p_prev: &ConvexPolygon, dt: f64, u: Interval) -> ConvexPolygon {
    p_k.intersect(&self.flow_fwd(p_prev, dt, u)).simplify(self.max_vertices)
  }

  /// Narrows the gate polygon `p_k` with the preimage of `p_next` by the flow over `dt`.
  pub fn ctc_bwd_gate(&self, p_k: &ConvexPolygon, p_next: &ConvexPolygon, dt: f64, u: Interval) -> ConvexPolygon {
    p_k.intersect(&self.flow_bwd(p_next, dt, u)).simplify(self.max_vertices)
  }

  /// Polygon enclosing the states reachable within `dt` from `p_k`.
  pub fn polygon_envelope(&self, p_k: &ConvexPolygon, dt: f64, u: Interval) -> ConvexPolygon {
    let t = Interval::new(0.0, dt);
    self.flow(p_k, t, t, t, u).simplify(self.max_vertices)
  }

  // Image of `p` by `exp(A t) p + elapsed * exp(A s) b u`.
  fn flow(&self, p: &ConvexPolygon, t: Interval, s: Interval, elapsed: Interval, u: Interval) -> ConvexPolygon {
    if p.is_empty() || u.is_empty() {
      return ConvexPolygon::default();
    }
    let m = (self.exp_at)(&self.a, t);
    let e = (self.exp_at)(&self.a, s);
    let (b0, b1) = (Interval::singleton(self.b[0]), Interval::singleton(self.b[1]));
    let dx = elapsed * (e[(0, 0)] * b0 + e[(0, 1)] * b1) * u;
    let dy = elapsed * (e[(1, 0)] * b0 + e[(1, 1)] * b1) * u;
    ConvexPolygon::new(p.vertices().iter()
      .map(|v| Point::new(
        m[(0, 0)] * v.x() + m[(0, 1)] * v.y() + dx,
        m[(1, 0)] * v.x() + m[(1, 1)] * v.y() + dy))
      .collect())
  }

  /// One forward and one backward sweep over the gates of `x`, then a narrowing of the envelopes. `x` has two components sharing the slicing of the input `u`.
  pub fn contract_tubes(&self, x: &mut TubeVector, u: &Tube) -> Result<bool> {
    if x.size() != 2 {
      return Err(TubeError::invalid_argument(format!("CtcLinobs handles 2-dimensional states, got {}", x.size())));
    }
    // Slicings are checked once, before anything is narrowed.
    x.check_slicing()?;
    if !Tube::same_slicing(&x[0], u) {
      return Err(TubeError::StructureMismatch);
    }
    let n = x.nb_slices();
    let mut inputs = Vec::with_capacity(n);
    let mut widths = Vec::with_capacity(n);
    for s in u.slices() {
      inputs.push(s.envelope());
      widths.push(s.domain().diam());
    }
    let boxes: Vec<IntervalBox> = x.gates().iter().map(|g| [g[0], g[1]]).collect();

    // Unbounded gates have no polygon until the flow brings one.
    let mut polygons: Vec<Option<ConvexPolygon>> = boxes.iter()
      .map(|b| if b[0].is_bounded() && b[1].is_bounded() { Some(ConvexPolygon::from_box(*b)) } else { None })
      .collect();
    for k in 1..=n {
      if let Some(prev) = polygons[k - 1].clone() {
        let p_k = polygons[k].take().unwrap_or_else(|| {
          clipped(&boxes[k], &self.flow_fwd(&prev, widths[k - 1], inputs[k - 1]))
        });
        polygons[k] = Some(self.ctc_fwd_gate(&p_k, &prev, widths[k - 1], inputs[k - 1]));
      }
    }
    for k in (0..n).rev() {
      if let Some(next) = polygons[k + 1].clone() {
        let p_k = polygons[k].take().unwrap_or_else(|| {
          clipped(&boxes[k], &self.flow_bwd(&next, widths[k], inputs[k]))
        });
        polygons[k] = Some(self.ctc_bwd_gate(&p_k, &next, widths[k], inputs[k]));
      }
    }

    let mut changed = false;
    for k in 0..=n {
      if let Some(p) = &polygons[k] {
        trace!("CtcLinobs: gate {} is {}", k, p);
        let b = box_intersection(&boxes[k], &p.to_box());
        if b != boxes[k] {
          x.write_gate(k, &b);
          changed = true;
        }
      }
    }
    for k in 0..n {
      if let Some(p) = &polygons[k] {
        let envelope = [x[0].slice_at(k)?.envelope(), x[1].slice_at(k)?.envelope()];
        let b = box_intersection(&envelope, &self.polygon_envelope(p, widths[k], inputs[k]).to_box());
        if b != envelope {
          x.write_envelope(k, &b);
          changed = true;
        }
      }
    }
    debug!("CtcLinobs: {} slices, changed = {}, volume = {}", n, changed, x.volume());
    Ok(changed)
  }

  fn flow_fwd(&self, p: &ConvexPolygon, dt: f64, u: Interval) -> ConvexPolygon {
    let dt = Interval::singleton(dt);
    self.flow(p, dt, Interval::new(0.0, dt.upper()), dt, u)
  }

  fn flow_bwd(&self, p: &ConvexPolygon, dt: f64, u: Interval) -> ConvexPolygon {
    let dt = Interval::singleton(dt);
    self.flow(p, -dt, Interval::new(-dt.upper(), 0.0), -dt, u)
  }
}

// Bounded part of the box `b` around `p`.
fn clipped(b: &IntervalBox, p: &ConvexPolygon) -> ConvexPolygon {
  ConvexPolygon::from_box(box_intersection(b, &p.to_box()))
}

impl Debug for CtcLinobs
{
  fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
    formatter.debug_struct("CtcLinobs")
      .field("a", &self.a)
      .field("b", &self.b)
      .field("max_vertices", &self.max_vertices)
      .finish()
  }
}

impl Contractor for CtcLinobs
{
  /// Domains: `(x, u)`, `x` being a tube vector of size 2.
  fn contract(&self, domains: &mut [Domain<'_>]) -> Result<bool> {
    match domains {
      [Domain::TubeVector(x), Domain::Tube(u)] => self.contract_tubes(x, u),
      _ => Err(invalid_domains("CtcLinobs", "(tube vector, tube)", domains))
    }
  }
}
