// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Segments between two uncertain points.
//!
//! Intersections special-case vertical and horizontal segments: solving the line equations there would divide by a null-width interval. In the oblique case, the algebraic intersection is intersected with the boxes of both segments.

use crate::geometry::*;
use crate::interval::Interval;
use crate::ops::*;
use gcollections::ops::*;
use std::fmt::{Display, Error, Formatter};
use trilean::SKleene;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Edge {
  p1: Point,
  p2: Point
}

impl Edge
{
  pub fn new(p1: Point, p2: Point) -> Edge {
    Edge { p1, p2 }
  }

  pub fn p1(&self) -> Point {
    self.p1
  }

  pub fn p2(&self) -> Point {
    self.p2
  }

  /// Hull of both end points.
  pub fn to_box(&self) -> IntervalBox {
    box_hull(&self.p1.to_box(), &self.p2.to_box())
  }

  pub fn does_not_exist(&self) -> bool {
    self.p1.does_not_exist() || self.p2.does_not_exist()
  }

  /// Box enclosing the part of the edge lying in `b`.
  pub fn intersect_box(&self, b: &IntervalBox) -> IntervalBox {
    if self.does_not_exist() || box_is_empty(b) {
      return empty_box();
    }
    let own = self.to_box();
    if box_is_flat(&own) {
      return box_intersection(b, &own);
    }
    let p1_inside = box_is_subset(&self.p1.to_box(), b);
    let p2_inside = box_is_subset(&self.p2.to_box(), b);
    let mut inter = empty_box();
    if p1_inside {
      inter = box_hull(&inter, &self.p1.to_box());
    }
    if p2_inside {
      inter = box_hull(&inter, &self.p2.to_box());
    }
    if !(p1_inside && p2_inside) {
      for side in push_edges(b) {
        inter = box_hull(&inter, &self.intersect(&side).to_box());
      }
    }
    inter
  }

  /// Enclosure of the intersection point of two edges. A coordinate is empty when the edges provably do not meet.
  pub fn intersect(&self, e: &Edge) -> Point {
    if self.does_not_exist() || e.does_not_exist() {
      return Point::new(Interval::empty(), Interval::empty());
    }
    let (own, other) = (self.to_box(), e.to_box());
    if other[0].is_degenerate() || other[1].is_degenerate() {
      if box_is_flat(&own) {
        return Point::from_box(box_intersection(&own, &other));
      }
      // Oblique line `y = b + a (x - x1)`.
      let a = (self.p2.y() - self.p1.y()) / (self.p2.x() - self.p1.x());
      let b = self.p1.y();
      if other[0].is_degenerate() {
        Point::new(
          other[0].intersection(&own[0]),
          other[1].intersection(&(b + a * (other[0] - self.p1.x()))))
      }
      else {
        Point::new(
          other[0].intersection(&(self.p1.x() + (other[1] - b) / a)),
          other[1].intersection(&own[1]))
      }
    }
    else {
      let (x1, y1, x2, y2) = (self.p1.x(), self.p1.y(), self.p2.x(), self.p2.y());
      let (x3, y3, x4, y4) = (e.p1.x(), e.p1.y(), e.p2.x(), e.p2.y());
      let det = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
      let c12 = x1 * y2 - y1 * x2;
      let c34 = x3 * y4 - y3 * x4;
      let x = (c12 * (x3 - x4) - (x1 - x2) * c34) / det;
      let y = (c12 * (y3 - y4) - (y1 - y2) * c34) / det;
      Point::new(
        x.intersection(&own[0]).intersection(&other[0]),
        y.intersection(&own[1]).intersection(&other[1]))
    }
  }

  /// `Unknown` when the intersection point cannot be bounded.
  pub fn parallel(e1: &Edge, e2: &Edge) -> SKleene {
    let (b1, b2) = (e1.to_box(), e2.to_box());
    if b1[0].is_degenerate() && b2[0].is_degenerate() {
      return SKleene::True;
    }
    if b1[1].is_degenerate() && b2[1].is_degenerate() {
      return SKleene::True;
    }
    let p = e1.intersect(e2);
    if p.x().is_unbounded() || p.y().is_unbounded() { SKleene::Unknown }
    else { SKleene::False }
  }
}

/// The four sides of `b`, counter-clockwise from the lower left corner. Infinite bounds of `y` are kept as half-lines.
pub fn push_edges(b: &IntervalBox) -> Vec<Edge> {
  if box_is_empty(b) {
    return vec![];
  }
  let (x, y) = (b[0], b[1]);
  let ylb =
    if y.lower() != f64::NEG_INFINITY { Interval::singleton(y.lower()) }
    else { Interval::new(f64::NEG_INFINITY, y.upper()) };
  let yub =
    if y.upper() != f64::INFINITY { Interval::singleton(y.upper()) }
    else { Interval::new(y.lower(), f64::INFINITY) };
  let (xlb, xub) = (Interval::singleton(x.lower()), Interval::singleton(x.upper()));
  vec![
    Edge::new(Point::new(xlb, ylb), Point::new(xub, ylb)),
    Edge::new(Point::new(xub, ylb), Point::new(xub, yub)),
    Edge::new(Point::new(xub, yub), Point::new(xlb, yub)),
    Edge::new(Point::new(xlb, yub), Point::new(xlb, ylb))
  ]
}

impl Display for Edge
{
  fn fmt(&self, formatter: &mut Formatter) -> Result<(), Error> {
    write!(formatter, "{}--{}", self.p1, self.p2)
  }
}
