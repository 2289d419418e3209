// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Convex polygons with uncertain vertices.
//!
//! A polygon is the convex hull of its vertex boxes, stored counter-clockwise. Every operation over-approximates: intersections keep every candidate vertex that cannot be proved outside, and simplification only removes vertices by pushing edges outward.

use crate::geometry::*;
use crate::interval::Interval;
use gcollections::ops::*;
use log::warn;
use std::fmt::{Display, Error, Formatter};
use trilean::SKleene;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvexPolygon {
  vertices: Vec<Point>
}

impl ConvexPolygon
{
  /// Convex hull of `points`.
  pub fn new(points: Vec<Point>) -> ConvexPolygon {
    let mut unique: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
      if !p.does_not_exist() && !unique.contains(&p) {
        unique.push(p);
      }
    }
    ConvexPolygon { vertices: GrahamScan::convex_hull(&unique) }
  }

  pub fn from_box(b: IntervalBox) -> ConvexPolygon {
    if box_is_empty(&b) {
      return ConvexPolygon::default();
    }
    let (x, y) = (b[0], b[1]);
    ConvexPolygon::new(vec![
      Point::from_coords(x.lower(), y.lower()),
      Point::from_coords(x.upper(), y.lower()),
      Point::from_coords(x.upper(), y.upper()),
      Point::from_coords(x.lower(), y.upper())
    ])
  }

  pub fn vertices(&self) -> &[Point] {
    &self.vertices
  }

  pub fn nb_vertices(&self) -> usize {
    self.vertices.len()
  }

  pub fn is_empty(&self) -> bool {
    self.vertices.is_empty()
  }

  pub fn edges(&self) -> Vec<Edge> {
    let n = self.vertices.len();
    if n < 2 {
      return vec![];
    }
    (0..n).map(|k| Edge::new(self.vertices[k], self.vertices[(k + 1) % n])).collect()
  }

  /// Hull of the vertex boxes.
  pub fn to_box(&self) -> IntervalBox {
    self.vertices.iter()
      .fold(empty_box(), |b, v| box_hull(&b, &v.to_box()))
  }

  /// Whether `p` lies in the polygon. Degenerate polygons only rule out points outside of their box.
  pub fn encloses(&self, p: &Point) -> SKleene {
    if self.is_empty() || p.does_not_exist() {
      return SKleene::False;
    }
    let b = self.to_box();
    if box_is_empty(&box_intersection(&b, &p.to_box())) {
      return SKleene::False;
    }
    if self.nb_vertices() < 3 {
      return SKleene::Unknown;
    }
    let mut res = SKleene::True;
    for e in self.edges() {
      match GrahamScan::orientation(&e.p1(), &e.p2(), p) {
        Orientation::Clockwise => return SKleene::False,
        Orientation::Undefined => res = SKleene::Unknown,
        Orientation::CounterClockwise => ()
      }
    }
    res
  }

  /// Polygon enclosing the intersection with the box `b`.
  pub fn intersect_box(&self, b: &IntervalBox) -> ConvexPolygon {
    if self.is_empty() || box_is_empty(b) {
      return ConvexPolygon::default();
    }
    if box_is_subset(&self.to_box(), b) {
      return self.clone();
    }
    let mut points: Vec<Point> = self.vertices.iter().cloned()
      .filter(|v| box_is_subset(&v.to_box(), b))
      .collect();
    if self.nb_vertices() < 3 {
      points.push(Point::from_box(box_intersection(&self.to_box(), b)));
    }
    else {
      for e in self.edges() {
        points.push(Point::from_box(e.intersect_box(b)));
      }
    }
    let corners = ConvexPolygon::from_box(*b);
    for c in corners.vertices() {
      if self.encloses(c) != SKleene::False {
        points.push(*c);
      }
    }
    ConvexPolygon::new(points)
  }

  /// Polygon enclosing the intersection of two polygons.
  pub fn intersect(&self, other: &ConvexPolygon) -> ConvexPolygon {
    if self.is_empty() || other.is_empty() {
      return ConvexPolygon::default();
    }
    if self.nb_vertices() < 3 {
      return other.intersect_box(&self.to_box());
    }
    if other.nb_vertices() < 3 {
      return self.intersect_box(&other.to_box());
    }
    let mut points = vec![];
    for v in &self.vertices {
      if other.encloses(v) != SKleene::False {
        points.push(*v);
      }
    }
    for v in &other.vertices {
      if self.encloses(v) != SKleene::False {
        points.push(*v);
      }
    }
    let other_edges = other.edges();
    for e1 in self.edges() {
      for e2 in &other_edges {
        let p = e1.intersect(e2);
        if !p.does_not_exist() {
          points.push(p);
        }
      }
    }
    ConvexPolygon::new(points)
  }

  /// Polygon of at most `max_vertices` vertices enclosing this one.
  ///
  /// The edge whose removal adds the least area is collapsed first: its two neighbouring edges are extended up to their intersection. When no edge can be collapsed (the neighbouring edges do not converge), the bounding box is returned.
  pub fn simplify(&self, max_vertices: usize) -> ConvexPolygon {
    let mut vertices = self.vertices.clone();
    while vertices.len() > max_vertices.max(3) {
      match cheapest_collapse(&vertices) {
        Some((k, p)) => {
          let n = vertices.len();
          vertices[k] = p;
          vertices.remove((k + 1) % n);
        }
        None => {
          warn!("polygon of {} vertices replaced by its bounding box", vertices.len());
          return ConvexPolygon::from_box(self.to_box());
        }
      }
    }
    if vertices.len() > max_vertices {
      warn!("polygon of {} vertices replaced by its bounding box", vertices.len());
      return ConvexPolygon::from_box(self.to_box());
    }
    ConvexPolygon { vertices }
  }
}

// Collapsing the edge `k -> k+1` replaces both vertices by the intersection of the lines `k-1 -> k` and `k+2 -> k+1`. Returns the edge adding the least area with the new vertex.
fn cheapest_collapse(vertices: &[Point]) -> Option<(usize, Point)> {
  let n = vertices.len();
  let cross = |a: (Interval, Interval), b: (Interval, Interval)| a.0 * b.1 - a.1 * b.0;
  let sub = |p: &Point, q: &Point| (p.x() - q.x(), p.y() - q.y());
  let mut best: Option<(f64, usize, Point)> = None;
  for k in 0..n {
    let (prev, a, b, next) = (&vertices[(k + n - 1) % n], &vertices[k], &vertices[(k + 1) % n], &vertices[(k + 2) % n]);
    let (d1, d2, w) = (sub(a, prev), sub(b, next), sub(b, a));
    let det = cross(d1, d2);
    if det.contains(&0.0) {
      continue;
    }
    // a + s d1 = b + r d2
    let s = cross(w, d2) / det;
    let r = cross(d1, w) / det;
    if s.lower() < 0.0 || r.lower() < 0.0 || s.is_unbounded() {
      continue;
    }
    let p = Point::new(a.x() + s * d1.0, a.y() + s * d1.1);
    let area = cross(sub(&p, a), w).abs().upper();
    if best.as_ref().map_or(true, |(best_area, _, _)| area < *best_area) {
      best = Some((area, k, p));
    }
  }
  best.map(|(_, k, p)| (k, p))
}

impl Display for ConvexPolygon
{
  fn fmt(&self, formatter: &mut Formatter) -> Result<(), Error> {
    formatter.write_str("{")?;
    for (k, v) in self.vertices.iter().enumerate() {
      if k > 0 {
        formatter.write_str(", ")?;
      }
      write!(formatter, "{}", v)?;
    }
    formatter.write_str("}")
  }
}
