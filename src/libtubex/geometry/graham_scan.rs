// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Convex hull of uncertain points by a Graham scan.
//!
//! The turn of three points is a three-valued predicate: when the cross product encloses zero, the points may be aligned and the orientation is `Undefined`. The scan only discards a point on a certain clockwise turn or a certain alignment, so that the hull never loses a point that might be extreme.

use crate::geometry::Point;
use gcollections::ops::*;
use std::cmp::Ordering;
use trilean::SKleene;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Orientation {
  Clockwise,
  CounterClockwise,
  Undefined
}

pub struct GrahamScan;

impl GrahamScan
{
  /// Orientation of the turn `a -> b -> c`.
  pub fn orientation(a: &Point, b: &Point, c: &Point) -> Orientation {
    debug_assert!(!a.does_not_exist() && !b.does_not_exist() && !c.does_not_exist());
    let val = (b.y() - a.y()) * (c.x() - b.x()) - (b.x() - a.x()) * (c.y() - b.y());
    if val.contains(&0.0) { Orientation::Undefined }
    else if val.lower() > 0.0 { Orientation::Clockwise }
    else { Orientation::CounterClockwise }
  }

  /// Counter-clockwise convex hull of the existing points of `points`. Up to three points are kept, a clockwise triangle being reversed; aligned or undecidable triangles stay in the given order.
  pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = points.iter().cloned()
      .filter(|p| !p.does_not_exist())
      .collect();
    if pts.len() <= 3 {
      if pts.len() == 3 && GrahamScan::orientation(&pts[0], &pts[1], &pts[2]) == Orientation::Clockwise {
        pts.reverse();
      }
      return pts;
    }

    // Bottom-most point, the left-most one in case of tie.
    let pivot_idx = (1..pts.len()).fold(0, |min, k| {
      let (y, ymin) = (pts[k].y().lower(), pts[min].y().lower());
      if y < ymin || (y == ymin && pts[k].x().lower() < pts[min].x().lower()) { k } else { min }
    });
    let pivot = pts.swap_remove(pivot_idx);
    pts.retain(|p| *p != pivot);

    // Polar angle around the pivot, the closest point first on ties.
    let (px, py) = (pivot.x().mid(), pivot.y().mid());
    let polar = |p: &Point| {
      let (dx, dy) = (p.x().mid() - px, p.y().mid() - py);
      (dy.atan2(dx), dx * dx + dy * dy)
    };
    pts.sort_by(|a, b| {
      let ((angle_a, dist_a), (angle_b, dist_b)) = (polar(a), polar(b));
      match angle_a.total_cmp(&angle_b) {
        Ordering::Equal => dist_a.total_cmp(&dist_b),
        ord => ord
      }
    });

    // Among points aligned with the pivot, only the farthest one is kept.
    let mut sorted: Vec<Point> = Vec::with_capacity(pts.len() + 1);
    sorted.push(pivot);
    for k in 0..pts.len() {
      if k + 1 < pts.len() && Point::aligned(&pivot, &pts[k], &pts[k + 1]) == SKleene::True {
        continue;
      }
      sorted.push(pts[k]);
    }
    if sorted.len() <= 3 {
      return sorted;
    }

    let mut hull: Vec<Point> = sorted[..2].to_vec();
    for p in &sorted[2..] {
      while hull.len() > 1 {
        let (a, b) = (&hull[hull.len() - 2], &hull[hull.len() - 1]);
        if GrahamScan::orientation(a, b, p) == Orientation::Clockwise
         || Point::aligned(a, b, p) == SKleene::True
        {
          hull.pop();
        }
        else {
          break;
        }
      }
      hull.push(*p);
    }
    hull
  }
}
