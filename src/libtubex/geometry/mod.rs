// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Guaranteed planar geometry.
//!
//! Coordinates are intervals: a [`Point`](point/struct.Point.html) is a box of the plane known to contain the exact point. Predicates that may be undecidable under this uncertainty return a `trilean::SKleene` (or an `Orientation::Undefined`); callers must treat the unknown outcome conservatively.

pub mod point;
pub mod edge;
pub mod graham_scan;
pub mod polygon;

pub use self::point::Point;
pub use self::edge::{Edge, push_edges};
pub use self::graham_scan::{GrahamScan, Orientation};
pub use self::polygon::ConvexPolygon;

use crate::interval::Interval;
use crate::ops::*;
use gcollections::ops::*;

/// Axis-aligned box of the plane, `[x, y]`.
pub type IntervalBox = [Interval; 2];

pub fn empty_box() -> IntervalBox {
  [Interval::empty(), Interval::empty()]
}

pub fn box_is_empty(b: &IntervalBox) -> bool {
  b[0].is_empty() || b[1].is_empty()
}

/// One of the sides has a null width.
pub fn box_is_flat(b: &IntervalBox) -> bool {
  box_is_empty(b) || b[0].is_degenerate() || b[1].is_degenerate()
}

pub fn box_is_subset(a: &IntervalBox, b: &IntervalBox) -> bool {
  box_is_empty(a) || (a[0].is_subset(&b[0]) && a[1].is_subset(&b[1]))
}

pub fn box_hull(a: &IntervalBox, b: &IntervalBox) -> IntervalBox {
  if box_is_empty(a) { *b }
  else if box_is_empty(b) { *a }
  else { [a[0].hull(&b[0]), a[1].hull(&b[1])] }
}

pub fn box_intersection(a: &IntervalBox, b: &IntervalBox) -> IntervalBox {
  let res = [a[0].intersection(&b[0]), a[1].intersection(&b[1])];
  if box_is_empty(&res) { empty_box() } else { res }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn b(x: (f64, f64), y: (f64, f64)) -> IntervalBox {
    [Interval::new(x.0, x.1), Interval::new(y.0, y.1)]
  }

  #[test]
  fn box_operations() {
    let unit = b((0.0, 1.0), (0.0, 1.0));
    let shifted = b((0.5, 2.0), (-1.0, 0.5));
    assert_eq!(box_hull(&unit, &shifted), b((0.0, 2.0), (-1.0, 1.0)));
    assert_eq!(box_intersection(&unit, &shifted), b((0.5, 1.0), (0.0, 0.5)));
    assert!(box_is_empty(&box_intersection(&unit, &b((2.0, 3.0), (0.0, 1.0)))));
    assert_eq!(box_hull(&empty_box(), &unit), unit);
    assert!(box_is_flat(&b((1.0, 1.0), (0.0, 3.0))));
    assert!(!box_is_flat(&unit));
    assert!(box_is_subset(&b((0.2, 0.4), (0.0, 1.0)), &unit));
    assert!(box_is_subset(&empty_box(), &unit));
    assert!(!box_is_subset(&shifted, &unit));
  }
}
