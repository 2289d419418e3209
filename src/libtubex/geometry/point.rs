// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::geometry::IntervalBox;
use crate::interval::Interval;
use gcollections::ops::*;
use std::fmt::{Display, Error, Formatter};
use trilean::SKleene;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point {
  x: Interval,
  y: Interval
}

impl Point
{
  pub fn new(x: Interval, y: Interval) -> Point {
    Point { x, y }
  }

  pub fn from_box(b: IntervalBox) -> Point {
    Point::new(b[0], b[1])
  }

  pub fn from_coords(x: f64, y: f64) -> Point {
    Point::new(Interval::singleton(x), Interval::singleton(y))
  }

  pub fn x(&self) -> Interval {
    self.x
  }

  pub fn y(&self) -> Interval {
    self.y
  }

  pub fn to_box(&self) -> IntervalBox {
    [self.x, self.y]
  }

  /// One of the coordinates is empty.
  pub fn does_not_exist(&self) -> bool {
    self.x.is_empty() || self.y.is_empty()
  }

  /// Whether the three points lie on a same line.
  pub fn aligned(p1: &Point, p2: &Point, p3: &Point) -> SKleene {
    if p1.does_not_exist() || p2.does_not_exist() || p3.does_not_exist() {
      return SKleene::False;
    }
    let cross = (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x);
    if cross == Interval::singleton(0.0) { SKleene::True }
    else if cross.contains(&0.0) { SKleene::Unknown }
    else { SKleene::False }
  }
}

impl Display for Point
{
  fn fmt(&self, formatter: &mut Formatter) -> Result<(), Error> {
    write!(formatter, "({} ; {})", self.x, self.y)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ops::*;

  #[test]
  fn existence() {
    assert!(!Point::from_coords(1.0, 2.0).does_not_exist());
    assert!(Point::new(Interval::empty(), Interval::singleton(1.0)).does_not_exist());
    assert!(Point::new(Interval::whole(), Interval::empty()).does_not_exist());
    let p = Point::from_box([Interval::new(0.0, 1.0), Interval::new(2.0, 3.0)]);
    assert_eq!(p.to_box(), [Interval::new(0.0, 1.0), Interval::new(2.0, 3.0)]);
  }

  #[test]
  fn alignment() {
    let o = Point::from_coords(0.0, 0.0);
    let a = Point::from_coords(1.0, 1.0);
    let cases = vec![
      (Point::from_coords(2.0, 2.0), SKleene::True),
      (Point::from_coords(2.0, 3.0), SKleene::False),
      (Point::new(Interval::new(1.9, 2.1), Interval::singleton(2.0)), SKleene::Unknown)
    ];
    for (p, expected) in cases {
      let res = Point::aligned(&o, &a, &p);
      assert!(res == expected, "aligned({}, {}, {}) = {:?} instead of {:?}", o, a, p, res, expected);
    }
  }

  #[test]
  fn display() {
    assert_eq!(format!("{}", Point::from_coords(1.0, -2.0)), "([1, 1] ; [-2, -2])");
  }
}
