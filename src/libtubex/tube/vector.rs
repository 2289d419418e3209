// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tube vectors: enclosures of vector-valued functions of time, one tube per component.
//!
//! Every component shares the slicing of the first one. Values are exchanged as slices of intervals, one interval per component.

use crate::error::*;
use crate::interval::Interval;
use crate::ops::*;
use crate::tube::Tube;
use gcollections::ops::*;
use std::fmt::{Display, Error, Formatter};
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, PartialEq)]
pub struct TubeVector {
  tubes: Vec<Tube>
}

impl TubeVector
{
  pub fn new(tubes: Vec<Tube>) -> Result<TubeVector> {
    if tubes.is_empty() {
      return Err(TubeError::invalid_argument("a tube vector has at least one component"));
    }
    if tubes.iter().any(|x| !Tube::same_slicing(x, &tubes[0])) {
      return Err(TubeError::StructureMismatch);
    }
    Ok(TubeVector { tubes })
  }

  /// One tube per interval of `codomain`, all sliced every `timestep`.
  pub fn with_timestep(domain: Interval, timestep: f64, codomain: &[Interval]) -> Result<TubeVector> {
    let tubes = codomain.iter()
      .map(|y| Tube::with_timestep(domain, timestep, *y))
      .collect::<Result<Vec<Tube>>>()?;
    TubeVector::new(tubes)
  }

  pub fn size(&self) -> usize {
    self.tubes.len()
  }

  pub fn domain(&self) -> Interval {
    self.tubes[0].domain()
  }

  pub fn nb_slices(&self) -> usize {
    self.tubes[0].nb_slices()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Tube> {
    self.tubes.iter()
  }

  /// Use `sample` to split every component at once.
  pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tube> {
    self.tubes.iter_mut()
  }

  pub fn sample(&mut self, t: f64) -> Result<()> {
    for x in &mut self.tubes {
      x.sample(t)?;
    }
    Ok(())
  }

  pub fn eval_at(&self, t: f64) -> Result<Vec<Interval>> {
    self.tubes.iter().map(|x| x.eval_at(t)).collect()
  }

  pub fn codomain(&self) -> Vec<Interval> {
    self.tubes.iter().map(|x| x.codomain()).collect()
  }

  /// Gate `k`, between the slices `k-1` and `k`; gate `nb_slices()` is the final one.
  pub fn gate(&self, k: usize) -> Result<Vec<Interval>> {
    let n = self.check_slicing()?;
    if k > n {
      return Err(TubeError::IndexOutOfRange { index: k, len: n + 1 });
    }
    Ok(self.tubes.iter().map(|x| gate_of(x, k)).collect())
  }

  /// Overwrites the gate `k` of every component, intersected with the adjacent envelopes.
  pub fn set_gate(&mut self, k: usize, y: &[Interval]) -> Result<()> {
    self.check_size(y)?;
    let n = self.check_slicing()?;
    if k > n {
      return Err(TubeError::IndexOutOfRange { index: k, len: n + 1 });
    }
    self.write_gate(k, y);
    Ok(())
  }

  /// Envelopes of the slice `index`.
  pub fn envelope(&self, index: usize) -> Result<Vec<Interval>> {
    let n = self.check_slicing()?;
    if index >= n {
      return Err(TubeError::IndexOutOfRange { index, len: n });
    }
    Ok(self.tubes.iter().map(|x| x.slice(x.slice_ids()[index]).envelope()).collect())
  }

  pub fn set_envelope(&mut self, index: usize, y: &[Interval]) -> Result<()> {
    self.check_size(y)?;
    let n = self.check_slicing()?;
    if index >= n {
      return Err(TubeError::IndexOutOfRange { index, len: n });
    }
    self.write_envelope(index, y);
    Ok(())
  }

  // Unchecked accessors for callers that already validated the slicing and the sizes.

  pub(crate) fn gates(&self) -> Vec<Vec<Interval>> {
    (0..=self.nb_slices()).map(|k| self.tubes.iter().map(|x| gate_of(x, k)).collect()).collect()
  }

  pub(crate) fn write_gate(&mut self, k: usize, y: &[Interval]) {
    let n = self.nb_slices();
    for (x, yi) in self.tubes.iter_mut().zip(y) {
      if k < n {
        let id = x.slice_ids()[k];
        x.set_input_gate(id, *yi);
      }
      else {
        let id = x.slice_ids()[n - 1];
        x.set_output_gate(id, *yi);
      }
    }
  }

  pub(crate) fn write_envelope(&mut self, index: usize, y: &[Interval]) {
    for (x, yi) in self.tubes.iter_mut().zip(y) {
      let id = x.slice_ids()[index];
      x.set_envelope(id, *yi);
    }
  }

  /// Sum over the slices of the volumes of their boxes.
  pub fn volume(&self) -> f64 {
    (0..self.nb_slices()).map(|k| {
      self.tubes.iter().fold(self.tubes[0].slice_at(k).map_or(0.0, |s| s.domain().diam()), |v, x| {
        v * x.slice_at(k).map_or(0.0, |s| {
          let y = s.envelope();
          if y.is_empty() { 0.0 } else { y.diam() }
        })
      })
    }).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.tubes.iter().any(|x| x.is_empty())
  }

  /// Components can be resliced one by one through `iter_mut` or indexing; values are only exchanged once they share the slicing again. Returns the number of slices.
  pub fn check_slicing(&self) -> Result<usize> {
    let first = &self.tubes[0];
    for x in &self.tubes[1..] {
      first.check_slicing(x)?;
    }
    Ok(first.nb_slices())
  }

  fn check_size(&self, y: &[Interval]) -> Result<()> {
    if y.len() == self.size() { Ok(()) }
    else {
      Err(TubeError::invalid_argument(format!(
        "{} values given to a tube vector of size {}", y.len(), self.size())))
    }
  }
}

fn gate_of(x: &Tube, k: usize) -> Interval {
  if k < x.nb_slices() { x.slice(x.slice_ids()[k]).input_gate() }
  else { x.last_slice().output_gate() }
}

impl Index<usize> for TubeVector
{
  type Output = Tube;

  fn index(&self, k: usize) -> &Tube {
    &self.tubes[k]
  }
}

impl IndexMut<usize> for TubeVector
{
  fn index_mut(&mut self, k: usize) -> &mut Tube {
    &mut self.tubes[k]
  }
}

impl Display for TubeVector
{
  fn fmt(&self, formatter: &mut Formatter) -> std::result::Result<(), Error> {
    write!(formatter, "TubeVector ({}) {}↦(", self.size(), self.domain())?;
    for (k, y) in self.codomain().iter().enumerate() {
      if k > 0 {
        formatter.write_str(", ")?;
      }
      write!(formatter, "{}", y)?;
    }
    write!(formatter, "), {} slice{}", self.nb_slices(), if self.nb_slices() > 1 { "s" } else { "" })
  }
}
