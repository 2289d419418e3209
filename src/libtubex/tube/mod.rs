// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tubes: guaranteed enclosures of unknown functions of time.
//!
//! A tube partitions its time domain into adjacent [slices](slice/index.html). Slices live in an arena and are addressed by a stable `SliceId`; a time-ordered index gives `O(log n)` access by time while `prev`/`next` links give the neighbours. Sampling a tube splits a slice in two without changing the enclosed set.
//!
//! Aggregated values (codomain, primitives of the bounds used by the integrals) are cached in a binary tree over the slices. Any write raises a dirty flag and the tree is rebuilt on the next aggregated query only. Cloning a tube does not share the cache.
//!
//! # Examples
//!
//! ```rust
//! use tubex::prelude::*;
//!
//! let domain = Interval::new(0.0, 5.0);
//! let xdot = Tube::from_fn(domain, 0.05, |t| t.cos() + Interval::new(-0.1, 0.1)).unwrap();
//! let x = xdot.primitive(Interval::singleton(0.0)).unwrap();
//! assert!(x.eval_at(3.0).unwrap().contains(&3.0f64.sin()));
//! ```

pub mod slice;
mod aggregate;
pub mod vector;
pub mod serialize;

pub use self::slice::{Slice, SliceId};
pub use self::vector::TubeVector;

use self::aggregate::Aggregate;
use crate::ctc::{CtcDeriv, CtcEval, TimePropag};
use crate::error::*;
use crate::interval::Interval;
use crate::interval_set::IntervalSet;
use crate::ops::*;
use crate::trajectory::Trajectory;
use gcollections::ops::*;
use log::{debug, trace};
use std::cell::{Cell, Ref, RefCell};
use std::fmt::{Display, Error, Formatter};

#[derive(Debug)]
pub struct Tube {
  slices: Vec<Slice>,
  order: Vec<SliceId>,
  cache: RefCell<Aggregate>,
  dirty: Cell<bool>
}

impl Tube
{
  /// Tube made of one slice.
  pub fn new(domain: Interval, codomain: Interval) -> Result<Tube> {
    Tube::with_timestep(domain, 0.0, codomain)
  }

  /// Slices of width `timestep` from the lower bound of `domain`, the last one may be narrower. A null timestep gives a single slice.
  pub fn with_timestep(domain: Interval, timestep: f64, codomain: Interval) -> Result<Tube> {
    check_domain(domain)?;
    if !(timestep >= 0.0) {
      return Err(TubeError::invalid_argument(format!("timestep must be non-negative, got {}", timestep)));
    }
    let (lb, ub) = (domain.lower(), domain.upper());
    let mut bounds = vec![lb];
    if timestep > 0.0 {
      let mut k = 1;
      loop {
        let t = lb + (k as f64) * timestep;
        // Avoids a sliver slice when `ub` is a multiple of the timestep up to rounding.
        if t >= ub || ub - t < timestep * 1e-9 {
          break;
        }
        bounds.push(t);
        k += 1;
      }
    }
    bounds.push(ub);
    Ok(Tube::from_partition(&bounds, codomain))
  }

  /// `n` slices of equal width.
  pub fn with_slices(domain: Interval, n: usize, codomain: Interval) -> Result<Tube> {
    check_domain(domain)?;
    if n == 0 {
      return Err(TubeError::invalid_argument("a tube has at least one slice"));
    }
    let (lb, ub) = (domain.lower(), domain.upper());
    let mut bounds: Vec<f64> = (0..n)
      .map(|k| lb + (ub - lb) * (k as f64) / (n as f64))
      .collect();
    bounds.push(ub);
    if bounds.windows(2).any(|w| !(w[0] < w[1])) {
      return Err(TubeError::invalid_argument(format!("{} cannot be split into {} slices", domain, n)));
    }
    Ok(Tube::from_partition(&bounds, codomain))
  }

  /// Envelopes are `f(slice domain)` and gates `f([t])`; `f` must be an inclusion function.
  pub fn from_fn<F>(domain: Interval, timestep: f64, f: F) -> Result<Tube>
  where
    F: Fn(Interval) -> Interval
  {
    let mut tube = Tube::with_timestep(domain, timestep, Interval::whole())?;
    tube.set_fn(f);
    Ok(tube)
  }

  /// Smallest tube of the slicing enclosing `traj`, inflated by `thickness / 2`.
  pub fn from_trajectory(traj: &Trajectory, timestep: f64, thickness: f64) -> Result<Tube> {
    if !(thickness >= 0.0) {
      return Err(TubeError::invalid_argument(format!("thickness must be non-negative, got {}", thickness)));
    }
    let mut tube = Tube::with_timestep(traj.domain(), timestep, Interval::empty())?;
    tube.unite_trajectory(traj)?;
    tube.inflate(thickness / 2.0)?;
    Ok(tube)
  }

  /// Tube enclosing both trajectories, which must share their domain.
  pub fn from_bounds(lb: &Trajectory, ub: &Trajectory, timestep: f64) -> Result<Tube> {
    if lb.domain() != ub.domain() {
      return Err(TubeError::IntervalOutOfDomain { t: ub.domain(), domain: lb.domain() });
    }
    let mut tube = Tube::with_timestep(lb.domain(), timestep, Interval::empty())?;
    tube.unite_trajectory(lb)?;
    tube.unite_trajectory(ub)?;
    Ok(tube)
  }

  fn from_partition(bounds: &[f64], codomain: Interval) -> Tube {
    let n = bounds.len() - 1;
    let slices: Vec<Slice> = bounds.windows(2).enumerate()
      .map(|(k, w)| {
        let mut s = Slice::new(Interval::new(w[0], w[1]), codomain);
        s.prev = if k > 0 { Some(SliceId(k - 1)) } else { None };
        s.next = if k + 1 < n { Some(SliceId(k + 1)) } else { None };
        s
      })
      .collect();
    Tube {
      slices,
      order: (0..n).map(SliceId).collect(),
      cache: RefCell::new(Aggregate::default()),
      dirty: Cell::new(true)
    }
  }

  /// Hull of tubes sharing the same slicing.
  pub fn hull(tubes: &[Tube]) -> Result<Tube> {
    let (first, others) = tubes.split_first()
      .ok_or_else(|| TubeError::invalid_argument("hull of an empty list of tubes"))?;
    if others.iter().any(|x| !Tube::same_slicing(first, x)) {
      return Err(TubeError::StructureMismatch);
    }
    let mut res = first.clone();
    for x in others {
      for (k, &id) in res.order.iter().enumerate() {
        let s = &mut res.slices[id.0];
        let o = x.slice(x.order[k]);
        s.envelope = s.envelope.hull(&o.envelope);
        s.input_gate = s.input_gate.hull(&o.input_gate);
        s.output_gate = s.output_gate.hull(&o.output_gate);
      }
    }
    res.touch();
    Ok(res)
  }

  fn touch(&self) {
    self.dirty.set(true);
  }

  fn aggregate(&self) -> Ref<'_, Aggregate> {
    if self.dirty.get() {
      *self.cache.borrow_mut() = Aggregate::build(self.slices());
      self.dirty.set(false);
      trace!("aggregation tree rebuilt over {} slices", self.nb_slices());
    }
    self.cache.borrow()
  }

  // Structure.

  pub fn domain(&self) -> Interval {
    Interval::new(self.first_slice().domain.lower(), self.last_slice().domain.upper())
  }

  pub fn nb_slices(&self) -> usize {
    self.order.len()
  }

  /// Identifiers of the slices in time order.
  pub fn slice_ids(&self) -> &[SliceId] {
    &self.order
  }

  /// Slices in time order.
  pub fn slices(&self) -> impl ExactSizeIterator<Item=&Slice> + '_ {
    self.order.iter().map(move |id| &self.slices[id.0])
  }

  pub fn slice(&self, id: SliceId) -> &Slice {
    &self.slices[id.0]
  }

  pub fn slice_at(&self, index: usize) -> Result<&Slice> {
    self.order.get(index)
      .map(|id| self.slice(*id))
      .ok_or(TubeError::IndexOutOfRange { index, len: self.nb_slices() })
  }

  pub fn first_slice(&self) -> &Slice {
    self.slice(self.order[0])
  }

  pub fn last_slice(&self) -> &Slice {
    self.slice(self.order[self.order.len() - 1])
  }

  /// Index of the slice containing `t`. On a boundary, it is the slice ending at `t`, except at the lower bound of the tube.
  pub fn index_of(&self, t: f64) -> Result<usize> {
    let domain = self.domain();
    if !domain.contains(&t) {
      return Err(TubeError::TimeOutOfDomain { t, domain });
    }
    Ok(self.order.partition_point(|id| self.slices[id.0].domain.upper() < t))
  }

  pub fn slice_id_at(&self, t: f64) -> Result<SliceId> {
    Ok(self.order[self.index_of(t)?])
  }

  pub fn get_slice(&self, t: f64) -> Result<&Slice> {
    Ok(self.slice(self.slice_id_at(t)?))
  }

  /// Slice of largest time domain.
  pub fn wider_slice(&self) -> &Slice {
    self.slices()
      .fold(self.first_slice(), |w, s| if s.domain.diam() > w.domain.diam() { s } else { w })
  }

  /// Slice of largest envelope.
  pub fn largest_slice(&self) -> &Slice {
    self.slices()
      .fold(self.first_slice(), |w, s| if s.envelope.diam() > w.envelope.diam() { s } else { w })
  }

  /// Splits the slice containing `t` in two, both keeping its envelope; the new gate is the envelope itself. Nothing happens if `t` already is a slice bound.
  pub fn sample(&mut self, t: f64) -> Result<()> {
    let k = self.index_of(t)?;
    let id = self.order[k];
    let s = self.slices[id.0].clone();
    if t == s.domain.lower() || t == s.domain.upper() {
      return Ok(());
    }
    let new_id = SliceId(self.slices.len());
    let mut right = Slice::new(Interval::new(t, s.domain.upper()), s.envelope);
    right.output_gate = s.output_gate;
    right.prev = Some(id);
    right.next = s.next;
    if let Some(next) = s.next {
      self.slices[next.0].prev = Some(new_id);
    }
    let left = &mut self.slices[id.0];
    left.domain = Interval::new(s.domain.lower(), t);
    left.output_gate = s.envelope;
    left.next = Some(new_id);
    self.slices.push(right);
    self.order.insert(k + 1, new_id);
    self.touch();
    debug_assert!(self.check_structure().is_ok(), "{:?}", self.check_structure());
    Ok(())
  }

  /// Samples the tube at `t` and narrows the gate at `t` with `gate`.
  pub fn sample_with_gate(&mut self, t: f64, gate: Interval) -> Result<()> {
    self.sample(t)?;
    let current = self.eval_at(t)?;
    self.set_gate_at(t, current.intersection(&gate));
    Ok(())
  }

  /// Samples the tube at every time of `times`, all of them must lie in the domain.
  pub fn sample_all(&mut self, times: &[f64]) -> Result<()> {
    let domain = self.domain();
    if let Some(&t) = times.iter().find(|t| !domain.contains(t)) {
      return Err(TubeError::TimeOutOfDomain { t, domain });
    }
    for &t in times {
      self.sample(t)?;
    }
    Ok(())
  }

  /// Both tubes have the same sequence of slice domains.
  pub fn same_slicing(a: &Tube, b: &Tube) -> bool {
    a.nb_slices() == b.nb_slices()
    && a.slices().zip(b.slices()).all(|(x, y)| x.domain == y.domain)
  }

  /// Walks the slices in time order and checks that the links, the domains and the shared gates are consistent. A failure is an internal fault.
  pub fn check_structure(&self) -> Result<()> {
    let corrupted = |msg: String| Err(TubeError::InvalidComponent(msg));
    if self.order.is_empty() {
      return corrupted("tube without slices".into());
    }
    for (k, &id) in self.order.iter().enumerate() {
      let s = match self.slices.get(id.0) {
        Some(s) => s,
        None => return corrupted(format!("dangling slice {:?}", id))
      };
      let prev = if k > 0 { Some(self.order[k - 1]) } else { None };
      let next = self.order.get(k + 1).copied();
      if s.prev != prev || s.next != next {
        return corrupted(format!("slice {} is not linked to its neighbours", k));
      }
      if let Some(next) = next.and_then(|n| self.slices.get(n.0)) {
        if s.domain.upper() != next.domain.lower() {
          return corrupted(format!("gap between the slices {} and {}", k, k + 1));
        }
        if s.output_gate != next.input_gate {
          return corrupted(format!("the slices {} and {} disagree on their shared gate", k, k + 1));
        }
      }
    }
    Ok(())
  }

  fn check_slicing(&self, other: &Tube) -> Result<()> {
    if Tube::same_slicing(self, other) { Ok(()) }
    else { Err(TubeError::StructureMismatch) }
  }

  fn check_subdomain(&self, t: Interval) -> Result<()> {
    let domain = self.domain();
    if t.is_subset(&domain) { Ok(()) }
    else { Err(TubeError::IntervalOutOfDomain { t, domain }) }
  }

  // Values.

  /// Hull of the envelopes.
  pub fn codomain(&self) -> Interval {
    self.aggregate().root().codomain
  }

  pub fn volume(&self) -> f64 {
    self.slices().map(|s| s.volume()).sum()
  }

  /// Envelope of the slice `index`.
  pub fn value_at_index(&self, index: usize) -> Result<Interval> {
    self.slice_at(index).map(|s| s.envelope)
  }

  /// Value at `t`: a gate if `t` is a slice bound, an envelope otherwise.
  pub fn eval_at(&self, t: f64) -> Result<Interval> {
    Ok(self.get_slice(t)?.eval(t))
  }

  /// Hull of the values over `t`.
  pub fn eval_over(&self, t: Interval) -> Result<Interval> {
    self.check_subdomain(t)?;
    if t.is_empty() {
      return Ok(t);
    }
    if t.is_degenerate() {
      return self.eval_at(t.lower());
    }
    let (i, j) = (self.index_of(t.lower())?, self.index_of(t.upper())?);
    let middle = self.aggregate().query(i + 1, j.saturating_sub(1)).codomain;
    Ok(self.slice(self.order[i]).eval_over(t)
      .hull(&self.slice(self.order[j]).eval_over(t))
      .hull(&middle))
  }

  /// Hulls of the lower bounds and of the upper bounds of the values over `t`.
  pub fn eval(&self, t: Interval) -> Result<(Interval, Interval)> {
    self.check_subdomain(t)?;
    if t.is_empty() {
      return Ok((Interval::empty(), Interval::empty()));
    }
    let (i, j) = (self.index_of(t.lower())?, self.index_of(t.upper())?);
    let summary = self.aggregate().query(i + 1, j.saturating_sub(1));
    let (mut lbs, mut ubs) = (summary.lower_bounds, summary.upper_bounds);
    for k in [i, j] {
      let y = self.slice(self.order[k]).eval_over(t);
      if !y.is_empty() {
        lbs = lbs.hull(&y.lower());
        ubs = ubs.hull(&y.upper());
      }
    }
    Ok((lbs, ubs))
  }

  /// Enclosure of the values over `t` knowing that the derivative lies in `v`.
  pub fn interpol(&self, t: Interval, v: &Tube) -> Result<Interval> {
    self.check_slicing(v)?;
    self.check_subdomain(t)?;
    if t.is_empty() {
      return Ok(t);
    }
    let (i, j) = (self.index_of(t.lower())?, self.index_of(t.upper())?);
    if t.is_degenerate() {
      let mut res = self.slice(self.order[i]).interpol(t, v.slice(v.order[i]).envelope);
      if i + 1 < self.nb_slices() && self.slice(self.order[i]).domain.upper() == t.lower() {
        res = res.intersection(&self.slice(self.order[i + 1]).interpol(t, v.slice(v.order[i + 1]).envelope));
      }
      return Ok(res);
    }
    Ok((i..=j).fold(Interval::empty(), |acc, k| {
      acc.hull(&self.slice(self.order[k]).interpol(t, v.slice(v.order[k]).envelope))
    }))
  }

  fn invert_slices(&self, y: Interval, v: Option<&Tube>, search: Interval) -> Vec<Interval> {
    let search = search.intersection(&self.domain());
    if search.is_empty() {
      return vec![];
    }
    let first = self.order.partition_point(|id| self.slices[id.0].domain.upper() < search.lower());
    let last = self.order.partition_point(|id| self.slices[id.0].domain.lower() <= search.upper());
    (first..last).map(|k| {
      let dv = v.map_or(Interval::whole(), |v| v.slice(v.order[k]).envelope);
      self.slice(self.order[k]).invert(y, dv, search)
    }).collect()
  }

  /// Hull of the times of `search` at which the tube may take a value in `y`.
  pub fn invert(&self, y: Interval, search: Interval) -> Interval {
    self.invert_slices(y, None, search).iter()
      .fold(Interval::empty(), |acc, t| acc.hull(t))
  }

  pub fn invert_with_derivative(&self, y: Interval, v: &Tube, search: Interval) -> Result<Interval> {
    self.check_slicing(v)?;
    Ok(self.invert_slices(y, Some(v), search).iter()
      .fold(Interval::empty(), |acc, t| acc.hull(t)))
  }

  /// Times of `search` at which the tube may take a value in `y`, as disjoint intervals: a new interval starts after each slice giving no solution.
  pub fn invert_all(&self, y: Interval, search: Interval) -> IntervalSet {
    gather(self.invert_slices(y, None, search))
  }

  pub fn invert_all_with_derivative(&self, y: Interval, v: &Tube, search: Interval) -> Result<IntervalSet> {
    self.check_slicing(v)?;
    Ok(gather(self.invert_slices(y, Some(v), search)))
  }

  /// Largest diameter of the envelopes.
  pub fn max_thickness(&self) -> f64 {
    self.slices().map(|s| s.envelope.diam()).fold(0.0, f64::max)
  }

  /// Largest diameter of the gates, with the time of that gate.
  pub fn max_gate_thickness(&self) -> (f64, f64) {
    let first = self.first_slice();
    self.slices().fold((first.input_gate.diam(), first.domain.lower()), |(d, t), s| {
      let dg = s.output_gate.diam();
      if dg > d { (dg, s.domain.upper()) } else { (d, t) }
    })
  }

  // Tests.

  fn all_slices<F>(&self, other: &Tube, f: F) -> Result<bool>
  where
    F: Fn(&Slice, &Slice) -> bool
  {
    self.check_slicing(other)?;
    Ok(self.slices().zip(other.slices()).all(|(x, y)| f(x, y)))
  }

  pub fn is_subset(&self, other: &Tube) -> Result<bool> {
    self.all_slices(other, |x, y| x.is_subset(y))
  }

  pub fn is_strict_subset(&self, other: &Tube) -> Result<bool> {
    Ok(self.is_subset(other)? && self != other)
  }

  pub fn is_interior_subset(&self, other: &Tube) -> Result<bool> {
    self.all_slices(other, |x, y| x.is_interior_subset(y))
  }

  pub fn is_superset(&self, other: &Tube) -> Result<bool> {
    other.is_subset(self)
  }

  pub fn is_strict_superset(&self, other: &Tube) -> Result<bool> {
    other.is_strict_subset(self)
  }

  /// One of the slices is empty.
  pub fn is_empty(&self) -> bool {
    self.aggregate().root().has_empty
  }

  /// `traj` is enclosed by the tube, its domain must cover the one of the tube.
  pub fn contains(&self, traj: &Trajectory) -> Result<bool> {
    let domain = self.domain();
    if !domain.is_subset(&traj.domain()) {
      return Err(TubeError::IntervalOutOfDomain { t: domain, domain: traj.domain() });
    }
    Ok(self.slices().all(|s| s.contains(traj)))
  }

  // Setting values.

  /// Overwrites every envelope and gate.
  pub fn set(&mut self, y: Interval) {
    for s in &mut self.slices {
      s.set(y);
    }
    self.touch();
  }

  pub fn set_empty(&mut self) {
    self.set(Interval::empty());
  }

  /// Overwrites the envelope and both gates of the slice `index`.
  pub fn set_slice(&mut self, y: Interval, index: usize) -> Result<()> {
    let id = *self.order.get(index)
      .ok_or(TubeError::IndexOutOfRange { index, len: self.nb_slices() })?;
    self.set_envelope(id, y);
    self.set_input_gate(id, y);
    self.set_output_gate(id, y);
    Ok(())
  }

  /// Sets the value at `t`, sampling the tube if needed.
  pub fn set_at(&mut self, y: Interval, t: f64) -> Result<()> {
    self.sample(t)?;
    self.set_gate_at(t, y);
    Ok(())
  }

  /// Sets the value over `t`, sampling the tube at its bounds.
  pub fn set_over(&mut self, y: Interval, t: Interval) -> Result<()> {
    self.check_subdomain(t)?;
    if t.is_empty() {
      return Ok(());
    }
    if t.is_degenerate() {
      return self.set_at(y, t.lower());
    }
    self.sample(t.lower())?;
    self.sample(t.upper())?;
    let ids: Vec<SliceId> = self.order.iter().cloned()
      .filter(|id| self.slices[id.0].domain.is_subset(&t))
      .collect();
    for &id in &ids {
      self.set_envelope(id, y);
    }
    for &id in &ids {
      self.set_input_gate(id, y);
      self.set_output_gate(id, y);
    }
    Ok(())
  }

  /// Sets the gate at the slice bound `t`.
  fn set_gate_at(&mut self, t: f64, y: Interval) {
    let id = self.order[self.order.partition_point(|id| self.slices[id.0].domain.upper() < t)];
    if self.slices[id.0].domain.upper() == t {
      self.set_output_gate(id, y);
    }
    else {
      self.set_input_gate(id, y);
    }
  }

  /// Overwrites the envelope of a slice; its gates are narrowed to it.
  pub fn set_envelope(&mut self, id: SliceId, y: Interval) {
    let s = &mut self.slices[id.0];
    s.envelope = y;
    s.input_gate = s.input_gate.intersection(&y);
    s.output_gate = s.output_gate.intersection(&y);
    let (input, output, prev, next) = (s.input_gate, s.output_gate, s.prev, s.next);
    if let Some(prev) = prev {
      self.slices[prev.0].output_gate = input;
    }
    if let Some(next) = next {
      self.slices[next.0].input_gate = output;
    }
    self.touch();
  }

  /// Overwrites the input gate of a slice, shared with the previous slice, by `y` intersected with the envelopes of both slices.
  pub fn set_input_gate(&mut self, id: SliceId, y: Interval) {
    let s = &self.slices[id.0];
    let mut gate = y.intersection(&s.envelope);
    if let Some(prev) = s.prev {
      gate = gate.intersection(&self.slices[prev.0].envelope);
      self.slices[prev.0].output_gate = gate;
    }
    self.slices[id.0].input_gate = gate;
    self.touch();
  }

  /// Overwrites the output gate of a slice, shared with the next slice, by `y` intersected with the envelopes of both slices.
  pub fn set_output_gate(&mut self, id: SliceId, y: Interval) {
    let s = &self.slices[id.0];
    let mut gate = y.intersection(&s.envelope);
    if let Some(next) = s.next {
      gate = gate.intersection(&self.slices[next.0].envelope);
      self.slices[next.0].input_gate = gate;
    }
    self.slices[id.0].output_gate = gate;
    self.touch();
  }

  /// Overwrites envelopes with `f(slice domain)` and gates with `f([t])`.
  pub fn set_fn<F>(&mut self, f: F)
  where
    F: Fn(Interval) -> Interval
  {
    let ids = self.order.clone();
    for &id in &ids {
      let domain = self.slices[id.0].domain;
      self.set_envelope(id, f(domain));
    }
    for &id in &ids {
      let t0 = self.slices[id.0].domain.lower();
      self.set_input_gate(id, f(Interval::singleton(t0)));
    }
    let last = ids[ids.len() - 1];
    let tf = self.slices[last.0].domain.upper();
    self.set_output_gate(last, f(Interval::singleton(tf)));
  }

  /// Widens the tube so that it encloses `traj`, whose domain must cover the one of the tube.
  pub fn unite_trajectory(&mut self, traj: &Trajectory) -> Result<()> {
    let domain = self.domain();
    if !domain.is_subset(&traj.domain()) {
      return Err(TubeError::IntervalOutOfDomain { t: domain, domain: traj.domain() });
    }
    let mut envelopes = Vec::with_capacity(self.nb_slices());
    for s in self.slices() {
      envelopes.push(s.envelope.hull(&traj.eval(s.domain)?));
    }
    for (k, &id) in self.order.iter().enumerate() {
      let s = &mut self.slices[id.0];
      s.envelope = envelopes[k];
      s.input_gate = s.input_gate.hull(&traj.value(s.domain.lower()));
      s.output_gate = s.output_gate.hull(&traj.value(s.domain.upper()));
    }
    self.touch();
    Ok(())
  }

  /// Widens every envelope, then every gate, by `rad`.
  pub fn inflate(&mut self, rad: f64) -> Result<()> {
    if !(rad >= 0.0) {
      return Err(TubeError::invalid_argument(format!("inflation radius must be non-negative, got {}", rad)));
    }
    for s in &mut self.slices {
      s.envelope = s.envelope.inflate(rad);
    }
    for s in &mut self.slices {
      s.input_gate = s.input_gate.inflate(rad);
      s.output_gate = s.output_gate.inflate(rad);
    }
    self.touch();
    Ok(())
  }

  /// Widens the tube by the time-varying radius `rad`, a non-negative trajectory over the same domain.
  pub fn inflate_with(&mut self, rad: &Trajectory) -> Result<()> {
    let domain = self.domain();
    if rad.domain() != domain {
      return Err(TubeError::IntervalOutOfDomain { t: rad.domain(), domain });
    }
    if !(rad.codomain().lower() >= 0.0) {
      return Err(TubeError::invalid_argument("inflation radius must be non-negative"));
    }
    let mut radii = Vec::with_capacity(self.nb_slices());
    for s in self.slices() {
      radii.push(rad.eval(s.domain)?.upper());
    }
    for (k, &id) in self.order.iter().enumerate() {
      let s = &mut self.slices[id.0];
      s.envelope = s.envelope.inflate(radii[k]);
    }
    for s in &mut self.slices {
      s.input_gate = s.input_gate.inflate(rad.value(s.domain.lower()));
      s.output_gate = s.output_gate.inflate(rad.value(s.domain.upper()));
    }
    self.touch();
    Ok(())
  }

  // Other operations.

  /// Two copies of the tube whose values at `t` are the two parts of the bisection of the current value.
  pub fn bisect(&self, t: f64, ratio: f64) -> Result<(Tube, Tube)> {
    if !(ratio > 0.0 && ratio < 1.0) {
      return Err(TubeError::invalid_argument(format!("bisection ratio must lie in ]0,1[, got {}", ratio)));
    }
    let (left, right) = self.eval_at(t)?.bisect(ratio)?;
    let (mut a, mut b) = (self.clone(), self.clone());
    a.set_at(left, t)?;
    b.set_at(right, t)?;
    Ok((a, b))
  }

  /// Primitive of the tube with initial value `x0`.
  pub fn primitive(&self, x0: Interval) -> Result<Tube> {
    let mut res = self.clone();
    res.set(Interval::whole());
    res.set_at(x0, self.domain().lower())?;
    CtcDeriv::new()
      .with_propagation(TimePropag::Forward)
      .contract_tubes(&mut res, self)?;
    Ok(res)
  }

  // Enclosures of `∫ env.lb` and `∫ env.ub` from the beginning of the tube to `t`, `t` lying in the slice `index`.
  fn primitives_at(&self, aggregate: &Aggregate, index: usize, t: f64) -> (Interval, Interval) {
    let s = self.slice(self.order[index]);
    let (lo, hi) = aggregate.primitives_at_bound(index);
    let dt = Interval::singleton(t) - Interval::singleton(s.domain.lower());
    (lo + dt * s.envelope.lower(), hi + dt * s.envelope.upper())
  }

  /// Ranges over `t` of the primitives of the lower and of the upper bounds of the tube.
  pub fn partial_integral(&self, t: Interval) -> Result<(Interval, Interval)> {
    self.check_subdomain(t)?;
    if t.is_empty() {
      return Ok((Interval::empty(), Interval::empty()));
    }
    let (i, j) = (self.index_of(t.lower())?, self.index_of(t.upper())?);
    let aggregate = self.aggregate();
    let summary = aggregate.query(0, j);
    if summary.has_empty {
      return Ok((Interval::empty(), Interval::empty()));
    }
    if summary.codomain.is_unbounded() {
      return Ok((Interval::whole(), Interval::whole()));
    }
    let (lo_a, hi_a) = self.primitives_at(&aggregate, i, t.lower());
    let (lo_b, hi_b) = self.primitives_at(&aggregate, j, t.upper());
    let (mut lo, mut hi) = (lo_a.hull(&lo_b), hi_a.hull(&hi_b));
    if j > i {
      let (lo_m, hi_m) = aggregate.primitives_at_bound(i + 1);
      lo = lo.hull(&lo_m);
      hi = hi.hull(&hi_m);
    }
    if j > i + 1 {
      let middle = aggregate.query(i + 1, j - 1);
      lo = lo.hull(&middle.lower_primitive);
      hi = hi.hull(&middle.upper_primitive);
    }
    Ok((lo, hi))
  }

  pub fn partial_integral_between(&self, t1: Interval, t2: Interval) -> Result<(Interval, Interval)> {
    let (lo1, hi1) = self.partial_integral(t1)?;
    let (lo2, hi2) = self.partial_integral(t2)?;
    Ok((lo2 - lo1, hi2 - hi1))
  }

  /// Enclosure of the integral from the lower bound of the domain to `t`.
  pub fn integral(&self, t: Interval) -> Result<Interval> {
    self.integral_between(Interval::singleton(self.domain().lower()), t)
  }

  pub fn integral_between(&self, t1: Interval, t2: Interval) -> Result<Interval> {
    let (lo, hi) = self.partial_integral_between(t1, t2)?;
    if lo.is_empty() || hi.is_empty() {
      return Ok(Interval::empty());
    }
    let (lb, ub) = (lo.lower(), hi.upper());
    Ok(Interval::new(lb.min(ub), lb.max(ub)))
  }

  // Contractors.

  pub fn ctc_fwd(&mut self, v: &Tube) -> Result<bool> {
    CtcDeriv::new().with_propagation(TimePropag::Forward).contract_tubes(self, v)
  }

  pub fn ctc_bwd(&mut self, v: &Tube) -> Result<bool> {
    CtcDeriv::new().with_propagation(TimePropag::Backward).contract_tubes(self, v)
  }

  pub fn ctc_fwd_bwd(&mut self, v: &Tube) -> Result<bool> {
    CtcDeriv::new().contract_tubes(self, v)
  }

  /// Observation `z` of the tube at some time of `t`.
  pub fn ctc_eval(&mut self, t: &mut Interval, z: &mut Interval, v: &mut Tube) -> Result<bool> {
    CtcEval::new().contract_tubes(t, z, self, v)
  }

  pub(crate) fn log_change(&self, what: &str, changed: bool) {
    debug!("{}: {} slices, changed = {}, volume = {}", what, self.nb_slices(), changed, self.volume());
  }
}

fn check_domain(domain: Interval) -> Result<()> {
  if domain.is_empty() || domain.is_unbounded() || domain.is_degenerate() {
    Err(TubeError::invalid_argument(format!("{} is not a valid tube domain", domain)))
  }
  else {
    Ok(())
  }
}

fn gather(locals: Vec<Interval>) -> IntervalSet {
  let mut res = IntervalSet::empty();
  let mut current = Interval::empty();
  for local in locals {
    if local.is_empty() {
      res.join_or_push(current);
      current = Interval::empty();
    }
    else {
      current = current.hull(&local);
    }
  }
  res.join_or_push(current);
  res
}

impl Clone for Tube
{
  fn clone(&self) -> Tube {
    Tube {
      slices: self.slices.clone(),
      order: self.order.clone(),
      cache: RefCell::new(Aggregate::default()),
      dirty: Cell::new(true)
    }
  }
}

impl PartialEq for Tube
{
  fn eq(&self, other: &Tube) -> bool {
    Tube::same_slicing(self, other)
    && self.slices().zip(other.slices()).all(|(x, y)| x == y)
  }
}

impl std::ops::Index<SliceId> for Tube
{
  type Output = Slice;

  fn index(&self, id: SliceId) -> &Slice {
    self.slice(id)
  }
}

impl Display for Tube
{
  fn fmt(&self, formatter: &mut Formatter) -> std::result::Result<(), Error> {
    write!(formatter, "Tube {}↦{}, {} slice{}",
      self.domain(), self.codomain(), self.nb_slices(),
      if self.nb_slices() > 1 { "s" } else { "" })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_relative_eq;

  fn i(lb: f64, ub: f64) -> Interval {
    Interval::new(lb, ub)
  }

  fn staircase() -> Tube {
    // [0,1]: [0,1], [1,2]: [1,2], ... [4,5]: [4,5]
    let mut x = Tube::with_timestep(i(0.0, 5.0), 1.0, Interval::whole()).unwrap();
    for k in 0..5 {
      let id = x.slice_ids()[k];
      x.set_envelope(id, i(k as f64, k as f64 + 1.0));
    }
    x
  }

  #[test]
  fn construction_test() {
    let x = Tube::with_timestep(i(0.0, 5.0), 0.05, Interval::whole()).unwrap();
    assert_eq!(x.nb_slices(), 100);
    assert_eq!(x.domain(), i(0.0, 5.0));
    let x = Tube::with_timestep(i(0.0, 1.0), 0.3, i(-1.0, 1.0)).unwrap();
    assert_eq!(x.nb_slices(), 4);
    assert_relative_eq!(x.last_slice().domain().diam(), 0.1, epsilon = 1e-12);
    assert_eq!(x.wider_slice().domain(), i(0.0, 0.3));
    let x = Tube::with_slices(i(0.0, 1.0), 4, Interval::whole()).unwrap();
    assert_eq!(x.slice_at(1).unwrap().domain(), i(0.25, 0.5));
    assert_eq!(Tube::new(i(0.0, 1.0), i(-1.0, 1.0)).unwrap().nb_slices(), 1);

    assert!(Tube::new(Interval::empty(), Interval::whole()).is_err());
    assert!(Tube::new(i(1.0, 1.0), Interval::whole()).is_err());
    assert!(Tube::new(Interval::pos_reals(), Interval::whole()).is_err());
    assert!(Tube::with_timestep(i(0.0, 1.0), -0.1, Interval::whole()).is_err());
    assert!(Tube::with_slices(i(0.0, 1.0), 0, Interval::whole()).is_err());
  }

  #[test]
  fn from_fn_test() {
    let x = Tube::from_fn(i(0.0, 2.0), 0.5, |t| t * 2.0).unwrap();
    assert_eq!(x.nb_slices(), 4);
    assert_eq!(x.slice_at(1).unwrap().envelope(), i(1.0, 2.0));
    assert_eq!(x.slice_at(1).unwrap().input_gate(), i(1.0, 1.0));
    assert_eq!(x.last_slice().output_gate(), i(4.0, 4.0));
    assert_eq!(x.codomain(), i(0.0, 4.0));
  }

  #[test]
  fn from_trajectory_test() {
    let traj = Trajectory::new(vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
    let x = Tube::from_trajectory(&traj, 0.5, 0.2).unwrap();
    assert_eq!(x.domain(), i(0.0, 2.0));
    assert!(x.contains(&traj).unwrap());
    assert!(x.slice_at(1).unwrap().envelope().is_superset(&i(0.5, 1.0)));
    assert!(x.slice_at(1).unwrap().envelope().diam() < 0.7 + 1e-9);

    let lb = Trajectory::new(vec![(0.0, -1.0), (2.0, -1.0)]);
    let ub = Trajectory::new(vec![(0.0, 1.0), (2.0, 3.0)]);
    let x = Tube::from_bounds(&lb, &ub, 1.0).unwrap();
    assert_eq!(x.slice_at(0).unwrap().envelope(), i(-1.0, 2.0));
    assert_eq!(x.slice_at(1).unwrap().output_gate(), i(-1.0, 3.0));
    let short = Trajectory::new(vec![(0.0, 1.0), (1.0, 3.0)]);
    assert!(Tube::from_bounds(&lb, &short, 1.0).is_err());
  }

  #[test]
  fn index_test() {
    let x = staircase();
    let cases = vec![
      (0.0, 0),
      (0.5, 0),
      (1.0, 0),
      (1.5, 1),
      (4.0, 3),
      (5.0, 4)
    ];
    for (t, k) in cases {
      assert!(x.index_of(t).unwrap() == k, "index_of({}) = {} instead of {}", t, x.index_of(t).unwrap(), k);
    }
    assert!(x.index_of(5.5).is_err());
    assert!(x.index_of(-0.1).is_err());
    assert_eq!(x.get_slice(2.5).unwrap().domain(), i(2.0, 3.0));
    assert!(x.slice_at(5).is_err());
    assert_eq!(x.largest_slice().domain(), i(0.0, 1.0));
  }

  #[test]
  fn gates_test() {
    let x = staircase();
    // Gates are narrowed by both adjacent envelopes.
    assert_eq!(x.eval_at(1.0).unwrap(), i(1.0, 1.0));
    assert_eq!(x.eval_at(0.0).unwrap(), i(0.0, 1.0));
    assert_eq!(x.eval_at(0.5).unwrap(), i(0.0, 1.0));
    let mut x = Tube::with_timestep(i(0.0, 2.0), 1.0, i(-1.0, 1.0)).unwrap();
    let first = x.slice_ids()[0];
    x.set_output_gate(first, i(0.0, 5.0));
    assert_eq!(x.slice_at(0).unwrap().output_gate(), i(0.0, 1.0));
    assert_eq!(x.slice_at(1).unwrap().input_gate(), i(0.0, 1.0));
    x.set_envelope(first, i(0.5, 2.0));
    assert_eq!(x.slice_at(0).unwrap().input_gate(), i(0.5, 1.0));
    assert_eq!(x.slice_at(1).unwrap().input_gate(), i(0.5, 1.0));
  }

  #[test]
  fn sample_test() {
    let mut x = Tube::new(i(0.0, 1.0), i(-1.0, 1.0)).unwrap();
    let original = x.clone();
    x.sample(0.5).unwrap();
    assert_eq!(x.nb_slices(), 2);
    assert_eq!(x.slice_at(0).unwrap().domain(), i(0.0, 0.5));
    assert_eq!(x.slice_at(1).unwrap().domain(), i(0.5, 1.0));
    assert_eq!(x.slice_at(0).unwrap().envelope(), i(-1.0, 1.0));
    assert_eq!(x.slice_at(1).unwrap().envelope(), i(-1.0, 1.0));
    assert_eq!(x.eval_at(0.5).unwrap(), i(-1.0, 1.0));
    assert!(!Tube::same_slicing(&x, &original));
    let ids = x.slice_ids().to_vec();
    assert_eq!(x[ids[0]].next(), Some(ids[1]));
    assert_eq!(x[ids[1]].prev(), Some(ids[0]));
    x.sample(0.5).unwrap();
    assert_eq!(x.nb_slices(), 2);
    assert!(x.sample(2.0).is_err());
  }

  #[test]
  fn sampling_preserves_evaluation() {
    let mut x = staircase();
    let times: Vec<f64> = (0..=50).map(|k| k as f64 * 0.1).collect();
    let before: Vec<Interval> = times.iter().map(|&t| x.eval_at(t).unwrap()).collect();
    x.sample_all(&[0.25, 2.5, 3.7, 4.0]).unwrap();
    assert_eq!(x.nb_slices(), 8);
    for (t, y) in times.iter().zip(before) {
      assert!(x.eval_at(*t).unwrap() == y, "value at {} changed after sampling", t);
    }
    assert!(x.sample_all(&[1.5, 7.0]).is_err());
    assert_eq!(x.nb_slices(), 8);
  }

  #[test]
  fn sample_with_gate_test() {
    let mut x = Tube::with_timestep(i(0.0, 2.0), 1.0, i(-1.0, 1.0)).unwrap();
    x.sample_with_gate(0.5, i(0.0, 3.0)).unwrap();
    assert_eq!(x.eval_at(0.5).unwrap(), i(0.0, 1.0));
    x.sample_with_gate(1.0, i(-3.0, -0.5)).unwrap();
    assert_eq!(x.eval_at(1.0).unwrap(), i(-1.0, -0.5));
    assert_eq!(x.slice_at(2).unwrap().input_gate(), i(-1.0, -0.5));
  }

  #[test]
  fn same_slicing_test() {
    let a = staircase();
    let mut b = staircase();
    assert!(Tube::same_slicing(&a, &a));
    assert!(Tube::same_slicing(&a, &b) && Tube::same_slicing(&b, &a));
    b.sample(0.5).unwrap();
    assert!(!Tube::same_slicing(&a, &b) && !Tube::same_slicing(&b, &a));
    assert!(a.is_subset(&b).is_err());
  }

  #[test]
  fn structure_test() {
    let mut x = staircase();
    x.sample(0.5).unwrap();
    assert!(x.check_structure().is_ok());

    let ids = x.slice_ids().to_vec();
    let mut unlinked = x.clone();
    unlinked.slices[ids[1].0].next = None;
    let mut diverged = x.clone();
    diverged.slices[ids[1].0].output_gate = i(10.0, 11.0);
    let mut dangling = x.clone();
    dangling.order[2] = SliceId(100);
    for corrupted in [unlinked, diverged, dangling] {
      let err = corrupted.check_structure().unwrap_err();
      assert_eq!(err.kind(), ErrorKind::InvalidComponent);
      assert!(err.is_fatal());
    }
  }

  #[test]
  fn evaluation_test() {
    let x = staircase();
    assert_eq!(x.codomain(), i(0.0, 5.0));
    assert_eq!(x.eval_over(i(0.5, 2.5)).unwrap(), i(0.0, 3.0));
    assert_eq!(x.eval_over(i(1.0, 2.5)).unwrap(), i(1.0, 3.0));
    assert_eq!(x.eval_over(i(0.2, 0.4)).unwrap(), i(0.0, 1.0));
    assert_eq!(x.eval_over(i(3.0, 3.0)).unwrap(), i(3.0, 3.0));
    assert!(x.eval_over(i(3.0, 6.0)).is_err());
    assert_eq!(x.eval(i(0.5, 3.5)).unwrap(), (i(0.0, 3.0), i(1.0, 4.0)));
    assert_eq!(x.value_at_index(2).unwrap(), i(2.0, 3.0));
    assert_eq!(x.volume(), 5.0);
    assert_eq!(x.max_thickness(), 1.0);
    assert_eq!(x.max_gate_thickness(), (1.0, 0.0));
  }

  #[test]
  fn invert_test() {
    let x = Tube::with_timestep(i(0.0, 5.0), 0.1, i(0.0, 1.0)).unwrap();
    assert!(x.invert(i(2.0, 3.0), i(0.0, 5.0)).is_empty());
    assert!(x.invert_all(i(2.0, 3.0), i(0.0, 5.0)).is_empty());
    assert_eq!(x.invert(i(0.5, 3.0), i(1.0, 2.0)), i(1.0, 2.0));

    let x = staircase();
    assert_eq!(x.invert(i(1.5, 2.5), x.domain()), i(1.0, 3.0));
    assert_eq!(x.invert(i(1.5, 2.5), i(0.0, 1.5)), i(1.0, 1.5));
    let mut y = Tube::with_timestep(i(0.0, 3.0), 1.0, Interval::whole()).unwrap();
    for (k, v) in vec![i(0.0, 1.0), i(0.8, 2.0), i(0.0, 1.0)].into_iter().enumerate() {
      y.set_slice(v, k).unwrap();
    }
    let all = y.invert_all(i(0.5, 0.7), y.domain());
    assert_eq!(all.interval_count(), 2);
    assert_eq!(all.span(), i(0.0, 3.0));
    assert!(!all.contains(&1.5));
    assert_eq!(y.invert(i(0.5, 0.7), y.domain()), i(0.0, 3.0));
  }

  #[test]
  fn invert_with_derivative_test() {
    // x(0) = 0 and x' in [1, 2]: x reaches [3, 10] on [1.5, 4] only.
    let v = Tube::with_timestep(i(0.0, 4.0), 0.5, i(1.0, 2.0)).unwrap();
    let x = v.primitive(Interval::singleton(0.0)).unwrap();
    let t = x.invert_with_derivative(i(3.0, 10.0), &v, x.domain()).unwrap();
    assert!(t.lower() > 1.4 && t.lower() <= 1.5);
    assert_eq!(t.upper(), 4.0);
    let without = x.invert(i(3.0, 10.0), x.domain());
    assert!(without.is_superset(&t));
    let w = Tube::with_timestep(i(0.0, 4.0), 1.0, i(1.0, 2.0)).unwrap();
    assert!(x.invert_with_derivative(i(3.0, 10.0), &w, x.domain()).is_err());
  }

  #[test]
  fn interpol_test() {
    let v = Tube::with_timestep(i(0.0, 2.0), 1.0, i(0.0, 1.0)).unwrap();
    let x = v.primitive(Interval::singleton(0.0)).unwrap();
    let y = x.interpol(i(0.5, 0.5), &v).unwrap();
    assert!(y.is_superset(&i(0.0, 0.5)) && y.diam() < 0.5 + 1e-9);
    let y = x.interpol(i(1.0, 1.0), &v).unwrap();
    assert!(y.is_superset(&i(0.0, 1.0)) && y.diam() < 1.0 + 1e-9);
    let y = x.interpol(i(0.0, 2.0), &v).unwrap();
    assert!(y.is_superset(&i(0.0, 2.0)) && y.diam() < 2.0 + 1e-9);
  }

  #[test]
  fn comparison_test() {
    let big = Tube::with_timestep(i(0.0, 2.0), 1.0, i(-2.0, 2.0)).unwrap();
    let small = Tube::with_timestep(i(0.0, 2.0), 1.0, i(-1.0, 1.0)).unwrap();
    assert!(small.is_subset(&big).unwrap());
    assert!(small.is_strict_subset(&big).unwrap());
    assert!(small.is_interior_subset(&big).unwrap());
    assert!(big.is_superset(&small).unwrap());
    assert!(big.is_strict_superset(&small).unwrap());
    assert!(!big.is_subset(&small).unwrap());
    assert!(!small.is_strict_subset(&small).unwrap());
    assert!(small == small.clone());
    assert!(small != big);
  }

  #[test]
  fn empty_test() {
    let mut x = staircase();
    assert!(!x.is_empty());
    x.set_slice(Interval::empty(), 2).unwrap();
    assert!(x.is_empty());
    assert!(x.slice_at(1).unwrap().output_gate().is_empty());
    x.set_empty();
    assert!(x.codomain().is_empty());
    assert!(x.set_slice(Interval::empty(), 9).is_err());
  }

  #[test]
  fn set_test() {
    let mut x = Tube::with_timestep(i(0.0, 4.0), 1.0, i(-5.0, 5.0)).unwrap();
    x.set_at(i(1.0, 2.0), 2.5).unwrap();
    assert_eq!(x.nb_slices(), 5);
    assert_eq!(x.eval_at(2.5).unwrap(), i(1.0, 2.0));
    x.set_over(i(0.0, 1.0), i(0.5, 1.5)).unwrap();
    assert_eq!(x.nb_slices(), 7);
    assert_eq!(x.eval_over(i(0.6, 1.4)).unwrap(), i(0.0, 1.0));
    assert_eq!(x.eval_at(0.5).unwrap(), i(0.0, 1.0));
    assert_eq!(x.eval_at(0.25).unwrap(), i(-5.0, 5.0));
    assert!(x.set_over(i(0.0, 1.0), i(3.0, 5.0)).is_err());
    x.set(i(0.0, 0.0));
    assert_eq!(x.codomain(), i(0.0, 0.0));
  }

  #[test]
  fn inflate_test() {
    let mut x = staircase();
    x.inflate(0.5).unwrap();
    assert_eq!(x.slice_at(0).unwrap().envelope(), i(-0.5, 1.5));
    assert_eq!(x.eval_at(1.0).unwrap(), i(0.5, 1.5));
    assert!(x.inflate(-1.0).is_err());

    let mut x = Tube::with_timestep(i(0.0, 2.0), 1.0, i(0.0, 0.0)).unwrap();
    let rad = Trajectory::new(vec![(0.0, 0.0), (2.0, 2.0)]);
    x.inflate_with(&rad).unwrap();
    assert_eq!(x.slice_at(0).unwrap().envelope(), i(-1.0, 1.0));
    assert_eq!(x.slice_at(1).unwrap().envelope(), i(-2.0, 2.0));
    assert_eq!(x.eval_at(0.0).unwrap(), i(0.0, 0.0));
    assert_eq!(x.eval_at(1.0).unwrap(), i(-1.0, 1.0));
    let negative = Trajectory::new(vec![(0.0, -1.0), (2.0, 1.0)]);
    assert!(x.inflate_with(&negative).is_err());
    let short = Trajectory::new(vec![(0.0, 1.0), (1.0, 1.0)]);
    assert!(x.inflate_with(&short).is_err());
  }

  #[test]
  fn bisect_test() {
    let x = Tube::with_timestep(i(0.0, 2.0), 1.0, i(0.0, 4.0)).unwrap();
    let (a, b) = x.bisect(0.5, 0.5).unwrap();
    assert_eq!(a.eval_at(0.5).unwrap(), i(0.0, 2.0));
    assert_eq!(b.eval_at(0.5).unwrap(), i(2.0, 4.0));
    assert_eq!(a.eval_at(1.5).unwrap(), i(0.0, 4.0));
    assert_eq!(x.nb_slices(), 2);
    assert!(x.bisect(0.5, 1.0).is_err());
    let mut y = x.clone();
    y.set_at(i(1.0, 1.0), 1.0).unwrap();
    assert_eq!(y.bisect(1.0, 0.5).unwrap_err().kind(), ErrorKind::DegenerateBisection);
  }

  #[test]
  fn hull_test() {
    let a = Tube::with_timestep(i(0.0, 2.0), 1.0, i(0.0, 1.0)).unwrap();
    let b = Tube::with_timestep(i(0.0, 2.0), 1.0, i(3.0, 4.0)).unwrap();
    let h = Tube::hull(&[a.clone(), b]).unwrap();
    assert_eq!(h.codomain(), i(0.0, 4.0));
    assert_eq!(h.eval_at(1.0).unwrap(), i(0.0, 4.0));
    let c = Tube::with_timestep(i(0.0, 2.0), 0.5, i(3.0, 4.0)).unwrap();
    assert!(Tube::hull(&[a, c]).is_err());
    assert!(Tube::hull(&[]).is_err());
  }

  #[test]
  fn integral_test() {
    let x = Tube::with_timestep(i(0.0, 10.0), 1.0, i(1.0, 2.0)).unwrap();
    assert_eq!(x.integral(i(5.0, 5.0)).unwrap(), i(5.0, 10.0));
    assert_eq!(x.integral(i(2.5, 2.5)).unwrap(), i(2.5, 5.0));
    assert_eq!(x.integral_between(i(2.0, 2.0), i(4.0, 4.0)).unwrap(), i(2.0, 4.0));
    assert_eq!(x.integral(i(4.0, 6.0)).unwrap(), i(4.0, 12.0));
    assert_eq!(x.partial_integral(i(1.5, 3.5)).unwrap(), (i(1.5, 3.5), i(3.0, 7.0)));

    let x = staircase();
    let (lo, hi) = x.partial_integral(i(0.0, 5.0)).unwrap();
    assert_eq!(lo, i(0.0, 10.0));
    assert_eq!(hi, i(0.0, 15.0));

    let mut y = x.clone();
    y.set_slice(Interval::whole(), 3).unwrap();
    assert_eq!(y.integral(i(2.0, 2.0)).unwrap(), i(1.0, 3.0));
    assert_eq!(y.integral(i(4.5, 4.5)).unwrap(), Interval::whole());
    y.set_slice(Interval::empty(), 4).unwrap();
    assert!(y.integral(i(4.5, 4.5)).unwrap().is_empty());
    assert_eq!(y.integral(i(1.5, 1.5)).unwrap(), i(0.5, 2.0));
  }

  #[test]
  fn cache_invalidation_test() {
    let mut x = staircase();
    assert_eq!(x.codomain(), i(0.0, 5.0));
    let copy = x.clone();
    x.set_slice(i(-3.0, 0.0), 0).unwrap();
    assert_eq!(x.codomain(), i(-3.0, 5.0));
    assert_eq!(copy.codomain(), i(0.0, 5.0));
    x.inflate(1.0).unwrap();
    assert_eq!(x.codomain(), i(-4.0, 6.0));
  }

  #[test]
  fn display_test() {
    let x = staircase();
    assert_eq!(format!("{}", x), "Tube [0, 5]↦[0, 5], 5 slices");
  }
}
