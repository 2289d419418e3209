// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Derivative contractor: `x' = v`.
//!
//! On a slice of width `dt`, the output gate lies in `input + dt * v` and the input gate in `output - dt * v`. A forward sweep narrows the output gates from left to right, a backward sweep the input gates from right to left; after each gate update the envelope is narrowed to the polygon of feasible values between both gates.

use crate::ctc::*;
use crate::interval::Interval;
use crate::ops::*;
use crate::tube::{Tube, TubeVector};
use gcollections::ops::*;
use log::{debug, trace};

/// A combined pass removing less than this share of the volume ends `contract_to_fixpoint`.
const FIXPOINT_RATIO: f64 = 1e-9;

#[derive(Debug, Copy, Clone, Default)]
pub struct CtcDeriv {
  propagation: TimePropag
}

impl CtcDeriv
{
  /// Forward then backward sweep.
  pub fn new() -> CtcDeriv {
    CtcDeriv::default()
  }

  pub fn with_propagation(self, propagation: TimePropag) -> CtcDeriv {
    CtcDeriv { propagation }
  }

  pub fn propagation(&self) -> TimePropag {
    self.propagation
  }

  /// One pass over the slices of `x` in the directions of the contractor. Both tubes must share the same slicing.
  pub fn contract_tubes(&self, x: &mut Tube, v: &Tube) -> Result<bool> {
    if !Tube::same_slicing(x, v) {
      return Err(TubeError::StructureMismatch);
    }
    let n = x.nb_slices();
    let mut changed = false;
    if self.propagation.forward() {
      for k in 0..n {
        changed |= contract_slice_at(x, v, k, TimePropag::Forward);
      }
    }
    if self.propagation.backward() {
      for k in (0..n).rev() {
        changed |= contract_slice_at(x, v, k, TimePropag::Backward);
      }
    }
    x.log_change("CtcDeriv", changed);
    Ok(changed)
  }

  pub fn contract_fwd(&self, x: &mut Tube, v: &Tube) -> Result<bool> {
    self.with_propagation(TimePropag::Forward).contract_tubes(x, v)
  }

  pub fn contract_bwd(&self, x: &mut Tube, v: &Tube) -> Result<bool> {
    self.with_propagation(TimePropag::Backward).contract_tubes(x, v)
  }

  /// Repeats passes until one of them changes nothing, or barely reduces the volume.
  pub fn contract_to_fixpoint(&self, x: &mut Tube, v: &Tube) -> Result<bool> {
    let mut changed = false;
    let mut passes = 0;
    loop {
      let before = x.volume();
      if !self.contract_tubes(x, v)? {
        break;
      }
      changed = true;
      passes += 1;
      // Also stops on infinite volumes, where the difference is not a number.
      if !(before - x.volume() > before * FIXPOINT_RATIO) {
        break;
      }
    }
    debug!("CtcDeriv: fixpoint reached after {} narrowing passes", passes);
    Ok(changed)
  }

  /// Narrows the slice `index` alone, in the directions of the contractor.
  pub fn contract_slice(&self, x: &mut Tube, v: &Tube, index: usize) -> Result<bool> {
    if !Tube::same_slicing(x, v) {
      return Err(TubeError::StructureMismatch);
    }
    if index >= x.nb_slices() {
      return Err(TubeError::IndexOutOfRange { index, len: x.nb_slices() });
    }
    let mut changed = false;
    if self.propagation.forward() {
      changed |= contract_slice_at(x, v, index, TimePropag::Forward);
    }
    if self.propagation.backward() {
      changed |= contract_slice_at(x, v, index, TimePropag::Backward);
    }
    Ok(changed)
  }

  /// Component-wise contraction, every component sharing the slicing of its derivative.
  pub fn contract_vectors(&self, x: &mut TubeVector, v: &TubeVector) -> Result<bool> {
    if x.size() != v.size() {
      return Err(TubeError::invalid_argument(format!(
        "a tube vector of size {} cannot be the derivative of one of size {}", v.size(), x.size())));
    }
    // Every pair is checked before any component is narrowed.
    if x.iter().zip(v.iter()).any(|(xi, vi)| !Tube::same_slicing(xi, vi)) {
      return Err(TubeError::StructureMismatch);
    }
    let mut changed = false;
    for (xi, vi) in x.iter_mut().zip(v.iter()) {
      changed |= self.contract_tubes(xi, vi)?;
    }
    Ok(changed)
  }
}

fn contract_slice_at(x: &mut Tube, v: &Tube, index: usize, direction: TimePropag) -> bool {
  let id = x.slice_ids()[index];
  let dv = v.slice_at(index).map(|s| s.envelope()).unwrap_or(Interval::whole());
  let s = x.slice(id);
  let dt = Interval::singleton(s.domain().upper()) - Interval::singleton(s.domain().lower());
  let mut changed = false;
  match direction {
    TimePropag::Backward => {
      let input = s.input_gate().intersection(&(s.output_gate() - dt * dv));
      if input != s.input_gate() {
        x.set_input_gate(id, input);
        changed = true;
      }
    }
    _ => {
      let output = s.output_gate().intersection(&(s.input_gate() + dt * dv));
      if output != s.output_gate() {
        x.set_output_gate(id, output);
        changed = true;
      }
    }
  }
  let s = x.slice(id);
  let envelope = s.envelope().intersection(&s.interpol(s.domain(), dv));
  if envelope != s.envelope() {
    x.set_envelope(id, envelope);
    changed = true;
  }
  if changed {
    trace!("CtcDeriv: {}", x.slice(id));
  }
  changed
}

impl Contractor for CtcDeriv
{
  /// Domains: `(x, v)` as two tubes or two tube vectors.
  fn contract(&self, domains: &mut [Domain<'_>]) -> Result<bool> {
    match domains {
      [Domain::Tube(x), Domain::Tube(v)] => self.contract_tubes(x, v),
      [Domain::TubeVector(x), Domain::TubeVector(v)] => self.contract_vectors(x, v),
      _ => Err(invalid_domains("CtcDeriv", "(tube, tube) or (tube vector, tube vector)", domains))
    }
  }
}
