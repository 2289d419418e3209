// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Evaluation contractor: `z = x(t)` for some `t`, knowing `x' = v`.
//!
//! The observation `z` is narrowed to the values the tube can take over `t`, and `t` to the instants at which the tube can reach `z`. When propagation is on, the observation is then injected in `x` as gates at the bounds of `t` and spread to the whole tube by a derivative contraction.

use crate::ctc::*;
use crate::interval::Interval;
use crate::ops::*;
use crate::tube::Tube;
use gcollections::ops::*;
use log::debug;

#[derive(Debug, Copy, Clone)]
pub struct CtcEval {
  propagate: bool,
  deriv: CtcDeriv
}

impl CtcEval
{
  pub fn new() -> CtcEval {
    CtcEval::default()
  }

  /// Without propagation, only `t` and `z` are narrowed.
  pub fn with_propagation(self, propagate: bool) -> CtcEval {
    CtcEval { propagate, ..self }
  }

  pub fn propagates(&self) -> bool {
    self.propagate
  }

  /// Narrows `t`, `z` and, if propagation is on, `x`. The derivative `v` is only sampled so that it keeps the slicing of `x`.
  pub fn contract_tubes(&self, t: &mut Interval, z: &mut Interval, x: &mut Tube, v: &mut Tube) -> Result<bool> {
    if !Tube::same_slicing(x, v) {
      return Err(TubeError::StructureMismatch);
    }
    let mut new_t = t.intersection(&x.domain());
    let new_z = z.intersection(&x.interpol(new_t, v)?);
    new_t = new_t.intersection(&x.invert_with_derivative(new_z, v, new_t)?);
    let mut changed = new_t != *t || new_z != *z;

    if new_t.is_empty() || new_z.is_empty() {
      debug!("CtcEval: inconsistent observation {} at {}", z, t);
      *t = Interval::empty();
      *z = Interval::empty();
      if self.propagate && !x.is_empty() {
        x.set_empty();
        changed = true;
      }
      return Ok(changed);
    }
    *t = new_t;
    *z = new_z;

    if self.propagate {
      if new_t.is_degenerate() {
        v.sample(new_t.lower())?;
        changed |= inject(x, new_t.lower(), new_z)?;
      }
      else {
        let (lb, ub) = (new_t.lower(), new_t.upper());
        v.sample(lb)?;
        v.sample(ub)?;
        // Between a bound of `t` and the instant of the observation, `x` drifts by at most `[0, diam t] * v(t)`.
        let drift = Interval::new(0.0, new_t.diam()) * v.eval_over(new_t)?;
        changed |= inject(x, lb, new_z - drift)?;
        changed |= inject(x, ub, new_z + drift)?;
      }
      changed |= self.deriv.contract_tubes(x, v)?;
    }
    x.log_change("CtcEval", changed);
    Ok(changed)
  }
}

// Samples `x` at `t` and narrows the new gate with `gate`.
fn inject(x: &mut Tube, t: f64, gate: Interval) -> Result<bool> {
  x.sample(t)?;
  let before = x.eval_at(t)?;
  x.sample_with_gate(t, gate)?;
  Ok(x.eval_at(t)? != before)
}

impl Default for CtcEval
{
  fn default() -> CtcEval {
    CtcEval { propagate: true, deriv: CtcDeriv::new() }
  }
}

impl Contractor for CtcEval
{
  /// Domains: `(t, z, x, v)`.
  fn contract(&self, domains: &mut [Domain<'_>]) -> Result<bool> {
    match domains {
      [Domain::Interval(t), Domain::Interval(z), Domain::Tube(x), Domain::Tube(v)] =>
        self.contract_tubes(t, z, x, v),
      _ => Err(invalid_domains("CtcEval", "(interval, interval, tube, tube)", domains))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn i(lb: f64, ub: f64) -> Interval {
    Interval::new(lb, ub)
  }

  // `x(t) = t` over `[0, 4]`, sliced every unit.
  fn identity() -> (Tube, Tube) {
    let v = Tube::with_timestep(i(0.0, 4.0), 1.0, i(1.0, 1.0)).unwrap();
    let mut x = Tube::with_timestep(i(0.0, 4.0), 1.0, Interval::whole()).unwrap();
    x.set_at(i(0.0, 0.0), 0.0).unwrap();
    x.ctc_fwd(&v).unwrap();
    (x, v)
  }

  #[test]
  fn observation_at_an_unknown_time() {
    let (mut x, mut v) = identity();
    let (mut t, mut z) = (i(0.0, 4.0), i(2.5, 2.5));
    assert!(CtcEval::new().contract_tubes(&mut t, &mut z, &mut x, &mut v).unwrap());
    assert_eq!(t, i(2.5, 2.5));
    assert_eq!(z, i(2.5, 2.5));
    assert_eq!(x.nb_slices(), 5);
    assert!(Tube::same_slicing(&x, &v));
    assert_eq!(x.eval_at(2.5).unwrap(), i(2.5, 2.5));
  }

  #[test]
  fn without_propagation() {
    let (mut x, mut v) = identity();
    let before = x.clone();
    let (mut t, mut z) = (i(1.0, 3.0), i(1.5, 10.0));
    let ctc = CtcEval::new().with_propagation(false);
    assert!(!ctc.propagates());
    assert!(ctc.contract_tubes(&mut t, &mut z, &mut x, &mut v).unwrap());
    assert_eq!(z, i(1.5, 3.0));
    assert_eq!(t, i(1.5, 3.0));
    assert!(x == before);
  }

  #[test]
  fn inconsistent_observation() {
    let (mut x, mut v) = identity();
    let (mut t, mut z) = (i(0.0, 4.0), i(10.0, 10.0));
    assert!(CtcEval::new().contract_tubes(&mut t, &mut z, &mut x, &mut v).unwrap());
    assert!(t.is_empty() && z.is_empty());
    assert!(x.is_empty());
  }

  #[test]
  fn structure_mismatch() {
    let (mut x, _) = identity();
    let mut v = Tube::with_timestep(i(0.0, 4.0), 0.5, i(1.0, 1.0)).unwrap();
    let (mut t, mut z) = (i(1.0, 1.0), i(1.0, 1.0));
    let err = CtcEval::new().contract_tubes(&mut t, &mut z, &mut x, &mut v).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructureMismatch);
    assert_eq!(t, i(1.0, 1.0));
  }

  #[test]
  fn degenerate_evaluation() {
    let mut xdot = Tube::from_fn(i(0.0, 5.0), 0.05, |t| t.cos() + i(-0.1, 0.1)).unwrap();
    let mut x = xdot.primitive(Interval::singleton(0.0)).unwrap();
    let before = x.volume();
    assert!((before - 3.0414777).abs() < 1e-2, "volume of the primitive: {}", before);
    let (mut t, mut z) = (Interval::singleton(3.125), Interval::singleton(3.125f64.sin()));
    assert!(x.ctc_eval(&mut t, &mut z, &mut xdot).unwrap());
    assert_eq!(t, Interval::singleton(3.125));
    assert!(x.eval_at(3.125).unwrap().contains(&3.125f64.sin()));
    assert!(x.volume() < before);
    assert!((x.volume() - 1.09413453).abs() < 1e-2, "volume after evaluation: {}", x.volume());
  }

  #[test]
  fn generic_contract() {
    let (mut x, mut v) = identity();
    let (mut t, mut z) = (i(0.0, 4.0), i(2.5, 2.5));
    {
      let mut domains = [
        Domain::Interval(&mut t), Domain::Interval(&mut z),
        Domain::Tube(&mut x), Domain::Tube(&mut v)];
      assert!(CtcEval::new().contract(&mut domains).unwrap());
    }
    assert_eq!(t, i(2.5, 2.5));
    let mut domains = [Domain::Tube(&mut x), Domain::Tube(&mut v)];
    assert_eq!(CtcEval::new().contract(&mut domains).unwrap_err().kind(), ErrorKind::InvalidArgument);
  }
}
