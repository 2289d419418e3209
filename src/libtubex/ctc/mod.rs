// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Contractors: operators narrowing domains with respect to a constraint without removing any of its solutions.
//!
//! Each contractor has typed entry points (`contract_tubes`) and implements the generic [`Contractor`](trait.Contractor.html) trait over a list of [`Domain`](enum.Domain.html)s, so that heterogeneous contractors can be applied in turn by a caller looping until nothing changes.

pub mod deriv;
pub mod eval;
pub mod linobs;

pub use self::deriv::CtcDeriv;
pub use self::eval::CtcEval;
pub use self::linobs::CtcLinobs;

use crate::error::*;
use crate::interval::Interval;
use crate::tube::{Tube, TubeVector};

/// Mutable reference to one of the domains handled by the contractors.
#[derive(Debug)]
pub enum Domain<'a> {
  Interval(&'a mut Interval),
  Tube(&'a mut Tube),
  TubeVector(&'a mut TubeVector)
}

impl<'a> Domain<'a>
{
  pub fn kind(&self) -> &'static str {
    match self {
      Domain::Interval(_) => "interval",
      Domain::Tube(_) => "tube",
      Domain::TubeVector(_) => "tube vector"
    }
  }
}

/// Direction of the propagation of information along time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimePropag {
  Forward,
  Backward,
  FwdBwd
}

impl TimePropag
{
  pub fn forward(self) -> bool {
    self != TimePropag::Backward
  }

  pub fn backward(self) -> bool {
    self != TimePropag::Forward
  }
}

impl Default for TimePropag
{
  fn default() -> TimePropag {
    TimePropag::FwdBwd
  }
}

pub trait Contractor
{
  /// Narrows `domains` in place and returns whether one of them changed. Fails with `InvalidDomains` if the list does not match what the contractor expects.
  fn contract(&self, domains: &mut [Domain<'_>]) -> Result<bool>;
}

pub(crate) fn invalid_domains(name: &str, expected: &str, domains: &[Domain<'_>]) -> TubeError {
  let given: Vec<&str> = domains.iter().map(|d| d.kind()).collect();
  TubeError::InvalidDomains(format!("{} expects {}, got ({})", name, expected, given.join(", ")))
}
