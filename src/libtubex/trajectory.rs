// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sampled real function of time.
//!
//! A trajectory is a finite map `t -> x(t)` ordered by time; between two samples it is linearly interpolated. It is used as ground truth, as a seed for building tubes and as a time-varying radius for inflation.

use crate::error::*;
use crate::interval::Interval;
use crate::ops::*;
use gcollections::ops::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Trajectory {
  samples: Vec<(f64, f64)>
}

impl Trajectory
{
  /// Builds a trajectory from `(time, value)` samples given in any order. If a time is given twice, the last value is kept; samples with a `NaN` time are dropped.
  pub fn new<I>(samples: I) -> Trajectory
  where
    I: IntoIterator<Item=(f64, f64)>
  {
    let mut samples: Vec<(f64, f64)> = samples.into_iter()
      .filter(|(t, _)| !t.is_nan())
      .collect();
    // Stable, so duplicates keep their insertion order and the last one wins below.
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut unique: Vec<(f64, f64)> = Vec::with_capacity(samples.len());
    for s in samples {
      match unique.last_mut() {
        Some(last) if last.0 == s.0 => *last = s,
        _ => unique.push(s)
      }
    }
    Trajectory { samples: unique }
  }

  /// Samples `f` at `domain.lb + k * timestep` and at `domain.ub`.
  pub fn from_fn<F>(domain: Interval, timestep: f64, f: F) -> Result<Trajectory>
  where
    F: Fn(f64) -> f64
  {
    if domain.is_empty() || domain.is_unbounded() {
      return Err(TubeError::invalid_argument(format!("cannot sample a function over {}", domain)));
    }
    if !(timestep > 0.0) {
      return Err(TubeError::invalid_argument(format!("timestep must be positive, got {}", timestep)));
    }
    let mut samples = vec![];
    let mut k = 0;
    loop {
      let t = domain.lower() + (k as f64) * timestep;
      if t >= domain.upper() {
        break;
      }
      samples.push((t, f(t)));
      k += 1;
    }
    samples.push((domain.upper(), f(domain.upper())));
    Ok(Trajectory::new(samples))
  }

  pub fn samples(&self) -> &[(f64, f64)] {
    &self.samples
  }

  pub fn len(&self) -> usize {
    self.samples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }

  /// `[first time, last time]`, the empty interval when there is no sample.
  pub fn domain(&self) -> Interval {
    match (self.samples.first(), self.samples.last()) {
      (Some(first), Some(last)) => Interval::new(first.0, last.0),
      _ => Interval::empty()
    }
  }

  /// Hull of the sampled values.
  pub fn codomain(&self) -> Interval {
    self.samples.iter()
      .fold(Interval::empty(), |acc, &(_, x)| acc.hull(&x))
  }

  /// Value at `t`, linearly interpolated between the two surrounding samples. Outside of the domain, it is `NaN`.
  pub fn value(&self, t: f64) -> f64 {
    if !self.domain().contains(&t) {
      return f64::NAN;
    }
    let idx = self.samples.partition_point(|&(ti, _)| ti < t);
    let (t1, x1) = self.samples[idx];
    if t1 == t || idx == 0 {
      x1
    }
    else {
      let (t0, x0) = self.samples[idx - 1];
      x0 + (t - t0) * (x1 - x0) / (t1 - t0)
    }
  }

  pub fn try_value(&self, t: f64) -> Result<f64> {
    if self.domain().contains(&t) {
      Ok(self.value(t))
    }
    else {
      Err(TubeError::TimeOutOfDomain { t, domain: self.domain() })
    }
  }

  /// Hull of the values taken over `t`: the interpolated values at both ends and every sample in between.
  pub fn eval(&self, t: Interval) -> Result<Interval> {
    let domain = self.domain();
    if t.is_empty() {
      return Ok(Interval::empty());
    }
    if !t.is_subset(&domain) {
      return Err(TubeError::IntervalOutOfDomain { t, domain });
    }
    let first = self.samples.partition_point(|&(ti, _)| ti <= t.lower());
    let last = self.samples.partition_point(|&(ti, _)| ti < t.upper());
    let inner = self.samples.get(first..last).unwrap_or(&[]).iter()
      .fold(Interval::empty(), |acc, &(_, x)| acc.hull(&x));
    Ok(inner
      .hull(&self.value(t.lower()))
      .hull(&self.value(t.upper())))
  }

  /// Restricts the trajectory to `domain`, adding interpolated samples at its bounds.
  pub fn truncate_domain(&mut self, domain: Interval) -> Result<()> {
    let current = self.domain();
    if domain.is_empty() || !domain.is_subset(&current) {
      return Err(TubeError::IntervalOutOfDomain { t: domain, domain: current });
    }
    let lb = (domain.lower(), self.value(domain.lower()));
    let ub = (domain.upper(), self.value(domain.upper()));
    self.samples.retain(|&(t, _)| domain.interior_contains(t));
    self.samples.insert(0, lb);
    if ub.0 != lb.0 {
      self.samples.push(ub);
    }
    Ok(())
  }
}
