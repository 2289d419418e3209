// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Binary files of tubes, little-endian.
//!
//! ```text
//! version: i16
//! slice count: i32, domain: interval, slice count envelopes: interval
//! (version 2) trajectory count: i32, then per trajectory
//!   sample count: i32, samples: (time: f64, value: f64)
//! ```
//!
//! An interval is a tag `i16` (see the `*_TAG` constants), followed by its two bounds `f64` for the tag `BOUNDED_TAG` only. Slices are rebuilt with equal widths, and gates from the envelopes.

use crate::error::*;
use crate::interval::Interval;
use crate::ops::*;
use crate::trajectory::Trajectory;
use crate::tube::Tube;
use gcollections::ops::*;
use log::{info, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub const CURRENT_VERSION: i16 = 2;

pub const BOUNDED_TAG: i16 = 0;
pub const EMPTY_SET_TAG: i16 = 1;
pub const ALL_REALS_TAG: i16 = 2;
pub const POS_REALS_TAG: i16 = 3;
pub const NEG_REALS_TAG: i16 = 4;

fn write_i16<W: Write>(w: &mut W, x: i16) -> Result<()> {
  w.write_all(&x.to_le_bytes())?;
  Ok(())
}

fn write_i32<W: Write>(w: &mut W, x: usize) -> Result<()> {
  let x = i32::try_from(x)
    .map_err(|_| TubeError::invalid_argument(format!("{} elements cannot be stored", x)))?;
  w.write_all(&x.to_le_bytes())?;
  Ok(())
}

fn write_f64<W: Write>(w: &mut W, x: f64) -> Result<()> {
  w.write_all(&x.to_le_bytes())?;
  Ok(())
}

fn read_i16<R: Read>(r: &mut R) -> Result<i16> {
  let mut buf = [0u8; 2];
  r.read_exact(&mut buf)?;
  Ok(i16::from_le_bytes(buf))
}

fn read_count<R: Read>(r: &mut R, what: &str) -> Result<usize> {
  let mut buf = [0u8; 4];
  r.read_exact(&mut buf)?;
  let n = i32::from_le_bytes(buf);
  usize::try_from(n)
    .map_err(|_| TubeError::InvalidFormat(format!("negative {} count {}", what, n)))
}

fn read_f64<R: Read>(r: &mut R) -> Result<f64> {
  let mut buf = [0u8; 8];
  r.read_exact(&mut buf)?;
  Ok(f64::from_le_bytes(buf))
}

pub fn write_interval<W: Write>(w: &mut W, x: Interval) -> Result<()> {
  let tag =
    if x.is_empty() { EMPTY_SET_TAG }
    else if x == Interval::whole() { ALL_REALS_TAG }
    else if x == Interval::pos_reals() { POS_REALS_TAG }
    else if x == Interval::neg_reals() { NEG_REALS_TAG }
    else { BOUNDED_TAG };
  write_i16(w, tag)?;
  if tag == BOUNDED_TAG {
    write_f64(w, x.lower())?;
    write_f64(w, x.upper())?;
  }
  Ok(())
}

pub fn read_interval<R: Read>(r: &mut R) -> Result<Interval> {
  match read_i16(r)? {
    BOUNDED_TAG => {
      let lb = read_f64(r)?;
      let ub = read_f64(r)?;
      if lb.is_nan() || ub.is_nan() || lb > ub {
        return Err(TubeError::InvalidFormat(format!("invalid bounds {} and {}", lb, ub)));
      }
      Ok(Interval::new(lb, ub))
    }
    EMPTY_SET_TAG => Ok(Interval::empty()),
    ALL_REALS_TAG => Ok(Interval::whole()),
    POS_REALS_TAG => Ok(Interval::pos_reals()),
    NEG_REALS_TAG => Ok(Interval::neg_reals()),
    tag => Err(TubeError::InvalidFormat(format!("unknown interval type {}", tag)))
  }
}

/// Writes `tube` in the format `version`; trajectories can only be stored from version 2.
pub fn write_tube<W: Write>(w: &mut W, tube: &Tube, trajectories: &[Trajectory], version: i16) -> Result<()> {
  if version != 1 && version != 2 {
    return Err(TubeError::UnsupportedVersion(version));
  }
  if version == 1 && !trajectories.is_empty() {
    return Err(TubeError::invalid_argument("version 1 files cannot store trajectories"));
  }
  write_i16(w, version)?;
  write_i32(w, tube.nb_slices())?;
  write_interval(w, tube.domain())?;
  for s in tube.slices() {
    write_interval(w, s.envelope())?;
  }
  if version >= 2 {
    write_i32(w, trajectories.len())?;
    for traj in trajectories {
      write_i32(w, traj.len())?;
      for &(t, y) in traj.samples() {
        write_f64(w, t)?;
        write_f64(w, y)?;
      }
    }
  }
  Ok(())
}

/// Reads a tube and its trajectories. Nothing is built before the whole content is read.
pub fn read_tube<R: Read>(r: &mut R) -> Result<(Tube, Vec<Trajectory>)> {
  let version = read_i16(r)?;
  if version != 1 && version != 2 {
    warn!("unsupported tube file version {}", version);
    return Err(TubeError::UnsupportedVersion(version));
  }
  let n = read_count(r, "slice")?;
  if n == 0 {
    return Err(TubeError::InvalidFormat("a tube has at least one slice".into()));
  }
  let domain = read_interval(r)?;
  if domain.is_empty() || domain.is_unbounded() || domain.is_degenerate() {
    return Err(TubeError::InvalidFormat(format!("invalid tube domain {}", domain)));
  }
  let mut envelopes = Vec::with_capacity(n.min(1 << 16));
  for _ in 0..n {
    envelopes.push(read_interval(r)?);
  }
  let mut trajectories = vec![];
  if version >= 2 {
    let count = read_count(r, "trajectory")?;
    for _ in 0..count {
      let len = read_count(r, "sample")?;
      let mut samples = Vec::with_capacity(len.min(1 << 16));
      for _ in 0..len {
        let t = read_f64(r)?;
        let y = read_f64(r)?;
        samples.push((t, y));
      }
      trajectories.push(Trajectory::new(samples));
    }
  }

  let mut tube = Tube::with_slices(domain, n, Interval::whole())
    .map_err(|e| TubeError::InvalidFormat(e.to_string()))?;
  let ids = tube.slice_ids().to_vec();
  for (id, y) in ids.into_iter().zip(envelopes) {
    tube.set_envelope(id, y);
  }
  Ok((tube, trajectories))
}

impl Tube
{
  /// Saves the tube and `trajectories` to the file `path` in the current format.
  pub fn serialize<P: AsRef<Path>>(&self, path: P, trajectories: &[Trajectory]) -> Result<()> {
    let mut w = BufWriter::new(File::create(path.as_ref())?);
    write_tube(&mut w, self, trajectories, CURRENT_VERSION)?;
    w.flush()?;
    info!("{} saved to {}", self, path.as_ref().display());
    Ok(())
  }

  pub fn deserialize<P: AsRef<Path>>(path: P) -> Result<(Tube, Vec<Trajectory>)> {
    let mut r = BufReader::new(File::open(path.as_ref())?);
    let res = read_tube(&mut r)?;
    info!("{} loaded from {}", res.0, path.as_ref().display());
    Ok(res)
  }
}
