// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Failures of tube operations.
//!
//! Every failure is reported immediately; operations check their preconditions before mutating anything, so a failed call leaves its arguments untouched.

use crate::interval::Interval;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TubeError>;

#[derive(Debug, Error)]
pub enum TubeError
{
  #[error("time {t} is outside of the domain {domain}")]
  TimeOutOfDomain { t: f64, domain: Interval },

  #[error("time interval {t} is not included in the domain {domain}")]
  IntervalOutOfDomain { t: Interval, domain: Interval },

  #[error("index {index} is out of range, there are {len} elements")]
  IndexOutOfRange { index: usize, len: usize },

  #[error("tubes do not share the same slicing")]
  StructureMismatch,

  #[error("cannot bisect the degenerate interval {0}")]
  DegenerateBisection(Interval),

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),

  #[error("unsupported file version {0}")]
  UnsupportedVersion(i16),

  #[error("malformed data: {0}")]
  InvalidFormat(String),

  #[error("invalid component: {0}")]
  InvalidComponent(String),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("unexpected list of domains: {0}")]
  InvalidDomains(String)
}

/// Error taxonomy: callers usually recover from everything but `InvalidComponent`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind
{
  Domain,
  StructureMismatch,
  DegenerateBisection,
  Io,
  InvalidComponent,
  InvalidArgument
}

impl TubeError
{
  pub fn kind(&self) -> ErrorKind {
    use self::TubeError::*;
    match self {
      TimeOutOfDomain { .. }
    | IntervalOutOfDomain { .. }
    | IndexOutOfRange { .. } => ErrorKind::Domain,
      StructureMismatch => ErrorKind::StructureMismatch,
      DegenerateBisection(_) => ErrorKind::DegenerateBisection,
      Io(_) | UnsupportedVersion(_) | InvalidFormat(_) => ErrorKind::Io,
      InvalidComponent(_) => ErrorKind::InvalidComponent,
      InvalidArgument(_) | InvalidDomains(_) => ErrorKind::InvalidArgument
    }
  }

  /// Internal corruption, the structure involved should not be used anymore.
  pub fn is_fatal(&self) -> bool {
    self.kind() == ErrorKind::InvalidComponent
  }

  pub fn invalid_argument<S: Into<String>>(msg: S) -> TubeError {
    TubeError::InvalidArgument(msg.into())
  }
}
