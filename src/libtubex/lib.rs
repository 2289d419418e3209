// Copyright 2015 Pierre Talbot (IRCAM)

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! This library computes guaranteed enclosures of unknown functions of time. A [tube](tube/index.html) is an interval-valued function of time, made of slices, enclosing every trajectory consistent with the constraints of a problem. [Contractors](ctc/index.html) narrow tubes with respect to a constraint (derivative, observation, linear dynamics) without ever removing a consistent trajectory.
//!
//! Intervals have floating-point bounds rounded outward, so that every computed enclosure is sound. Set operations follow the traits of the `gcollections` library, arithmetic and a few extra operations are in the [ops module](ops/index.html).
//!
//! # Examples
//!
//! ```rust
//! use tubex::prelude::*;
//!
//! // x' = v with v(t) in [-1, 1], x(0) = 0 and x(2) = 1.
//! let domain = Interval::new(0.0, 2.0);
//! let v = Tube::with_timestep(domain, 0.5, Interval::new(-1.0, 1.0)).unwrap();
//! let mut x = Tube::with_timestep(domain, 0.5, Interval::whole()).unwrap();
//! x.set_at(Interval::singleton(0.0), 0.0).unwrap();
//! x.set_at(Interval::singleton(1.0), 2.0).unwrap();
//! x.ctc_fwd_bwd(&v).unwrap();
//! assert_eq!(x.eval_at(1.0).unwrap(), Interval::new(0.0, 1.0));
//! ```
//!
//! # References
//! * [Tubex library](http://simon-rohou.fr/research/tubex-lib/)
//! * [Boost Interval Arithmetic Library](http://www.boost.org/doc/libs/1_57_0/libs/numeric/interval/doc/interval.html)

pub mod rounding;
pub mod ops;
pub mod interval;
pub mod interval_set;
pub mod error;
pub mod trajectory;
pub mod tube;
pub mod ctc;
pub mod geometry;

pub use crate::interval::Interval;
pub use crate::interval_set::IntervalSet;
pub use crate::error::{ErrorKind, Result, TubeError};
pub use crate::trajectory::Trajectory;
pub use crate::tube::{Tube, TubeVector};

pub mod prelude {
  pub use crate::ops::*;
  pub use gcollections::ops::*;
  pub use crate::interval::Interval;
  pub use crate::interval_set::IntervalSet;
  pub use crate::error::{ErrorKind, TubeError};
  pub use crate::trajectory::Trajectory;
  pub use crate::tube::{Slice, SliceId, Tube, TubeVector};
  pub use crate::ctc::{Contractor, CtcDeriv, CtcEval, CtcLinobs, Domain, TimePropag};
  pub use crate::geometry::{ConvexPolygon, Edge, GrahamScan, IntervalBox, Orientation, Point};
}
