// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Timelines: snapshots on demand for arbitrary timestamps
//!
//! A timeline pairs an initial snapshot (timestamp 0) with an evolution
//! function `(initial snapshot, timestamp) -> snapshot`. Every query is a
//! pure function call, so timelines can be queried out of order, repeatedly
//! and from several threads at once.
//!
//! # Timelines
//!
//! - `FunctionTimeline`: evaluates the evolution function directly
//! - `FixedIntervalTimeline`: adds a cursor and a refresh interval for
//!   animation loops (`advance`, `tick`)
//!
//! # Evolution Functions
//!
//! Anything implementing `EvolutionFunction` can drive a timeline,
//! including plain closures:
//!
//! ```
//! use kinematic_engine::model::AssemblySnapshot;
//! use kinematic_engine::timeline::{FunctionTimeline, Timeline};
//! use kinematic_engine::Result;
//!
//! let frozen = |initial: &AssemblySnapshot, _t: f64| -> Result<AssemblySnapshot> { Ok(initial.clone()) };
//! let timeline = FunctionTimeline::new(AssemblySnapshot::default(), frozen);
//! assert_eq!(timeline.snapshot_at(1.5).unwrap(), AssemblySnapshot::default());
//! ```

use crate::error::{Error, Result};
use crate::model::AssemblySnapshot;

mod fixed;
mod function;

pub use fixed::FixedIntervalTimeline;
pub use function::FunctionTimeline;

/// Pure mapping from (initial snapshot, timestamp) to a snapshot
///
/// Implementations must not keep hidden mutable state: the same inputs
/// must always produce an equal snapshot, and the result must contain
/// exactly the components of the initial snapshot. Cost and iteration
/// bounds are the implementation's own responsibility.
pub trait EvolutionFunction: Send + Sync {
    /// Compute the snapshot at `timestamp` seconds
    fn evolve(&self, initial: &AssemblySnapshot, timestamp: f64) -> Result<AssemblySnapshot>;
}

impl<F> EvolutionFunction for F
where
    F: Fn(&AssemblySnapshot, f64) -> Result<AssemblySnapshot> + Send + Sync,
{
    fn evolve(&self, initial: &AssemblySnapshot, timestamp: f64) -> Result<AssemblySnapshot> {
        self(initial, timestamp)
    }
}

/// Source of snapshots for arbitrary timestamps
pub trait Timeline: Send + Sync {
    /// Get the snapshot at timestamp 0
    fn initial_snapshot(&self) -> &AssemblySnapshot;

    /// Compute the snapshot at `timestamp` seconds
    ///
    /// # Errors
    ///
    /// `InvalidTimestamp` for negative or non-finite timestamps, plus any
    /// error the evolution function reports.
    fn snapshot_at(&self, timestamp: f64) -> Result<AssemblySnapshot>;
}

/// Reject negative, NaN and infinite timestamps
pub(crate) fn validate_timestamp(timestamp: f64) -> Result<f64> {
    if timestamp.is_finite() && timestamp >= 0.0 {
        Ok(timestamp)
    } else {
        Err(Error::InvalidTimestamp { timestamp })
    }
}
