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
//! Timeline backed directly by an evolution function

use super::{validate_timestamp, EvolutionFunction, Timeline};
use crate::error::Result;
use crate::model::AssemblySnapshot;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Timeline that evaluates its evolution function on every query
///
/// The timeline owns only the initial snapshot and the function; it never
/// looks at the assembly topology. Each result is checked to contain
/// exactly the components of the initial snapshot.
#[derive(Clone)]
pub struct FunctionTimeline {
    initial: AssemblySnapshot,
    evolution: Arc<dyn EvolutionFunction>,
}

impl FunctionTimeline {
    /// Create a timeline from an initial snapshot and an evolution function
    pub fn new(initial: AssemblySnapshot, evolution: impl EvolutionFunction + 'static) -> Self {
        Self::from_shared(initial, Arc::new(evolution))
    }

    /// Create a timeline sharing an existing evolution function
    pub fn from_shared(initial: AssemblySnapshot, evolution: Arc<dyn EvolutionFunction>) -> Self {
        FunctionTimeline { initial, evolution }
    }

    /// Get the evolution function
    pub fn evolution(&self) -> &Arc<dyn EvolutionFunction> {
        &self.evolution
    }

    /// Compute snapshots for many timestamps
    ///
    /// Results are in the order of `timestamps`. With the `parallel`
    /// feature the timestamps are evaluated on the rayon thread pool.
    ///
    /// # Errors
    ///
    /// The first error encountered by any evaluation.
    pub fn sample(&self, timestamps: &[f64]) -> Result<Vec<AssemblySnapshot>> {
        #[cfg(feature = "parallel")]
        {
            timestamps
                .par_iter()
                .map(|&timestamp| self.snapshot_at(timestamp))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            timestamps
                .iter()
                .map(|&timestamp| self.snapshot_at(timestamp))
                .collect()
        }
    }
}

impl Timeline for FunctionTimeline {
    fn initial_snapshot(&self) -> &AssemblySnapshot {
        &self.initial
    }

    fn snapshot_at(&self, timestamp: f64) -> Result<AssemblySnapshot> {
        let timestamp = validate_timestamp(timestamp)?;
        let snapshot = self.evolution.evolve(&self.initial, timestamp)?;
        if let Err(err) = snapshot.ensure_complete(&self.initial) {
            ftlog::warn!("Evolution function output at t = {timestamp} rejected: {err}");
            return Err(err);
        }
        Ok(snapshot)
    }
}

impl fmt::Debug for FunctionTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTimeline")
            .field("components", &self.initial.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{AttributeSchema, Component};

    fn initial() -> AssemblySnapshot {
        let schema = AttributeSchema::standalone();
        let body = Component::dynamic_body("body")
            .x(0.0)
            .y(0.0)
            .vx(2.0)
            .mass(1.0)
            .build(&schema)
            .unwrap();
        AssemblySnapshot::builder()
            .kinematic_model("body", body.initial_model(&schema).unwrap())
            .build()
    }

    fn drift(initial: &AssemblySnapshot, t: f64) -> Result<AssemblySnapshot> {
        let body = initial.get_dynamic("body")?;
        let moved = body.to_builder().x(body.x() + body.vx() * t).build()?;
        Ok(initial.to_builder().kinematic_model("body", moved).build())
    }

    #[test]
    fn test_snapshot_at_zero_matches_initial() {
        let timeline = FunctionTimeline::new(initial(), drift);
        assert_eq!(&timeline.snapshot_at(0.0).unwrap(), timeline.initial_snapshot());
    }

    #[test]
    fn test_repeated_queries_agree() {
        let timeline = FunctionTimeline::new(initial(), drift);
        let a = timeline.snapshot_at(3.0).unwrap();
        let _ = timeline.snapshot_at(1.0).unwrap();
        let b = timeline.snapshot_at(3.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get_dynamic("body").unwrap().x(), 6.0);
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let timeline = FunctionTimeline::new(initial(), drift);
        assert_eq!(
            timeline.snapshot_at(-1.0).unwrap_err(),
            Error::InvalidTimestamp { timestamp: -1.0 }
        );
    }

    #[test]
    fn test_incomplete_output_rejected() {
        let empty = |_: &AssemblySnapshot, _: f64| -> Result<AssemblySnapshot> {
            Ok(AssemblySnapshot::default())
        };
        let timeline = FunctionTimeline::new(initial(), empty);
        assert_eq!(
            timeline.snapshot_at(1.0).unwrap_err(),
            Error::IncompleteSnapshot {
                missing: vec!["body".to_string()]
            }
        );
    }

    #[test]
    fn test_sample_preserves_order() {
        let timeline = FunctionTimeline::new(initial(), drift);
        let snapshots = timeline.sample(&[0.0, 1.0, 2.0, 0.5]).unwrap();
        let xs: Vec<f64> = snapshots
            .iter()
            .map(|s| s.get_dynamic("body").unwrap().x())
            .collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0, 1.0]);
    }

    #[test]
    fn test_sample_propagates_errors() {
        let timeline = FunctionTimeline::new(initial(), drift);
        assert!(timeline.sample(&[1.0, -2.0]).is_err());
    }
}
