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
//! Fixed-interval stepping on top of any timeline

use super::{validate_timestamp, FunctionTimeline, Timeline};
use crate::error::{Error, Result};
use crate::model::AssemblySnapshot;

/// Timeline with a cursor, driven at a fixed refresh interval
///
/// `advance(dt)` is `snapshot_at(cursor + dt)` followed by moving the
/// cursor; it never integrates incrementally, so stepping cannot drift
/// from direct queries beyond floating-point rounding of the cursor.
/// The most recent snapshot is cached, so asking again for the cursor
/// timestamp does not re-run the evolution function.
///
/// # Example
///
/// ```
/// use kinematic_engine::model::AssemblySnapshot;
/// use kinematic_engine::timeline::{FixedIntervalTimeline, FunctionTimeline};
/// use kinematic_engine::Result;
///
/// let frozen = |s: &AssemblySnapshot, _t: f64| -> Result<AssemblySnapshot> { Ok(s.clone()) };
/// let timeline = FunctionTimeline::new(AssemblySnapshot::default(), frozen);
/// let mut animation = FixedIntervalTimeline::new(timeline, 0.02).unwrap();
/// animation.tick().unwrap();
/// animation.tick().unwrap();
/// assert!((animation.current_timestamp() - 0.04).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct FixedIntervalTimeline<T: Timeline = FunctionTimeline> {
    timeline: T,
    interval: f64,
    cursor: f64,
    cached: Option<(f64, AssemblySnapshot)>,
}

impl<T: Timeline> FixedIntervalTimeline<T> {
    /// Wrap `timeline` with a refresh interval in seconds
    ///
    /// # Errors
    ///
    /// `InvalidParameter` unless the interval is positive and finite.
    pub fn new(timeline: T, interval: f64) -> Result<Self> {
        if !(interval > 0.0 && interval.is_finite()) {
            return Err(Error::InvalidParameter {
                parameter: "refresh_period".to_string(),
                value: interval,
                reason: "must be positive and finite",
            });
        }
        Ok(FixedIntervalTimeline {
            timeline,
            interval,
            cursor: 0.0,
            cached: None,
        })
    }

    /// Get the refresh interval in seconds
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Get the cursor timestamp
    pub fn current_timestamp(&self) -> f64 {
        self.cursor
    }

    /// Get the wrapped timeline
    pub fn inner(&self) -> &T {
        &self.timeline
    }

    /// Snapshot at the cursor
    pub fn current(&mut self) -> Result<AssemblySnapshot> {
        self.evaluate(self.cursor)
    }

    /// Move the cursor by `dt` seconds and return the snapshot there
    ///
    /// The cursor only moves if the snapshot could be computed.
    pub fn advance(&mut self, dt: f64) -> Result<AssemblySnapshot> {
        let target = self.cursor + dt;
        let snapshot = self.evaluate(target)?;
        self.cursor = target;
        Ok(snapshot)
    }

    /// Advance by one refresh interval
    pub fn tick(&mut self) -> Result<AssemblySnapshot> {
        self.advance(self.interval)
    }

    /// Move the cursor to `timestamp` and return the snapshot there
    pub fn seek(&mut self, timestamp: f64) -> Result<AssemblySnapshot> {
        let snapshot = self.evaluate(timestamp)?;
        self.cursor = timestamp;
        Ok(snapshot)
    }

    /// Move the cursor back to timestamp 0
    pub fn rewind(&mut self) {
        self.cursor = 0.0;
    }

    fn evaluate(&mut self, timestamp: f64) -> Result<AssemblySnapshot> {
        let timestamp = validate_timestamp(timestamp)?;
        if let Some((cached_at, snapshot)) = &self.cached {
            if *cached_at == timestamp {
                return Ok(snapshot.clone());
            }
        }
        let snapshot = self.timeline.snapshot_at(timestamp)?;
        self.cached = Some((timestamp, snapshot.clone()));
        Ok(snapshot)
    }
}

impl<T: Timeline> Timeline for FixedIntervalTimeline<T> {
    fn initial_snapshot(&self) -> &AssemblySnapshot {
        self.timeline.initial_snapshot()
    }

    fn snapshot_at(&self, timestamp: f64) -> Result<AssemblySnapshot> {
        self.timeline.snapshot_at(timestamp)
    }
}
