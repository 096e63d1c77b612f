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
//! Orthogonal coordinate systems and point transforms
//!
//! A coordinate system is an origin plus two axis vectors, all expressed in
//! the natural (physics) frame. Only orthogonal, non-skewed systems are
//! supported, which keeps the basis invertible by projection.
//!
//! A point (x, y) given in a system S corresponds to the natural point
//!
//! ```text
//! p = origin_S + x * ux_S + y * uy_S
//! ```
//!
//! and transforming between two systems goes through the natural frame.

use super::coordinate::{are_orthogonal, Coordinate};
use crate::error::{Error, Result};

/// An orthogonal 2D frame expressed in natural coordinates
///
/// Axis vectors need not have unit length; a display frame may scale them
/// to map physics units onto pixels.
///
/// # Examples
///
/// ```
/// use kinematic_engine::geometry::{Coordinate, CoordinateSystem};
///
/// // screen frame: origin at (200, 200), y pointing down
/// let screen = CoordinateSystem::new(
///     Coordinate::new(-200.0, 200.0),
///     Coordinate::new(1.0, 0.0),
///     Coordinate::new(0.0, -1.0),
/// ).unwrap();
/// let p = CoordinateSystem::NATURAL.transform_to(Coordinate::new(0.0, 0.0), &screen);
/// assert_eq!(p, Coordinate::new(200.0, 200.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSystem {
    origin: Coordinate,
    ux: Coordinate,
    uy: Coordinate,
}

impl CoordinateSystem {
    /// The identity frame used for physics computation
    pub const NATURAL: CoordinateSystem = CoordinateSystem {
        origin: Coordinate::new(0.0, 0.0),
        ux: Coordinate::new(1.0, 0.0),
        uy: Coordinate::new(0.0, 1.0),
    };

    /// Create a coordinate system from an origin and two axis vectors
    ///
    /// # Errors
    ///
    /// - `DegenerateAxes` if an axis has a non-finite component or a length
    ///   whose square is zero, subnormal or overflows
    /// - `NonOrthogonalAxes` if the axes are not orthogonal
    pub fn new(origin: Coordinate, ux: Coordinate, uy: Coordinate) -> Result<Self> {
        if !origin.is_finite() || !ux.is_finite() || !uy.is_finite() {
            return Err(Error::DegenerateAxes);
        }
        // squared lengths must stay normal floats so projections cannot overflow
        if !ux.norm_squared().is_normal() || !uy.norm_squared().is_normal() {
            return Err(Error::DegenerateAxes);
        }
        if !are_orthogonal(ux, uy) {
            return Err(Error::NonOrthogonalAxes { dot: ux.dot(uy) });
        }
        Ok(CoordinateSystem { origin, ux, uy })
    }

    /// Unit frame at `origin` rotated counter-clockwise by `theta`
    ///
    /// This is the local frame of a body with that pose; it is orthogonal
    /// by construction.
    pub fn rotated(origin: Coordinate, theta: f64) -> Self {
        let ux = Coordinate::from_angle(theta);
        CoordinateSystem {
            origin,
            ux,
            uy: Coordinate::new(-ux.y(), ux.x()),
        }
    }

    /// Get the origin in natural coordinates
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Get the x axis in natural coordinates
    pub fn ux(&self) -> Coordinate {
        self.ux
    }

    /// Get the y axis in natural coordinates
    pub fn uy(&self) -> Coordinate {
        self.uy
    }

    /// Express a point given in this system in the natural frame
    pub fn to_natural(&self, point: Coordinate) -> Coordinate {
        self.origin + self.ux * point.x() + self.uy * point.y()
    }

    /// Express a natural-frame point in this system
    ///
    /// Solves `p = origin + x * ux + y * uy` by projecting onto each axis,
    /// which is exact for an orthogonal basis.
    pub fn from_natural(&self, point: Coordinate) -> Coordinate {
        let d = point - self.origin;
        Coordinate::new(
            d.dot(self.ux) / self.ux.norm_squared(),
            d.dot(self.uy) / self.uy.norm_squared(),
        )
    }

    /// Express a point given in this system in `target`
    pub fn transform_to(&self, point: Coordinate, target: &CoordinateSystem) -> Coordinate {
        target.from_natural(self.to_natural(point))
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        CoordinateSystem::NATURAL
    }
}

/// Express `point`, given in `from`, as a point in `to`
pub fn transform(point: Coordinate, from: &CoordinateSystem, to: &CoordinateSystem) -> Coordinate {
    from.transform_to(point, to)
}
