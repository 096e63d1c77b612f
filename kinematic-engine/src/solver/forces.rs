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
//! Forces acting on dynamic bodies
//!
//! Springs follow Hooke's law between their attachment points:
//!
//! **F = k (L - L₀)**
//!
//! directed along the spring, pulling the endpoints together when
//! stretched and pushing them apart when compressed. External fields
//! implement `ForceField` and act on every dynamic body.
//!
//! ## Numerical Stability
//!
//! - Zero-length springs have no direction and produce zero force
//! - Field parameters are validated to be finite on construction

use crate::error::{Error, Result};
use crate::geometry::Coordinate;

/// Standard gravity at the Earth's surface (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// A field exerting a force on every dynamic body
///
/// Fields must be pure functions of position and mass so evolution stays
/// deterministic.
pub trait ForceField: Send + Sync {
    /// Get a descriptive name for this field
    fn name(&self) -> &str;

    /// Force on a body of `mass` at `position`
    fn force(&self, position: Coordinate, mass: f64) -> Coordinate;
}

/// Uniform gravitational field
///
/// # Example
///
/// ```
/// use kinematic_engine::geometry::Coordinate;
/// use kinematic_engine::solver::{ForceField, UniformGravity};
///
/// let gravity = UniformGravity::new(0.0, -10.0).unwrap();
/// assert_eq!(gravity.force(Coordinate::origin(), 2.0), Coordinate::new(0.0, -20.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformGravity {
    acceleration: Coordinate,
}

impl UniformGravity {
    /// Create a field with acceleration `(gx, gy)`
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if either component is not finite.
    pub fn new(gx: f64, gy: f64) -> Result<Self> {
        for (parameter, value) in [("gx", gx), ("gy", gy)] {
            if !value.is_finite() {
                return Err(Error::InvalidParameter {
                    parameter: parameter.to_string(),
                    value,
                    reason: "must be finite",
                });
            }
        }
        Ok(UniformGravity {
            acceleration: Coordinate::new(gx, gy),
        })
    }

    /// Standard gravity pointing down the natural y axis
    pub fn standard() -> Self {
        UniformGravity {
            acceleration: Coordinate::new(0.0, -STANDARD_GRAVITY),
        }
    }

    /// Get the field acceleration
    pub fn acceleration(&self) -> Coordinate {
        self.acceleration
    }
}

impl ForceField for UniformGravity {
    fn name(&self) -> &str {
        "Uniform Gravity"
    }

    fn force(&self, _position: Coordinate, mass: f64) -> Coordinate {
        self.acceleration * mass
    }
}

/// Hooke force exerted on the endpoint at `from` by a spring reaching `to`
///
/// The force on the endpoint at `to` is the negation. A zero-length
/// spring has no direction and produces zero force.
pub fn spring_force(
    stiffness: f64,
    natural_length: f64,
    from: Coordinate,
    to: Coordinate,
) -> Coordinate {
    let delta = to - from;
    let length = delta.norm();
    if length == 0.0 {
        ftlog::warn!("Zero-length spring at {from}, applying no force");
        return Coordinate::origin();
    }
    delta * (stiffness * (length - natural_length) / length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stretched_spring_pulls_together() {
        let force = spring_force(2.0, 1.0, Coordinate::origin(), Coordinate::new(3.0, 0.0));
        assert_relative_eq!(force.x(), 4.0);
        assert_relative_eq!(force.y(), 0.0);
    }

    #[test]
    fn test_compressed_spring_pushes_apart() {
        let force = spring_force(2.0, 5.0, Coordinate::origin(), Coordinate::new(0.0, 3.0));
        assert_relative_eq!(force.y(), -4.0);
    }

    #[test]
    fn test_natural_length_is_force_free() {
        let force = spring_force(10.0, 5.0, Coordinate::new(1.0, 1.0), Coordinate::new(4.0, 5.0));
        assert_relative_eq!(force.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_length_spring() {
        let p = Coordinate::new(2.0, 2.0);
        assert_eq!(spring_force(10.0, 1.0, p, p), Coordinate::origin());
    }

    #[test]
    fn test_gravity_validation() {
        assert!(UniformGravity::new(f64::NAN, 0.0).is_err());
        assert!(UniformGravity::new(0.0, f64::INFINITY).is_err());
        let gravity = UniformGravity::standard();
        assert_eq!(gravity.acceleration(), Coordinate::new(0.0, -STANDARD_GRAVITY));
        assert_eq!(gravity.name(), "Uniform Gravity");
    }
}
