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
//! Two-dimensional coordinates and scalar helpers

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance used when deciding whether two vectors are orthogonal
///
/// Scaled by the product of the vector lengths so that the test does not
/// depend on the units of the frame.
pub(crate) const ORTHOGONALITY_TOLERANCE: f64 = 1e-9;

/// A point or vector (x, y) in some 2D frame
///
/// # Examples
///
/// ```
/// use kinematic_engine::geometry::Coordinate;
///
/// let a = Coordinate::new(1.0, 2.0);
/// let b = a + Coordinate::new(2.0, 2.0);
/// assert_eq!(b, Coordinate::new(3.0, 4.0));
/// assert_eq!(b.norm(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    x: f64,
    y: f64,
}

impl Coordinate {
    /// Create a coordinate from its components
    pub const fn new(x: f64, y: f64) -> Self {
        Coordinate { x, y }
    }

    /// The coordinate (0, 0)
    pub const fn origin() -> Self {
        Coordinate::new(0.0, 0.0)
    }

    /// Unit vector at angle `theta` (radians, counter-clockwise from +x)
    pub fn from_angle(theta: f64) -> Self {
        Coordinate::new(theta.cos(), theta.sin())
    }

    /// Get the x component
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Get the y component
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Copy of this coordinate with a different x
    pub fn with_x(self, x: f64) -> Self {
        Coordinate::new(x, self.y)
    }

    /// Copy of this coordinate with a different y
    pub fn with_y(self, y: f64) -> Self {
        Coordinate::new(self.x, y)
    }

    /// Dot product
    pub fn dot(self, other: Coordinate) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product
    pub fn cross(self, other: Coordinate) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Squared length (avoids sqrt for comparisons)
    pub fn norm_squared(self) -> f64 {
        self.dot(self)
    }

    /// Length of the vector
    pub fn norm(self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Rotate counter-clockwise about the origin by `theta` radians
    pub fn rotate(self, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Coordinate::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Check that both components are finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Coordinate {
    type Output = Coordinate;

    fn mul(self, rhs: f64) -> Coordinate {
        Coordinate::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Coordinate {
    type Output = Coordinate;

    fn neg(self) -> Coordinate {
        Coordinate::new(-self.x, -self.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Euclidean distance between two coordinates
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    (b - a).norm()
}

/// Whether two vectors are orthogonal within floating-point tolerance
///
/// A zero-length vector is orthogonal to everything.
pub fn are_orthogonal(u: Coordinate, v: Coordinate) -> bool {
    u.dot(v).abs() <= ORTHOGONALITY_TOLERANCE * u.norm() * v.norm()
}

/// Angle of a vector in radians, in (-π, π]
pub fn angle_of(v: Coordinate) -> f64 {
    v.y.atan2(v.x)
}
