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
//! Runge-Kutta 4th order (RK4) integrator implementation
//!
//! For the second-order system x' = v, v' = a(t, x):
//!
//! ```text
//! k1_x = v               k1_v = a(t, x)
//! k2_x = v + k1_v*dt/2   k2_v = a(t + dt/2, x + k1_x*dt/2)
//! k3_x = v + k2_v*dt/2   k3_v = a(t + dt/2, x + k2_x*dt/2)
//! k4_x = v + k3_v*dt     k4_v = a(t + dt, x + k3_x*dt)
//! y(t + dt) = y(t) + (k1 + 2*k2 + 2*k3 + k4)*dt/6
//! ```
//!
//! # Properties
//!
//! - **Fourth-order accurate**: Local error O(dt⁵), global error O(dt⁴)
//! - **Not symplectic**: Energy may drift over long simulations
//! - **Four evaluations per step**: More expensive than Verlet
//!
//! # References
//!
//! - Butcher, J. C. (2016). Numerical Methods for Ordinary Differential Equations
//!   (3rd ed.). Wiley. Chapter 3.
//! - Press, W. H., Teukolsky, S. A., Vetterling, W. T., & Flannery, B. P. (2007).
//!   Numerical Recipes: The Art of Scientific Computing (3rd ed.). Cambridge
//!   University Press. Section 17.1.

use super::{AccelerationFn, Integrator, PhaseState};
use crate::geometry::Coordinate;

/// Runge-Kutta 4th order integrator
///
/// # Example
///
/// ```
/// use kinematic_engine::solver::{Integrator, RK4Integrator};
///
/// assert_eq!(RK4Integrator.name(), "Runge-Kutta 4");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Integrator;

/// `base + slope * h`, element-wise
fn offset(base: &[Coordinate], slope: &[Coordinate], h: f64) -> Vec<Coordinate> {
    base.iter().zip(slope).map(|(b, s)| *b + *s * h).collect()
}

impl Integrator for RK4Integrator {
    fn name(&self) -> &str {
        "Runge-Kutta 4"
    }

    fn step(&self, time: f64, dt: f64, state: &mut PhaseState, acceleration: &AccelerationFn<'_>) {
        let dt_2 = dt * 0.5;
        let dt_6 = dt / 6.0;
        let x = &state.positions;
        let v = &state.velocities;

        let k1_x = v.clone();
        let k1_v = acceleration(time, x);

        let k2_x = offset(v, &k1_v, dt_2);
        let k2_v = acceleration(time + dt_2, &offset(x, &k1_x, dt_2));

        let k3_x = offset(v, &k2_v, dt_2);
        let k3_v = acceleration(time + dt_2, &offset(x, &k2_x, dt_2));

        let k4_x = offset(v, &k3_v, dt);
        let k4_v = acceleration(time + dt, &offset(x, &k3_x, dt));

        for i in 0..state.len() {
            state.positions[i] =
                state.positions[i] + (k1_x[i] + k2_x[i] * 2.0 + k3_x[i] * 2.0 + k4_x[i]) * dt_6;
            state.velocities[i] =
                state.velocities[i] + (k1_v[i] + k2_v[i] * 2.0 + k3_v[i] * 2.0 + k4_v[i]) * dt_6;
        }
    }
}
