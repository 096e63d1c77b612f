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
//! Velocity Verlet integrator implementation
//!
//! ```text
//! x(t + dt) = x(t) + v(t)*dt + 0.5*a(t)*dt²
//! v(t + dt) = v(t) + 0.5*(a(t) + a(t + dt))*dt
//! ```
//!
//! # Properties
//!
//! - **Second-order accurate**: Global error O(dt²)
//! - **Symplectic**: Bounded energy error for conservative forces
//! - **Time-reversible**
//!
//! # References
//!
//! - Swope, W. C., Andersen, H. C., Berens, P. H., & Wilson, K. R. (1982).
//!   "A computer simulation method for the calculation of equilibrium constants
//!   for the formation of physical clusters of molecules". J. Chem. Phys. 76, 637.
//! - Hairer, E., Lubich, C., & Wanner, G. (2003). "Geometric numerical integration
//!   illustrated by the Störmer-Verlet method". Acta Numerica 12, 399-450.

use super::{AccelerationFn, Integrator, PhaseState};

/// Velocity Verlet integrator
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityVerletIntegrator;

impl Integrator for VelocityVerletIntegrator {
    fn name(&self) -> &str {
        "Velocity Verlet"
    }

    fn step(&self, time: f64, dt: f64, state: &mut PhaseState, acceleration: &AccelerationFn<'_>) {
        let dt_sq = dt * dt;
        let current = acceleration(time, &state.positions);

        for i in 0..state.len() {
            state.positions[i] =
                state.positions[i] + state.velocities[i] * dt + current[i] * (0.5 * dt_sq);
        }

        // Forces see the updated positions
        let next = acceleration(time + dt, &state.positions);

        for i in 0..state.len() {
            state.velocities[i] = state.velocities[i] + (current[i] + next[i]) * (0.5 * dt);
        }
    }
}
