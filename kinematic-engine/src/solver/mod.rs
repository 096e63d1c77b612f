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
//! Evolution functions for spring-mass assemblies
//!
//! Two strategies are provided, and both plug into any timeline as an
//! `EvolutionFunction`:
//!
//! - **Closed form** (`SpringOscillation`): the analytic solution for a
//!   single mass on a single spring. Exact and O(1) per query.
//! - **Numeric** (`NumericEvolution`): integrates the equations of motion
//!   for any number of bodies, springs and force fields from the initial
//!   snapshot to the requested timestamp.
//!
//! # Integrators
//!
//! - **Velocity Verlet**: symplectic, good energy conservation for
//!   oscillatory motion (springs).
//! - **RK4 (Runge-Kutta 4th order)**: higher accuracy for smooth forces at
//!   four force evaluations per step.
//!
//! # Timestep Guidelines
//!
//! `NumericEvolution` never steps further than its `max_step`. Each query
//! splits `[0, t]` into `ceil(t / max_step)` equal steps, so the endpoint
//! is hit exactly and every query is a pure function of `t`. Smaller steps
//! cost proportionally more per query; a query needing more than
//! `max_steps` steps is rejected up front.

use crate::error::{Error, Result};
use crate::geometry::Coordinate;
use crate::model::{AssemblySnapshot, KinematicModel};

mod dynamics;
mod forces;
mod numeric;
mod oscillator;
mod rk4;
mod verlet;

pub use forces::{spring_force, ForceField, UniformGravity, STANDARD_GRAVITY};
pub use numeric::{NumericEvolution, DEFAULT_MAX_STEPS};
pub use oscillator::SpringOscillation;
pub use rk4::RK4Integrator;
pub use verlet::VelocityVerletIntegrator;

/// Smallest step accepted without a precision warning
pub const MIN_RECOMMENDED_STEP: f64 = 1e-9;

/// Largest step accepted without a stability warning
pub const MAX_RECOMMENDED_STEP: f64 = 1.0;

/// Positions and velocities of every integrated body
///
/// Entry `i` of both vectors belongs to the same body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhaseState {
    /// Body positions in the natural frame
    pub positions: Vec<Coordinate>,
    /// Body velocities in the natural frame
    pub velocities: Vec<Coordinate>,
}

impl PhaseState {
    /// Number of bodies
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether there are no bodies
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether every position and velocity is finite
    pub fn is_finite(&self) -> bool {
        self.positions
            .iter()
            .chain(self.velocities.iter())
            .all(|c| c.is_finite())
    }
}

/// Accelerations of every body at `(time, positions)`
///
/// Forces in this crate do not depend on velocity.
pub type AccelerationFn<'a> = dyn Fn(f64, &[Coordinate]) -> Vec<Coordinate> + 'a;

/// Trait for numerical integration methods
///
/// Integrators advance positions and velocities by one step given the
/// acceleration field. They hold no per-query state, so one integrator can
/// serve concurrent queries.
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Advance `state` from `time` to `time + dt`
    fn step(&self, time: f64, dt: f64, state: &mut PhaseState, acceleration: &AccelerationFn<'_>);
}

/// Built-in integrators, selectable by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IntegratorKind {
    /// Runge-Kutta 4th order
    #[default]
    Rk4,
    /// Velocity Verlet
    VelocityVerlet,
}

impl IntegratorKind {
    /// Instantiate the integrator
    pub fn integrator(&self) -> Box<dyn Integrator> {
        match self {
            IntegratorKind::Rk4 => Box::new(RK4Integrator),
            IntegratorKind::VelocityVerlet => Box::new(VelocityVerletIntegrator),
        }
    }
}

/// Validate a maximum integration step
///
/// Non-positive or non-finite steps are rejected. Extremely small steps
/// (precision loss with f64) and large steps (instability) are accepted
/// with a warning.
///
/// # Errors
///
/// `InvalidParameter` if `dt` is not positive and finite.
pub fn validate_timestep(dt: f64) -> Result<f64> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(Error::InvalidParameter {
            parameter: "max_step".to_string(),
            value: dt,
            reason: "must be positive and finite",
        });
    }
    if dt < MIN_RECOMMENDED_STEP {
        ftlog::warn!("Timestep {dt} is extremely small and may lose precision with f64");
    } else if dt > MAX_RECOMMENDED_STEP {
        ftlog::warn!("Timestep {dt} is large and may cause instability");
    }
    Ok(dt)
}

/// Kinetic energy of the dynamic bodies plus elastic energy of the springs
///
/// Field potentials are not included. Conserved by the evolution of an
/// assembly whose springs only join bodies to static walls and each other.
///
/// # Errors
///
/// Errors from resolving spring attachment points.
pub fn mechanical_energy(snapshot: &AssemblySnapshot) -> Result<f64> {
    let mut total = 0.0;
    for (name, model) in snapshot.iter() {
        total += match model {
            KinematicModel::Dynamic(body) => body.kinetic_energy(),
            KinematicModel::Connector(spring) => {
                let (a, b) = snapshot.attachment_points(name)?;
                spring.potential_energy((b - a).norm())
            }
            KinematicModel::Static(_) => 0.0,
        };
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Simple harmonic oscillator fixture: a = -k/m x,
    // analytical solution x(t) = x0 cos(wt) + v0/w sin(wt)
    struct HarmonicOscillator {
        spring_constant: f64,
        mass: f64,
    }

    impl HarmonicOscillator {
        fn omega(&self) -> f64 {
            (self.spring_constant / self.mass).sqrt()
        }

        fn acceleration(&self, positions: &[Coordinate]) -> Vec<Coordinate> {
            positions
                .iter()
                .map(|p| *p * (-self.spring_constant / self.mass))
                .collect()
        }

        fn run(&self, integrator: &dyn Integrator, x0: f64, t: f64, steps: usize) -> PhaseState {
            let mut state = PhaseState {
                positions: vec![Coordinate::new(x0, 0.0)],
                velocities: vec![Coordinate::origin()],
            };
            let dt = t / steps as f64;
            for i in 0..steps {
                integrator.step(i as f64 * dt, dt, &mut state, &|_, p| self.acceleration(p));
            }
            state
        }
    }

    #[test]
    fn test_validate_timestep() {
        assert_eq!(validate_timestep(0.01), Ok(0.01));
        assert_eq!(validate_timestep(2.0), Ok(2.0));
        assert!(validate_timestep(0.0).is_err());
        assert!(validate_timestep(-0.1).is_err());
        assert!(validate_timestep(f64::NAN).is_err());
        assert!(validate_timestep(f64::INFINITY).is_err());
    }

    #[test]
    fn test_integrators_track_harmonic_oscillator() {
        let oscillator = HarmonicOscillator {
            spring_constant: 4.0,
            mass: 1.0,
        };
        let period = 2.0 * std::f64::consts::PI / oscillator.omega();
        for kind in [IntegratorKind::Rk4, IntegratorKind::VelocityVerlet] {
            let integrator = kind.integrator();
            let state = oscillator.run(integrator.as_ref(), 1.0, period, 1000);
            assert_relative_eq!(state.positions[0].x(), 1.0, epsilon = 1e-3);
            assert_relative_eq!(state.velocities[0].x(), 0.0, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_rk4_beats_verlet_at_coarse_steps() {
        let oscillator = HarmonicOscillator {
            spring_constant: 1.0,
            mass: 1.0,
        };
        let t: f64 = 1.0;
        let exact = t.cos();
        let rk4 = oscillator.run(&RK4Integrator, 1.0, t, 10);
        let verlet = oscillator.run(&VelocityVerletIntegrator, 1.0, t, 10);
        let rk4_error = (rk4.positions[0].x() - exact).abs();
        let verlet_error = (verlet.positions[0].x() - exact).abs();
        assert!(rk4_error < verlet_error);
    }

    #[test]
    fn test_phase_state_finiteness() {
        let mut state = PhaseState {
            positions: vec![Coordinate::new(1.0, 2.0)],
            velocities: vec![Coordinate::origin()],
        };
        assert!(state.is_finite());
        state.velocities[0] = Coordinate::new(f64::NAN, 0.0);
        assert!(!state.is_finite());
    }
}
