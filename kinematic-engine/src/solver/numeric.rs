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
//! Numerically integrated evolution

use super::dynamics::Dynamics;
use super::{validate_timestep, ForceField, Integrator, IntegratorKind};
use crate::error::{Error, Result};
use crate::geometry::Coordinate;
use crate::model::AssemblySnapshot;
use crate::timeline::{validate_timestamp, EvolutionFunction};
use std::fmt;
use std::sync::Arc;

/// General evolution function for bodies, springs and force fields
///
/// Each query integrates from the initial snapshot to the requested
/// timestamp in `ceil(t / max_step)` equal steps, at most `max_steps` of
/// them ([`DEFAULT_MAX_STEPS`] unless configured). Nothing is carried
/// between queries, so the result depends only on the initial snapshot
/// and `t`, and out-of-order or concurrent queries are safe.
///
/// Dynamic bodies translate under spring and field forces and rotate at
/// their constant angular velocity. Static bodies and springs are copied
/// unchanged.
///
/// # Example
///
/// ```
/// use kinematic_engine::solver::{IntegratorKind, NumericEvolution, UniformGravity};
///
/// let evolution = NumericEvolution::new(IntegratorKind::VelocityVerlet, 0.01)
///     .unwrap()
///     .with_field(UniformGravity::standard());
/// assert_eq!(evolution.step_count(0.105).unwrap(), 11);
/// assert!(evolution.step_count(1e12).is_err());
/// ```
#[derive(Clone)]
pub struct NumericEvolution {
    integrator: Arc<dyn Integrator>,
    max_step: f64,
    max_steps: usize,
    fields: Vec<Arc<dyn ForceField>>,
}

/// Default bound on the number of integration steps per query
pub const DEFAULT_MAX_STEPS: usize = 10_000_000;

impl NumericEvolution {
    /// Create an evolution using a built-in integrator
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `max_step` is not positive and finite.
    pub fn new(kind: IntegratorKind, max_step: f64) -> Result<Self> {
        Self::with_integrator(kind.integrator(), max_step)
    }

    /// Create an evolution using a custom integrator
    pub fn with_integrator(integrator: Box<dyn Integrator>, max_step: f64) -> Result<Self> {
        Ok(NumericEvolution {
            integrator: Arc::from(integrator),
            max_step: validate_timestep(max_step)?,
            max_steps: DEFAULT_MAX_STEPS,
            fields: Vec::new(),
        })
    }

    /// Bound the number of steps a single query may take
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if `max_steps` is zero.
    pub fn with_max_steps(mut self, max_steps: usize) -> Result<Self> {
        if max_steps == 0 {
            return Err(Error::InvalidParameter {
                parameter: "max_steps".to_string(),
                value: 0.0,
                reason: "must allow at least one step",
            });
        }
        self.max_steps = max_steps;
        Ok(self)
    }

    /// Add a force field acting on every dynamic body
    pub fn with_field(mut self, field: impl ForceField + 'static) -> Self {
        self.fields.push(Arc::new(field));
        self
    }

    /// Get the largest step taken
    pub fn max_step(&self) -> f64 {
        self.max_step
    }

    /// Get the bound on steps per query
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Get the integrator
    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    /// Get the force fields
    pub fn fields(&self) -> &[Arc<dyn ForceField>] {
        &self.fields
    }

    /// Number of steps used to reach `timestamp`
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if reaching `timestamp` needs more than
    /// `max_steps` steps.
    pub fn step_count(&self, timestamp: f64) -> Result<usize> {
        let steps = (timestamp / self.max_step).ceil().max(1.0);
        if !(steps <= self.max_steps as f64) {
            return Err(Error::InvalidParameter {
                parameter: "timestamp".to_string(),
                value: timestamp,
                reason: "needs more integration steps than max_steps allows",
            });
        }
        Ok(steps as usize)
    }
}

impl EvolutionFunction for NumericEvolution {
    fn evolve(&self, initial: &AssemblySnapshot, timestamp: f64) -> Result<AssemblySnapshot> {
        let timestamp = validate_timestamp(timestamp)?;
        if timestamp == 0.0 {
            return Ok(initial.clone());
        }

        let dynamics = Dynamics::new(initial, &self.fields)?;
        let steps = self.step_count(timestamp)?;
        let dt = timestamp / steps as f64;
        let acceleration =
            |time: f64, positions: &[Coordinate]| dynamics.acceleration(time, positions);

        let mut state = dynamics.initial_state();
        let mut reached = timestamp;
        for i in 0..steps {
            self.integrator.step(i as f64 * dt, dt, &mut state, &acceleration);
            if !state.is_finite() {
                reached = (i + 1) as f64 * dt;
                break;
            }
        }

        ftlog::debug!(
            "{}: {} bodies to t = {timestamp} in {steps} steps",
            self.integrator.name(),
            dynamics.body_count()
        );
        dynamics.snapshot(initial, reached, &state)
    }
}

impl fmt::Debug for NumericEvolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields.iter().map(|field| field.name()).collect();
        f.debug_struct("NumericEvolution")
            .field("integrator", &self.integrator.name())
            .field("max_step", &self.max_step)
            .field("max_steps", &self.max_steps)
            .field("fields", &fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{Assembly, AttributeSchema, Component};
    use crate::solver::UniformGravity;
    use approx::assert_relative_eq;

    fn projectile() -> AssemblySnapshot {
        let schema = AttributeSchema::standalone();
        let mut assembly = Assembly::new("projectile", schema.clone());
        assembly
            .with_component(
                Component::dynamic_body("ball")
                    .x(0.0)
                    .y(0.0)
                    .vx(3.0)
                    .vy(4.0)
                    .omega(0.5)
                    .mass(2.0)
                    .build(&schema)
                    .unwrap(),
            )
            .unwrap();
        assembly
            .with_component(
                Component::static_body("ground")
                    .x(0.0)
                    .y(-10.0)
                    .build(&schema)
                    .unwrap(),
            )
            .unwrap();
        assembly.initial_snapshot().unwrap()
    }

    #[test]
    fn test_step_count() {
        let evolution = NumericEvolution::new(IntegratorKind::Rk4, 0.1).unwrap();
        assert_eq!(evolution.step_count(0.0).unwrap(), 1);
        assert_eq!(evolution.step_count(0.05).unwrap(), 1);
        assert_eq!(evolution.step_count(1.0).unwrap(), 10);
        assert_eq!(evolution.step_count(1.01).unwrap(), 11);
    }

    #[test]
    fn test_step_count_is_bounded() {
        let evolution = NumericEvolution::new(IntegratorKind::Rk4, 1e-3).unwrap();
        assert_eq!(evolution.max_steps(), DEFAULT_MAX_STEPS);
        assert!(matches!(
            evolution.step_count(1e12),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(evolution.step_count(1e300).is_err());

        let bounded = evolution.with_max_steps(100).unwrap();
        assert_eq!(bounded.step_count(0.0995).unwrap(), 100);
        assert!(bounded.step_count(0.1005).is_err());
        assert!(NumericEvolution::new(IntegratorKind::Rk4, 1e-3)
            .unwrap()
            .with_max_steps(0)
            .is_err());
    }

    #[test]
    fn test_long_query_is_rejected_before_integrating() {
        let initial = projectile();
        let evolution = NumericEvolution::new(IntegratorKind::Rk4, 1e-3)
            .unwrap()
            .with_max_steps(1_000)
            .unwrap();
        assert_eq!(
            evolution.evolve(&initial, 2.5).unwrap_err(),
            Error::InvalidParameter {
                parameter: "timestamp".to_string(),
                value: 2.5,
                reason: "needs more integration steps than max_steps allows",
            }
        );
        assert!(evolution.evolve(&initial, 0.5).is_ok());
    }

    #[test]
    fn test_invalid_max_step() {
        assert!(NumericEvolution::new(IntegratorKind::Rk4, 0.0).is_err());
        assert!(NumericEvolution::new(IntegratorKind::Rk4, f64::NAN).is_err());
    }

    #[test]
    fn test_zero_timestamp_returns_initial() {
        let initial = projectile();
        let evolution = NumericEvolution::new(IntegratorKind::Rk4, 0.1).unwrap();
        assert_eq!(evolution.evolve(&initial, 0.0).unwrap(), initial);
    }

    #[test]
    fn test_projectile_under_gravity() {
        let initial = projectile();
        let evolution = NumericEvolution::new(IntegratorKind::VelocityVerlet, 0.01)
            .unwrap()
            .with_field(UniformGravity::new(0.0, -10.0).unwrap());
        let snapshot = evolution.evolve(&initial, 2.0).unwrap();
        let ball = snapshot.get_dynamic("ball").unwrap();
        assert_relative_eq!(ball.x(), 6.0, epsilon = 1e-9);
        assert_relative_eq!(ball.y(), 4.0 * 2.0 - 0.5 * 10.0 * 4.0, epsilon = 1e-9);
        assert_relative_eq!(ball.vy(), 4.0 - 20.0, epsilon = 1e-9);
        assert_relative_eq!(ball.theta(), 1.0, epsilon = 1e-12);
        assert_eq!(snapshot.get("ground").unwrap(), initial.get("ground").unwrap());
    }

    #[test]
    fn test_queries_are_order_independent() {
        let initial = projectile();
        let evolution = NumericEvolution::new(IntegratorKind::Rk4, 0.05)
            .unwrap()
            .with_field(UniformGravity::standard());
        let late = evolution.evolve(&initial, 3.0).unwrap();
        let _ = evolution.evolve(&initial, 1.0).unwrap();
        assert_eq!(evolution.evolve(&initial, 3.0).unwrap(), late);
    }

    #[test]
    fn test_diverging_state_is_reported() {
        let schema = AttributeSchema::standalone();
        let mut assembly = Assembly::new("stiff", schema.clone());
        assembly
            .with_component(Component::static_body("wall").x(0.0).y(0.0).build(&schema).unwrap())
            .unwrap()
            .with_component(
                Component::dynamic_body("mass")
                    .x(2.0)
                    .y(0.0)
                    .mass(1.0)
                    .build(&schema)
                    .unwrap(),
            )
            .unwrap()
            .with_component(
                Component::spring("spring")
                    .stiffness(1e12)
                    .natural_length(1.0)
                    .component_a("wall")
                    .component_b("mass")
                    .build(&schema)
                    .unwrap(),
            )
            .unwrap();
        let initial = assembly.initial_snapshot().unwrap();
        let evolution = NumericEvolution::new(IntegratorKind::Rk4, 1.0).unwrap();
        match evolution.evolve(&initial, 1000.0) {
            Err(Error::NonFiniteState {
                component,
                timestamp,
            }) => {
                assert_eq!(component, "mass");
                // reported at the step that diverged, not the query time
                assert!(timestamp > 0.0 && timestamp < 1000.0);
                assert_eq!(timestamp, timestamp.round());
            }
            other => panic!("expected NonFiniteState, got {other:?}"),
        }
    }

    #[test]
    fn test_spring_endpoints_move_together() {
        let schema = AttributeSchema::standalone();
        let body = |name: &str, x: f64| {
            Component::dynamic_body(name)
                .x(x)
                .y(0.0)
                .mass(1.0)
                .build(&schema)
                .unwrap()
        };
        let mut assembly = Assembly::new("pair", schema.clone());
        assembly
            .with_component(body("left", -2.0))
            .unwrap()
            .with_component(body("right", 2.0))
            .unwrap()
            .with_component(
                Component::spring("spring")
                    .stiffness(5.0)
                    .natural_length(2.0)
                    .component_a("left")
                    .component_b("right")
                    .build(&schema)
                    .unwrap(),
            )
            .unwrap();
        let initial = assembly.initial_snapshot().unwrap();
        let evolution = NumericEvolution::new(IntegratorKind::Rk4, 0.001).unwrap();
        let snapshot = evolution.evolve(&initial, 0.7).unwrap();
        let left = snapshot.get_dynamic("left").unwrap();
        let right = snapshot.get_dynamic("right").unwrap();
        // momentum is conserved, so the centre of mass stays put
        assert_relative_eq!(left.x() + right.x(), 0.0, epsilon = 1e-9);
        assert!(right.x() < 2.0);
        assert_relative_eq!(left.vx(), -right.vx(), epsilon = 1e-9);
    }
}
