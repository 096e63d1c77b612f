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
//! Closed-form spring oscillation

use crate::error::{Error, Result};
use crate::model::{AssemblySnapshot, DynamicModel, SpringModel};
use crate::timeline::{validate_timestamp, EvolutionFunction};

/// Analytic motion of one mass on one spring along the natural y axis
///
/// With `w = sqrt(k / m)` and the mass starting at the spring's rest
/// position with velocity `vy0`:
///
/// ```text
/// y(t)  = y0 + (vy0 / w) sin(w t)
/// vy(t) = vy0 cos(w t)
/// ```
///
/// Only the mass changes; every other component is copied unchanged. A
/// spring with zero stiffness leaves the mass in uniform motion.
///
/// # Example
///
/// ```
/// use kinematic_engine::solver::SpringOscillation;
///
/// let oscillation = SpringOscillation::new("circ", "spring");
/// assert_eq!(oscillation.mass(), "circ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpringOscillation {
    mass: String,
    spring: String,
}

impl SpringOscillation {
    /// Oscillate the dynamic body `mass` on the connector `spring`
    pub fn new(mass: impl Into<String>, spring: impl Into<String>) -> Self {
        SpringOscillation {
            mass: mass.into(),
            spring: spring.into(),
        }
    }

    /// Name of the oscillating body
    pub fn mass(&self) -> &str {
        &self.mass
    }

    /// Name of the spring
    pub fn spring(&self) -> &str {
        &self.spring
    }

    /// Angular frequency `sqrt(k / m)` for the components in `snapshot`
    ///
    /// # Errors
    ///
    /// `UnknownComponentName` or `KindMismatch` if the named components are
    /// absent or of the wrong kind; `InvalidParameter` for a non-positive
    /// mass or a negative stiffness.
    pub fn angular_frequency(&self, snapshot: &AssemblySnapshot) -> Result<f64> {
        let (body, spring) = self.components(snapshot)?;
        self.frequency(body, spring)
    }

    fn components<'a>(
        &self,
        snapshot: &'a AssemblySnapshot,
    ) -> Result<(&'a DynamicModel, &'a SpringModel)> {
        Ok((
            snapshot.get_dynamic(&self.mass)?,
            snapshot.get_connector(&self.spring)?,
        ))
    }

    fn frequency(&self, body: &DynamicModel, spring: &SpringModel) -> Result<f64> {
        if !(body.mass() > 0.0) {
            return Err(Error::InvalidParameter {
                parameter: format!("{}.mass", self.mass),
                value: body.mass(),
                reason: "must be positive",
            });
        }
        if spring.stiffness() < 0.0 {
            return Err(Error::InvalidParameter {
                parameter: format!("{}.stiffness", self.spring),
                value: spring.stiffness(),
                reason: "must not be negative",
            });
        }
        Ok((spring.stiffness() / body.mass()).sqrt())
    }
}

impl EvolutionFunction for SpringOscillation {
    fn evolve(&self, initial: &AssemblySnapshot, timestamp: f64) -> Result<AssemblySnapshot> {
        let timestamp = validate_timestamp(timestamp)?;
        let (body, spring) = self.components(initial)?;
        let w = self.frequency(body, spring)?;

        let (y, vy) = if w == 0.0 {
            (body.y() + body.vy() * timestamp, body.vy())
        } else {
            let phase = w * timestamp;
            (body.y() + body.vy() / w * phase.sin(), body.vy() * phase.cos())
        };

        let moved = body.to_builder().y(y).vy(vy).build()?;
        Ok(initial.to_builder().kinematic_model(self.mass.as_str(), moved).build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coordinate;
    use crate::model::{Assembly, AttributeSchema, Component};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn assembly(stiffness: f64) -> AssemblySnapshot {
        let schema = AttributeSchema::standalone();
        let mut assembly = Assembly::new("single circle", schema.clone());
        assembly
            .with_component(
                Component::dynamic_body("circ")
                    .x(20.0)
                    .y(0.0)
                    .vy(-30.0)
                    .mass(10.0)
                    .build(&schema)
                    .unwrap(),
            )
            .unwrap()
            .with_component(
                Component::static_body("wall")
                    .x(20.0)
                    .y(100.0)
                    .theta(-FRAC_PI_2)
                    .build(&schema)
                    .unwrap(),
            )
            .unwrap()
            .with_component(
                Component::spring("spring")
                    .stiffness(stiffness)
                    .natural_length(100.0)
                    .component_a("wall")
                    .component_b("circ")
                    .connecting_point_a(Coordinate::origin())
                    .build(&schema)
                    .unwrap(),
            )
            .unwrap();
        assembly.initial_snapshot().unwrap()
    }

    #[test]
    fn test_angular_frequency() {
        let oscillation = SpringOscillation::new("circ", "spring");
        assert_relative_eq!(oscillation.angular_frequency(&assembly(30.0)).unwrap(), 3f64.sqrt());
    }

    #[test]
    fn test_quarter_period_reaches_amplitude() {
        let initial = assembly(30.0);
        let oscillation = SpringOscillation::new("circ", "spring");
        let w = 3f64.sqrt();
        let snapshot = oscillation.evolve(&initial, FRAC_PI_2 / w).unwrap();
        let circ = snapshot.get_dynamic("circ").unwrap();
        assert_relative_eq!(circ.y(), -30.0 / w, epsilon = 1e-12);
        assert_relative_eq!(circ.vy(), 0.0, epsilon = 1e-12);
        assert_eq!(circ.x(), 20.0);
        assert_eq!(snapshot.get("wall").unwrap(), initial.get("wall").unwrap());
        assert_eq!(snapshot.get("spring").unwrap(), initial.get("spring").unwrap());
    }

    #[test]
    fn test_zero_stiffness_is_uniform_motion() {
        let initial = assembly(0.0);
        let snapshot = SpringOscillation::new("circ", "spring").evolve(&initial, 2.0).unwrap();
        assert_relative_eq!(snapshot.get_dynamic("circ").unwrap().y(), -60.0);
    }

    #[test]
    fn test_wrong_component_kind() {
        let initial = assembly(30.0);
        let swapped = SpringOscillation::new("spring", "circ");
        assert!(matches!(
            swapped.evolve(&initial, 1.0),
            Err(Error::KindMismatch { .. })
        ));
    }
}
