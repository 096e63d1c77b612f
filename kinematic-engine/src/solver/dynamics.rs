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
//! Equations of motion extracted from a snapshot

use super::{spring_force, ForceField, PhaseState};
use crate::error::{Error, Result};
use crate::geometry::{Coordinate, CoordinateSystem};
use crate::model::{AssemblySnapshot, DynamicModel, KinematicModel};
use std::collections::HashMap;
use std::sync::Arc;

/// Where a spring end is attached
#[derive(Debug, Clone, Copy)]
enum Anchor {
    /// Attached to a static body; the natural-frame point never moves
    Fixed(Coordinate),
    /// Attached to dynamic body `index` at `offset` in its local frame
    Body { index: usize, offset: Coordinate },
}

#[derive(Debug, Clone, Copy)]
struct Link {
    stiffness: f64,
    natural_length: f64,
    a: Anchor,
    b: Anchor,
}

struct Body<'a> {
    name: &'a str,
    model: &'a DynamicModel,
}

/// Dynamic bodies, springs and fields of one snapshot
pub(crate) struct Dynamics<'a> {
    bodies: Vec<Body<'a>>,
    links: Vec<Link>,
    fields: &'a [Arc<dyn ForceField>],
}

impl<'a> Dynamics<'a> {
    /// Collect the moving parts of `snapshot`
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a non-positive mass; `KindMismatch` or
    /// `IncompleteSnapshot` for a spring without two body endpoints.
    pub(crate) fn new(
        snapshot: &'a AssemblySnapshot,
        fields: &'a [Arc<dyn ForceField>],
    ) -> Result<Self> {
        let mut bodies = Vec::new();
        let mut index = HashMap::new();
        for (name, model) in snapshot.iter() {
            if let KinematicModel::Dynamic(body) = model {
                if !(body.mass() > 0.0) {
                    return Err(Error::InvalidParameter {
                        parameter: format!("{name}.mass"),
                        value: body.mass(),
                        reason: "must be positive",
                    });
                }
                index.insert(name, bodies.len());
                bodies.push(Body { name, model: body });
            }
        }

        let mut links = Vec::new();
        for (name, model) in snapshot.iter() {
            if let KinematicModel::Connector(spring) = model {
                let (a, b) = snapshot.connector_endpoints(name)?;
                links.push(Link {
                    stiffness: spring.stiffness(),
                    natural_length: spring.natural_length(),
                    a: anchor(spring.component_a(), a, spring.connecting_point_a(), &index)?,
                    b: anchor(spring.component_b(), b, spring.connecting_point_b(), &index)?,
                });
            }
        }

        Ok(Dynamics {
            bodies,
            links,
            fields,
        })
    }

    /// Positions and velocities at timestamp 0
    pub(crate) fn initial_state(&self) -> PhaseState {
        PhaseState {
            positions: self.bodies.iter().map(|b| b.model.position()).collect(),
            velocities: self.bodies.iter().map(|b| b.model.velocity()).collect(),
        }
    }

    /// Orientation of body `index` at `time`
    ///
    /// Bodies rotate at their constant angular velocity.
    fn theta(&self, index: usize, time: f64) -> f64 {
        let model = self.bodies[index].model;
        model.theta() + model.omega() * time
    }

    fn anchor_point(&self, anchor: Anchor, time: f64, positions: &[Coordinate]) -> Coordinate {
        match anchor {
            Anchor::Fixed(point) => point,
            Anchor::Body { index, offset } => {
                CoordinateSystem::rotated(positions[index], self.theta(index, time))
                    .to_natural(offset)
            }
        }
    }

    /// Acceleration of every body at `(time, positions)`
    pub(crate) fn acceleration(&self, time: f64, positions: &[Coordinate]) -> Vec<Coordinate> {
        let mut forces: Vec<Coordinate> = self
            .bodies
            .iter()
            .zip(positions)
            .map(|(body, position)| {
                self.fields
                    .iter()
                    .fold(Coordinate::origin(), |acc, field| {
                        acc + field.force(*position, body.model.mass())
                    })
            })
            .collect();

        for link in &self.links {
            let pa = self.anchor_point(link.a, time, positions);
            let pb = self.anchor_point(link.b, time, positions);
            let force = spring_force(link.stiffness, link.natural_length, pa, pb);
            if let Anchor::Body { index, .. } = link.a {
                forces[index] = forces[index] + force;
            }
            if let Anchor::Body { index, .. } = link.b {
                forces[index] = forces[index] - force;
            }
        }

        forces
            .into_iter()
            .zip(&self.bodies)
            .map(|(force, body)| force * (1.0 / body.model.mass()))
            .collect()
    }

    /// Build the snapshot at `timestamp` from the integrated state
    ///
    /// Static bodies and springs are carried over unchanged.
    ///
    /// # Errors
    ///
    /// `NonFiniteState` naming the first body whose state diverged.
    pub(crate) fn snapshot(
        &self,
        initial: &AssemblySnapshot,
        timestamp: f64,
        state: &PhaseState,
    ) -> Result<AssemblySnapshot> {
        let mut builder = initial.to_builder();
        for (index, body) in self.bodies.iter().enumerate() {
            let position = state.positions[index];
            let velocity = state.velocities[index];
            let theta = self.theta(index, timestamp);
            if !(position.is_finite() && velocity.is_finite() && theta.is_finite()) {
                ftlog::warn!("Body {} diverged at t = {timestamp}", body.name);
                return Err(Error::NonFiniteState {
                    component: body.name.to_string(),
                    timestamp,
                });
            }
            let model = body
                .model
                .to_builder()
                .position(position)
                .velocity(velocity)
                .theta(theta)
                .build()?;
            builder.insert(body.name, model);
        }
        Ok(builder.build())
    }

    /// Number of dynamic bodies
    pub(crate) fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

fn anchor(
    name: &str,
    model: &KinematicModel,
    offset: Coordinate,
    index: &HashMap<&str, usize>,
) -> Result<Anchor> {
    match model {
        KinematicModel::Static(body) => Ok(Anchor::Fixed(body.frame().to_natural(offset))),
        KinematicModel::Dynamic(_) => {
            let index = index.get(name).copied().ok_or_else(|| Error::unknown(name))?;
            Ok(Anchor::Body { index, offset })
        }
        KinematicModel::Connector(_) => Err(Error::KindMismatch {
            name: name.to_string(),
            expected: "body",
            found: model.kind().as_str(),
        }),
    }
}
