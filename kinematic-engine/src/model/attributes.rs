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
//! Attribute sets of the built-in component kinds
//!
//! Each kind declares the attributes it decodes as a small struct of
//! handles. Richer kinds embed the set of the kind they extend instead of
//! redeclaring it:
//!
//! ```text
//! StaticBodyAttributes  { x, y, theta }
//! DynamicBodyAttributes { body: StaticBodyAttributes, vx, vy, omega, mass }
//! SpringAttributes      { stiffness, natural_length, connecting points }
//! ```
//!
//! Writing a dynamic body's state first delegates to the static set, then
//! adds its own entries, so the two kinds share one declaration of `x`,
//! `y` and `theta`.

use crate::error::Result;
use crate::geometry::Coordinate;
use crate::model::{Attribute, AttributeRegistry, ComponentState, ComponentStateBuilder};
use std::sync::Arc;

/// Well-known attribute names
pub mod names {
    /// Position x
    pub const X: &str = "x";
    /// Position y
    pub const Y: &str = "y";
    /// Orientation in radians
    pub const THETA: &str = "theta";
    /// Velocity x
    pub const VX: &str = "vx";
    /// Velocity y
    pub const VY: &str = "vy";
    /// Angular velocity in radians per second
    pub const OMEGA: &str = "omega";
    /// Mass
    pub const MASS: &str = "mass";
    /// Spring constant
    pub const STIFFNESS: &str = "stiffness";
    /// Unstretched spring length
    pub const NATURAL_LENGTH: &str = "natural_length";
    /// Attachment offset x on endpoint A
    pub const CONNECTING_POINT_AX: &str = "connecting_point_ax";
    /// Attachment offset y on endpoint A
    pub const CONNECTING_POINT_AY: &str = "connecting_point_ay";
    /// Attachment offset x on endpoint B
    pub const CONNECTING_POINT_BX: &str = "connecting_point_bx";
    /// Attachment offset y on endpoint B
    pub const CONNECTING_POINT_BY: &str = "connecting_point_by";
}

/// Position and orientation of a body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Position in the natural frame
    pub position: Coordinate,
    /// Orientation in radians
    pub theta: f64,
}

/// Motion parameters of a dynamic body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    /// Linear velocity
    pub velocity: Coordinate,
    /// Angular velocity in radians per second
    pub omega: f64,
    /// Mass
    pub mass: f64,
}

/// Numeric parameters of a spring
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpringParameters {
    /// Spring constant
    pub stiffness: f64,
    /// Unstretched length
    pub natural_length: f64,
    /// Attachment point in the local frame of endpoint A
    pub connecting_point_a: Coordinate,
    /// Attachment point in the local frame of endpoint B
    pub connecting_point_b: Coordinate,
}

/// Attributes of a static body
#[derive(Debug, Clone, PartialEq)]
pub struct StaticBodyAttributes {
    /// Position x
    pub x: Attribute,
    /// Position y
    pub y: Attribute,
    /// Orientation
    pub theta: Attribute,
}

impl StaticBodyAttributes {
    /// Register the static body attributes
    pub fn register(registry: &AttributeRegistry) -> Self {
        StaticBodyAttributes {
            x: registry.register(names::X),
            y: registry.register(names::Y),
            theta: registry.register(names::THETA),
        }
    }

    /// Write a pose into a state builder
    pub fn write(&self, builder: ComponentStateBuilder, pose: Pose) -> ComponentStateBuilder {
        builder
            .set(self.x.clone(), pose.position.x())
            .set(self.y.clone(), pose.position.y())
            .set(self.theta.clone(), pose.theta)
    }

    /// Decode a pose from a state
    pub fn read(&self, state: &ComponentState) -> Result<Pose> {
        Ok(Pose {
            position: Coordinate::new(state.get(&self.x)?, state.get(&self.y)?),
            theta: state.get(&self.theta)?,
        })
    }

    /// All handles this kind declares
    pub fn handles(&self) -> Vec<&Attribute> {
        vec![&self.x, &self.y, &self.theta]
    }
}

/// Attributes of a dynamic body, extending the static body set
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicBodyAttributes {
    /// The static body attributes this kind extends
    pub body: StaticBodyAttributes,
    /// Velocity x
    pub vx: Attribute,
    /// Velocity y
    pub vy: Attribute,
    /// Angular velocity
    pub omega: Attribute,
    /// Mass
    pub mass: Attribute,
}

impl DynamicBodyAttributes {
    /// Register the dynamic body attributes on top of `body`
    pub fn register(registry: &AttributeRegistry, body: StaticBodyAttributes) -> Self {
        DynamicBodyAttributes {
            body,
            vx: registry.register(names::VX),
            vy: registry.register(names::VY),
            omega: registry.register(names::OMEGA),
            mass: registry.register(names::MASS),
        }
    }

    /// Write pose and motion into a state builder
    pub fn write(
        &self,
        builder: ComponentStateBuilder,
        pose: Pose,
        motion: Motion,
    ) -> ComponentStateBuilder {
        self.write_motion(self.body.write(builder, pose), motion)
    }

    /// Write only the attributes this kind adds to the static set
    pub fn write_motion(
        &self,
        builder: ComponentStateBuilder,
        motion: Motion,
    ) -> ComponentStateBuilder {
        builder
            .set(self.vx.clone(), motion.velocity.x())
            .set(self.vy.clone(), motion.velocity.y())
            .set(self.omega.clone(), motion.omega)
            .set(self.mass.clone(), motion.mass)
    }

    /// Decode pose and motion from a state
    pub fn read(&self, state: &ComponentState) -> Result<(Pose, Motion)> {
        let pose = self.body.read(state)?;
        let motion = Motion {
            velocity: Coordinate::new(state.get(&self.vx)?, state.get(&self.vy)?),
            omega: state.get(&self.omega)?,
            mass: state.get(&self.mass)?,
        };
        Ok((pose, motion))
    }

    /// All handles this kind declares, including the inherited ones
    pub fn handles(&self) -> Vec<&Attribute> {
        let mut handles = self.body.handles();
        handles.extend([&self.vx, &self.vy, &self.omega, &self.mass]);
        handles
    }
}

/// Attributes of a spring connector
#[derive(Debug, Clone, PartialEq)]
pub struct SpringAttributes {
    /// Spring constant
    pub stiffness: Attribute,
    /// Unstretched length
    pub natural_length: Attribute,
    /// Attachment offset x on endpoint A
    pub connecting_point_ax: Attribute,
    /// Attachment offset y on endpoint A
    pub connecting_point_ay: Attribute,
    /// Attachment offset x on endpoint B
    pub connecting_point_bx: Attribute,
    /// Attachment offset y on endpoint B
    pub connecting_point_by: Attribute,
}

impl SpringAttributes {
    /// Register the spring attributes
    pub fn register(registry: &AttributeRegistry) -> Self {
        SpringAttributes {
            stiffness: registry.register(names::STIFFNESS),
            natural_length: registry.register(names::NATURAL_LENGTH),
            connecting_point_ax: registry.register(names::CONNECTING_POINT_AX),
            connecting_point_ay: registry.register(names::CONNECTING_POINT_AY),
            connecting_point_bx: registry.register(names::CONNECTING_POINT_BX),
            connecting_point_by: registry.register(names::CONNECTING_POINT_BY),
        }
    }

    /// Write spring parameters into a state builder
    pub fn write(
        &self,
        builder: ComponentStateBuilder,
        parameters: SpringParameters,
    ) -> ComponentStateBuilder {
        builder
            .set(self.stiffness.clone(), parameters.stiffness)
            .set(self.natural_length.clone(), parameters.natural_length)
            .set(self.connecting_point_ax.clone(), parameters.connecting_point_a.x())
            .set(self.connecting_point_ay.clone(), parameters.connecting_point_a.y())
            .set(self.connecting_point_bx.clone(), parameters.connecting_point_b.x())
            .set(self.connecting_point_by.clone(), parameters.connecting_point_b.y())
    }

    /// Decode spring parameters from a state
    pub fn read(&self, state: &ComponentState) -> Result<SpringParameters> {
        Ok(SpringParameters {
            stiffness: state.get(&self.stiffness)?,
            natural_length: state.get(&self.natural_length)?,
            connecting_point_a: Coordinate::new(
                state.get(&self.connecting_point_ax)?,
                state.get(&self.connecting_point_ay)?,
            ),
            connecting_point_b: Coordinate::new(
                state.get(&self.connecting_point_bx)?,
                state.get(&self.connecting_point_by)?,
            ),
        })
    }

    /// All handles this kind declares
    pub fn handles(&self) -> Vec<&Attribute> {
        vec![
            &self.stiffness,
            &self.natural_length,
            &self.connecting_point_ax,
            &self.connecting_point_ay,
            &self.connecting_point_bx,
            &self.connecting_point_by,
        ]
    }
}

/// The attribute sets of every built-in kind, registered against one registry
///
/// Build one schema per registry and share it (`Arc<AttributeSchema>`)
/// between assemblies, views and solvers.
#[derive(Debug)]
pub struct AttributeSchema {
    registry: Arc<AttributeRegistry>,
    /// Static body attributes
    pub static_body: StaticBodyAttributes,
    /// Dynamic body attributes
    pub dynamic_body: DynamicBodyAttributes,
    /// Spring attributes
    pub spring: SpringAttributes,
}

impl AttributeSchema {
    /// Register every built-in attribute set in `registry`
    pub fn new(registry: Arc<AttributeRegistry>) -> Self {
        let static_body = StaticBodyAttributes::register(&registry);
        let dynamic_body = DynamicBodyAttributes::register(&registry, static_body.clone());
        let spring = SpringAttributes::register(&registry);
        AttributeSchema {
            registry,
            static_body,
            dynamic_body,
            spring,
        }
    }

    /// Create a schema backed by a fresh registry
    pub fn standalone() -> Arc<Self> {
        Arc::new(Self::new(Arc::new(AttributeRegistry::new())))
    }

    /// Get the registry backing this schema
    pub fn registry(&self) -> &Arc<AttributeRegistry> {
        &self.registry
    }

    /// Register (or look up) an extra attribute such as a shape parameter
    pub fn attribute(&self, name: &str) -> Attribute {
        self.registry.register(name)
    }
}
