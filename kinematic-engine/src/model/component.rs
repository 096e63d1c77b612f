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
//! Components: named physical entities with an initial state
//!
//! A component is a static body, a dynamic body or a connector. It owns its
//! initial `ComponentState`, fixed at construction. States at later times
//! live in snapshots, never in the component itself.
//!
//! Components are created with typed builders. The dynamic body builder
//! wraps a static body builder and delegates the shared fields to it, so
//! the pose is declared and validated in one place.
//!
//! # Example
//!
//! ```
//! use kinematic_engine::model::{AttributeSchema, Component};
//!
//! let schema = AttributeSchema::standalone();
//! let circ = Component::dynamic_body("circ")
//!     .x(20.0)
//!     .y(0.0)
//!     .vy(-30.0)
//!     .mass(10.0)
//!     .attribute("radius", 20.0)
//!     .build(&schema)
//!     .unwrap();
//! assert_eq!(circ.name(), "circ");
//! ```

use crate::error::{Error, Result};
use crate::geometry::Coordinate;
use crate::model::attributes::{Motion, Pose, SpringParameters};
use crate::model::{
    Attribute, AttributeSchema, ComponentState, ComponentStateBuilder, DynamicModel,
    KinematicModel, ModelKind, SpringModel, StaticModel,
};
use std::sync::Arc;

/// Names of the two components a connector joins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorEndpoints {
    /// First joined component
    pub component_a: String,
    /// Second joined component
    pub component_b: String,
}

/// Kind of a component, with connector topology
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    /// Fixed body
    StaticBody,
    /// Moving body
    DynamicBody,
    /// Spring joining two bodies by name
    Connector(ConnectorEndpoints),
}

impl ComponentKind {
    /// Get the matching view kind tag
    pub fn model_kind(&self) -> ModelKind {
        match self {
            ComponentKind::StaticBody => ModelKind::StaticBody,
            ComponentKind::DynamicBody => ModelKind::DynamicBody,
            ComponentKind::Connector(_) => ModelKind::Connector,
        }
    }
}

/// A named physical entity with an immutable initial state
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    name: String,
    kind: ComponentKind,
    initial_state: ComponentState,
}

impl Component {
    /// Create a component from an already built state
    ///
    /// The state is checked against the kind when the component is added
    /// to an assembly.
    pub fn new(
        name: impl Into<String>,
        kind: ComponentKind,
        initial_state: ComponentState,
    ) -> Self {
        Component {
            name: name.into(),
            kind,
            initial_state,
        }
    }

    /// Start building a static body
    pub fn static_body(name: impl Into<String>) -> StaticBodyBuilder {
        StaticBodyBuilder::new(name)
    }

    /// Start building a dynamic body
    pub fn dynamic_body(name: impl Into<String>) -> DynamicBodyBuilder {
        DynamicBodyBuilder::new(name)
    }

    /// Start building a spring
    pub fn spring(name: impl Into<String>) -> SpringBuilder {
        SpringBuilder::new(name)
    }

    /// Get the component name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the component kind
    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Get the initial state
    pub fn initial_state(&self) -> &ComponentState {
        &self.initial_state
    }

    /// Get the connector endpoints, if this is a connector
    pub fn endpoints(&self) -> Option<&ConnectorEndpoints> {
        match &self.kind {
            ComponentKind::Connector(endpoints) => Some(endpoints),
            _ => None,
        }
    }

    /// Wrap the initial state in the view matching this component's kind
    ///
    /// # Errors
    ///
    /// `AttributeNotSet` if the initial state lacks an attribute its kind decodes.
    pub fn initial_model(&self, schema: &Arc<AttributeSchema>) -> Result<KinematicModel> {
        let state = self.initial_state.clone();
        let schema = Arc::clone(schema);
        Ok(match &self.kind {
            ComponentKind::StaticBody => StaticModel::new(state, schema)?.into(),
            ComponentKind::DynamicBody => DynamicModel::new(state, schema)?.into(),
            ComponentKind::Connector(endpoints) => SpringModel::new(
                state,
                &endpoints.component_a,
                &endpoints.component_b,
                schema,
            )?
            .into(),
        })
    }
}

fn finite(component: &str, parameter: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            parameter: format!("{component}.{parameter}"),
            value,
            reason: "must be finite",
        })
    }
}

fn required(component: &str, parameter: &str, value: Option<f64>) -> Result<f64> {
    let value = value.ok_or_else(|| Error::missing(component, parameter))?;
    finite(component, parameter, value)
}

/// Builder for static bodies
///
/// Position is required; orientation starts at zero.
#[derive(Debug, Clone)]
pub struct StaticBodyBuilder {
    name: String,
    x: Option<f64>,
    y: Option<f64>,
    theta: f64,
    extras: Vec<(String, f64)>,
}

impl StaticBodyBuilder {
    /// Create a builder for a static body called `name`
    pub fn new(name: impl Into<String>) -> Self {
        StaticBodyBuilder {
            name: name.into(),
            x: None,
            y: None,
            theta: 0.0,
            extras: Vec::new(),
        }
    }

    /// Set the position x
    pub fn x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    /// Set the position y
    pub fn y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    /// Set the orientation in radians
    pub fn theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Set an extra named attribute (shape or appearance parameter)
    ///
    /// Extras may not reuse the name of an attribute the kind declares;
    /// `build` rejects such a name.
    pub fn attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.extras.push((name.into(), value));
        self
    }

    fn pose(&self) -> Result<Pose> {
        Ok(Pose {
            position: Coordinate::new(
                required(&self.name, "x", self.x)?,
                required(&self.name, "y", self.y)?,
            ),
            theta: finite(&self.name, "theta", self.theta)?,
        })
    }

    /// Write the extras and the pose into `builder`
    ///
    /// `declared` holds the handles of the kind being built; no extra may
    /// reuse one of them.
    fn write(
        &self,
        schema: &AttributeSchema,
        declared: &[&Attribute],
        builder: ComponentStateBuilder,
    ) -> Result<ComponentStateBuilder> {
        let builder = write_extras(&self.name, &self.extras, declared, schema, builder)?;
        Ok(schema.static_body.write(builder, self.pose()?))
    }

    /// Build the component
    ///
    /// # Errors
    ///
    /// `MissingParameter` if x or y was never set; `InvalidParameter` for
    /// non-finite values or an extra named after a static body attribute.
    pub fn build(self, schema: &AttributeSchema) -> Result<Component> {
        let declared = schema.static_body.handles();
        let state = self.write(schema, &declared, ComponentState::builder())?.build();
        Ok(Component::new(self.name, ComponentKind::StaticBody, state))
    }
}

/// Builder for dynamic bodies
///
/// Position and mass are required; orientation, velocity and angular
/// velocity start at zero.
#[derive(Debug, Clone)]
pub struct DynamicBodyBuilder {
    body: StaticBodyBuilder,
    vx: f64,
    vy: f64,
    omega: f64,
    mass: Option<f64>,
}

impl DynamicBodyBuilder {
    /// Create a builder for a dynamic body called `name`
    pub fn new(name: impl Into<String>) -> Self {
        DynamicBodyBuilder {
            body: StaticBodyBuilder::new(name),
            vx: 0.0,
            vy: 0.0,
            omega: 0.0,
            mass: None,
        }
    }

    /// Set the position x
    pub fn x(mut self, x: f64) -> Self {
        self.body = self.body.x(x);
        self
    }

    /// Set the position y
    pub fn y(mut self, y: f64) -> Self {
        self.body = self.body.y(y);
        self
    }

    /// Set the orientation in radians
    pub fn theta(mut self, theta: f64) -> Self {
        self.body = self.body.theta(theta);
        self
    }

    /// Set the velocity x
    pub fn vx(mut self, vx: f64) -> Self {
        self.vx = vx;
        self
    }

    /// Set the velocity y
    pub fn vy(mut self, vy: f64) -> Self {
        self.vy = vy;
        self
    }

    /// Set the angular velocity
    pub fn omega(mut self, omega: f64) -> Self {
        self.omega = omega;
        self
    }

    /// Set the mass
    pub fn mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Set an extra named attribute (shape or appearance parameter)
    pub fn attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.body = self.body.attribute(name, value);
        self
    }

    /// Build the component
    ///
    /// # Errors
    ///
    /// `MissingParameter` if x, y or mass was never set; `InvalidParameter`
    /// for non-finite values or an extra named after a dynamic body
    /// attribute.
    pub fn build(self, schema: &AttributeSchema) -> Result<Component> {
        let name = &self.body.name;
        let motion = Motion {
            velocity: Coordinate::new(finite(name, "vx", self.vx)?, finite(name, "vy", self.vy)?),
            omega: finite(name, "omega", self.omega)?,
            mass: required(name, "mass", self.mass)?,
        };
        let declared = schema.dynamic_body.handles();
        let builder = self.body.write(schema, &declared, ComponentState::builder())?;
        let state = schema.dynamic_body.write_motion(builder, motion).build();
        Ok(Component::new(
            self.body.name,
            ComponentKind::DynamicBody,
            state,
        ))
    }
}

/// Builder for springs
///
/// Stiffness, natural length and both endpoints are required; attachment
/// points default to the endpoint origins.
#[derive(Debug, Clone)]
pub struct SpringBuilder {
    name: String,
    stiffness: Option<f64>,
    natural_length: Option<f64>,
    connecting_point_a: Coordinate,
    connecting_point_b: Coordinate,
    component_a: Option<String>,
    component_b: Option<String>,
    extras: Vec<(String, f64)>,
}

impl SpringBuilder {
    /// Create a builder for a spring called `name`
    pub fn new(name: impl Into<String>) -> Self {
        SpringBuilder {
            name: name.into(),
            stiffness: None,
            natural_length: None,
            connecting_point_a: Coordinate::origin(),
            connecting_point_b: Coordinate::origin(),
            component_a: None,
            component_b: None,
            extras: Vec::new(),
        }
    }

    /// Set the spring constant
    pub fn stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = Some(stiffness);
        self
    }

    /// Set the unstretched length
    pub fn natural_length(mut self, natural_length: f64) -> Self {
        self.natural_length = Some(natural_length);
        self
    }

    /// Set the attachment point in the local frame of endpoint A
    pub fn connecting_point_a(mut self, point: Coordinate) -> Self {
        self.connecting_point_a = point;
        self
    }

    /// Set the attachment point in the local frame of endpoint B
    pub fn connecting_point_b(mut self, point: Coordinate) -> Self {
        self.connecting_point_b = point;
        self
    }

    /// Set the first joined component by name
    pub fn component_a(mut self, name: impl Into<String>) -> Self {
        self.component_a = Some(name.into());
        self
    }

    /// Set the second joined component by name
    pub fn component_b(mut self, name: impl Into<String>) -> Self {
        self.component_b = Some(name.into());
        self
    }

    /// Set an extra named attribute (shape or appearance parameter)
    pub fn attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.extras.push((name.into(), value));
        self
    }

    /// Build the component
    ///
    /// Endpoints are only recorded here; they are resolved when the spring
    /// is added to an assembly.
    ///
    /// # Errors
    ///
    /// `MissingParameter` for an absent stiffness, natural length or
    /// endpoint; `InvalidParameter` for non-finite values or an extra named
    /// after a spring attribute.
    pub fn build(self, schema: &AttributeSchema) -> Result<Component> {
        let name = &self.name;
        for (parameter, point) in [
            ("connecting_point_a", self.connecting_point_a),
            ("connecting_point_b", self.connecting_point_b),
        ] {
            if !point.is_finite() {
                return Err(Error::InvalidParameter {
                    parameter: format!("{name}.{parameter}"),
                    value: if point.x().is_finite() { point.y() } else { point.x() },
                    reason: "must be finite",
                });
            }
        }
        let parameters = SpringParameters {
            stiffness: required(name, "stiffness", self.stiffness)?,
            natural_length: required(name, "natural_length", self.natural_length)?,
            connecting_point_a: self.connecting_point_a,
            connecting_point_b: self.connecting_point_b,
        };
        let endpoints = ConnectorEndpoints {
            component_a: self
                .component_a
                .clone()
                .ok_or_else(|| Error::missing(name, "component_a"))?,
            component_b: self
                .component_b
                .clone()
                .ok_or_else(|| Error::missing(name, "component_b"))?,
        };
        let declared = schema.spring.handles();
        let builder =
            write_extras(name, &self.extras, &declared, schema, ComponentState::builder())?;
        let state = schema.spring.write(builder, parameters).build();
        Ok(Component::new(
            self.name,
            ComponentKind::Connector(endpoints),
            state,
        ))
    }
}

fn write_extras(
    component: &str,
    extras: &[(String, f64)],
    declared: &[&Attribute],
    schema: &AttributeSchema,
    mut builder: ComponentStateBuilder,
) -> Result<ComponentStateBuilder> {
    for (name, value) in extras {
        let attribute = schema.attribute(name);
        if declared.contains(&&attribute) {
            return Err(Error::InvalidParameter {
                parameter: format!("{component}.{name}"),
                value: *value,
                reason: "extra attribute shadows a built-in attribute",
            });
        }
        builder = builder.set(attribute, finite(component, name, *value)?);
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_body_defaults_theta() {
        let schema = AttributeSchema::standalone();
        let wall = Component::static_body("wall")
            .x(20.0)
            .y(100.0)
            .build(&schema)
            .unwrap();
        assert_eq!(wall.initial_state().get(&schema.static_body.theta).unwrap(), 0.0);
        assert_eq!(wall.kind(), &ComponentKind::StaticBody);
    }

    #[test]
    fn test_dynamic_body_shares_static_fields() {
        let schema = AttributeSchema::standalone();
        let circ = Component::dynamic_body("circ")
            .x(20.0)
            .y(0.0)
            .vy(-30.0)
            .mass(10.0)
            .build(&schema)
            .unwrap();
        let state = circ.initial_state();
        assert_eq!(state.get(&schema.static_body.x).unwrap(), 20.0);
        assert_eq!(state.get(&schema.dynamic_body.vy).unwrap(), -30.0);
        assert_eq!(state.len(), schema.dynamic_body.handles().len());
    }

    #[test]
    fn test_missing_mass_is_an_error() {
        let schema = AttributeSchema::standalone();
        let err = Component::dynamic_body("circ")
            .x(0.0)
            .y(0.0)
            .build(&schema)
            .unwrap_err();
        assert_eq!(err, Error::missing("circ", "mass"));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let schema = AttributeSchema::standalone();
        let err = Component::static_body("wall")
            .x(f64::NAN)
            .y(0.0)
            .build(&schema)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_extra_attributes_are_registered() {
        let schema = AttributeSchema::standalone();
        let wall = Component::static_body("wall")
            .x(0.0)
            .y(0.0)
            .attribute("length", 40.0)
            .build(&schema)
            .unwrap();
        let length = schema.registry().lookup("length").unwrap();
        assert_eq!(wall.initial_state().get(&length).unwrap(), 40.0);
    }

    #[test]
    fn test_extra_named_after_builtin_is_rejected() {
        let schema = AttributeSchema::standalone();
        let err = Component::dynamic_body("b")
            .x(1.0)
            .y(2.0)
            .mass(3.0)
            .attribute("mass", 99.0)
            .build(&schema)
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidParameter {
                parameter: "b.mass".to_string(),
                value: 99.0,
                reason: "extra attribute shadows a built-in attribute",
            }
        );
        assert!(Component::static_body("wall")
            .x(0.0)
            .y(0.0)
            .attribute("theta", 1.0)
            .build(&schema)
            .is_err());
        assert!(Component::spring("spring")
            .stiffness(1.0)
            .natural_length(1.0)
            .component_a("a")
            .component_b("b")
            .attribute("stiffness", 2.0)
            .build(&schema)
            .is_err());
    }

    #[test]
    fn test_extras_only_reserve_their_own_kind() {
        let schema = AttributeSchema::standalone();
        // a wall has no mass attribute of its own, so the name is free
        let wall = Component::static_body("wall")
            .x(0.0)
            .y(0.0)
            .attribute("mass", 5.0)
            .build(&schema)
            .unwrap();
        assert_eq!(wall.initial_state().get(&schema.dynamic_body.mass).unwrap(), 5.0);
    }

    #[test]
    fn test_spring_requires_endpoints() {
        let schema = AttributeSchema::standalone();
        let err = Component::spring("spring")
            .stiffness(30.0)
            .natural_length(100.0)
            .component_a("circ")
            .build(&schema)
            .unwrap_err();
        assert_eq!(err, Error::missing("spring", "component_b"));
    }

    #[test]
    fn test_initial_model_matches_kind() {
        let schema = AttributeSchema::standalone();
        let spring = Component::spring("spring")
            .stiffness(30.0)
            .natural_length(100.0)
            .component_a("circ")
            .component_b("wall")
            .build(&schema)
            .unwrap();
        let model = spring.initial_model(&schema).unwrap();
        assert_eq!(model.kind(), ModelKind::Connector);
        assert_eq!(model.as_connector().unwrap().stiffness(), 30.0);
    }
}
