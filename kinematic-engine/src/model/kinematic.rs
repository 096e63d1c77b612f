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
//! Kind-specific read views over component states
//!
//! Snapshots store one `KinematicModel` per component. The set of kinds is
//! closed: static bodies, dynamic bodies and connectors. Each view wraps a
//! `ComponentState`, checks on construction that every attribute its kind
//! decodes is present, and then exposes infallible typed accessors.
//!
//! Views are immutable. `to_builder()` copies a view's state so a solver
//! can override a few entries and build the successor view.

use crate::error::Result;
use crate::geometry::{Coordinate, CoordinateSystem};
use crate::model::attributes::{Motion, Pose, SpringParameters};
use crate::model::{Attribute, AttributeSchema, ComponentState, ComponentStateBuilder};
use std::fmt;
use std::sync::Arc;

/// Tag identifying the kind of a component or view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Fixed body with a pose only
    StaticBody,
    /// Moving body with velocity, angular velocity and mass
    DynamicBody,
    /// Connector (spring) joining two bodies
    Connector,
}

impl ModelKind {
    /// Human-readable kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::StaticBody => "static body",
            ModelKind::DynamicBody => "dynamic body",
            ModelKind::Connector => "connector",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// View of a static body
#[derive(Debug, Clone)]
pub struct StaticModel {
    state: ComponentState,
    pose: Pose,
    schema: Arc<AttributeSchema>,
}

impl StaticModel {
    /// Wrap a state as a static body view
    ///
    /// # Errors
    ///
    /// `AttributeNotSet` if `x`, `y` or `theta` is missing.
    pub fn new(state: ComponentState, schema: Arc<AttributeSchema>) -> Result<Self> {
        let pose = schema.static_body.read(&state)?;
        Ok(StaticModel {
            state,
            pose,
            schema,
        })
    }

    /// Get the position x
    pub fn x(&self) -> f64 {
        self.pose.position.x()
    }

    /// Get the position y
    pub fn y(&self) -> f64 {
        self.pose.position.y()
    }

    /// Get the orientation in radians
    pub fn theta(&self) -> f64 {
        self.pose.theta
    }

    /// Get the position
    pub fn position(&self) -> Coordinate {
        self.pose.position
    }

    /// Get the pose
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Local frame of the body: origin at its position, rotated by theta
    pub fn frame(&self) -> CoordinateSystem {
        CoordinateSystem::rotated(self.pose.position, self.pose.theta)
    }

    /// Get the underlying state
    pub fn state(&self) -> &ComponentState {
        &self.state
    }

    /// Copy this view into a builder for a successor view
    pub fn to_builder(&self) -> StaticModelBuilder {
        StaticModelBuilder {
            state: self.state.to_builder(),
            schema: Arc::clone(&self.schema),
        }
    }
}

impl PartialEq for StaticModel {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

/// Builder for successor `StaticModel`s
#[derive(Debug, Clone)]
pub struct StaticModelBuilder {
    state: ComponentStateBuilder,
    schema: Arc<AttributeSchema>,
}

impl StaticModelBuilder {
    /// Override x
    pub fn x(mut self, x: f64) -> Self {
        self.state.insert(self.schema.static_body.x.clone(), x);
        self
    }

    /// Override y
    pub fn y(mut self, y: f64) -> Self {
        self.state.insert(self.schema.static_body.y.clone(), y);
        self
    }

    /// Override theta
    pub fn theta(mut self, theta: f64) -> Self {
        self.state.insert(self.schema.static_body.theta.clone(), theta);
        self
    }

    /// Override any attribute
    pub fn attribute(mut self, attribute: Attribute, value: f64) -> Self {
        self.state.insert(attribute, value);
        self
    }

    /// Build the successor view
    pub fn build(self) -> Result<StaticModel> {
        StaticModel::new(self.state.build(), self.schema)
    }
}

/// View of a dynamic body
#[derive(Debug, Clone)]
pub struct DynamicModel {
    state: ComponentState,
    pose: Pose,
    motion: Motion,
    schema: Arc<AttributeSchema>,
}

impl DynamicModel {
    /// Wrap a state as a dynamic body view
    ///
    /// # Errors
    ///
    /// `AttributeNotSet` if any static or dynamic body attribute is missing.
    pub fn new(state: ComponentState, schema: Arc<AttributeSchema>) -> Result<Self> {
        let (pose, motion) = schema.dynamic_body.read(&state)?;
        Ok(DynamicModel {
            state,
            pose,
            motion,
            schema,
        })
    }

    /// Get the position x
    pub fn x(&self) -> f64 {
        self.pose.position.x()
    }

    /// Get the position y
    pub fn y(&self) -> f64 {
        self.pose.position.y()
    }

    /// Get the orientation in radians
    pub fn theta(&self) -> f64 {
        self.pose.theta
    }

    /// Get the velocity x
    pub fn vx(&self) -> f64 {
        self.motion.velocity.x()
    }

    /// Get the velocity y
    pub fn vy(&self) -> f64 {
        self.motion.velocity.y()
    }

    /// Get the angular velocity
    pub fn omega(&self) -> f64 {
        self.motion.omega
    }

    /// Get the mass
    pub fn mass(&self) -> f64 {
        self.motion.mass
    }

    /// Get the position
    pub fn position(&self) -> Coordinate {
        self.pose.position
    }

    /// Get the velocity
    pub fn velocity(&self) -> Coordinate {
        self.motion.velocity
    }

    /// Get the pose
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Get the motion parameters
    pub fn motion(&self) -> Motion {
        self.motion
    }

    /// Translational kinetic energy, 0.5 * m * v²
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.motion.mass * self.motion.velocity.norm_squared()
    }

    /// Local frame of the body: origin at its position, rotated by theta
    pub fn frame(&self) -> CoordinateSystem {
        CoordinateSystem::rotated(self.pose.position, self.pose.theta)
    }

    /// Get the underlying state
    pub fn state(&self) -> &ComponentState {
        &self.state
    }

    /// Copy this view into a builder for a successor view
    pub fn to_builder(&self) -> DynamicModelBuilder {
        DynamicModelBuilder {
            state: self.state.to_builder(),
            schema: Arc::clone(&self.schema),
        }
    }
}

impl PartialEq for DynamicModel {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

/// Builder for successor `DynamicModel`s
#[derive(Debug, Clone)]
pub struct DynamicModelBuilder {
    state: ComponentStateBuilder,
    schema: Arc<AttributeSchema>,
}

impl DynamicModelBuilder {
    fn with(mut self, attribute: fn(&AttributeSchema) -> &Attribute, value: f64) -> Self {
        self.state.insert(attribute(&self.schema).clone(), value);
        self
    }

    /// Override x
    pub fn x(self, x: f64) -> Self {
        self.with(|s| &s.dynamic_body.body.x, x)
    }

    /// Override y
    pub fn y(self, y: f64) -> Self {
        self.with(|s| &s.dynamic_body.body.y, y)
    }

    /// Override theta
    pub fn theta(self, theta: f64) -> Self {
        self.with(|s| &s.dynamic_body.body.theta, theta)
    }

    /// Override vx
    pub fn vx(self, vx: f64) -> Self {
        self.with(|s| &s.dynamic_body.vx, vx)
    }

    /// Override vy
    pub fn vy(self, vy: f64) -> Self {
        self.with(|s| &s.dynamic_body.vy, vy)
    }

    /// Override omega
    pub fn omega(self, omega: f64) -> Self {
        self.with(|s| &s.dynamic_body.omega, omega)
    }

    /// Override mass
    pub fn mass(self, mass: f64) -> Self {
        self.with(|s| &s.dynamic_body.mass, mass)
    }

    /// Override position
    pub fn position(self, position: Coordinate) -> Self {
        self.x(position.x()).y(position.y())
    }

    /// Override velocity
    pub fn velocity(self, velocity: Coordinate) -> Self {
        self.vx(velocity.x()).vy(velocity.y())
    }

    /// Override any attribute
    pub fn attribute(mut self, attribute: Attribute, value: f64) -> Self {
        self.state.insert(attribute, value);
        self
    }

    /// Build the successor view
    pub fn build(self) -> Result<DynamicModel> {
        DynamicModel::new(self.state.build(), self.schema)
    }
}

/// View of a spring connector
///
/// The endpoints are referenced by component name; resolve them through
/// the snapshot that holds this view.
#[derive(Debug, Clone)]
pub struct SpringModel {
    state: ComponentState,
    parameters: SpringParameters,
    component_a: Arc<str>,
    component_b: Arc<str>,
    schema: Arc<AttributeSchema>,
}

impl SpringModel {
    /// Wrap a state as a spring view joining `component_a` and `component_b`
    ///
    /// # Errors
    ///
    /// `AttributeNotSet` if any spring attribute is missing.
    pub fn new(
        state: ComponentState,
        component_a: &str,
        component_b: &str,
        schema: Arc<AttributeSchema>,
    ) -> Result<Self> {
        let parameters = schema.spring.read(&state)?;
        Ok(SpringModel {
            state,
            parameters,
            component_a: Arc::from(component_a),
            component_b: Arc::from(component_b),
            schema,
        })
    }

    /// Get the spring constant
    pub fn stiffness(&self) -> f64 {
        self.parameters.stiffness
    }

    /// Get the unstretched length
    pub fn natural_length(&self) -> f64 {
        self.parameters.natural_length
    }

    /// Attachment point in the local frame of endpoint A
    pub fn connecting_point_a(&self) -> Coordinate {
        self.parameters.connecting_point_a
    }

    /// Attachment point in the local frame of endpoint B
    pub fn connecting_point_b(&self) -> Coordinate {
        self.parameters.connecting_point_b
    }

    /// Get all spring parameters
    pub fn parameters(&self) -> SpringParameters {
        self.parameters
    }

    /// Name of the first joined component
    pub fn component_a(&self) -> &str {
        &self.component_a
    }

    /// Name of the second joined component
    pub fn component_b(&self) -> &str {
        &self.component_b
    }

    /// Elastic potential energy for the given current length
    pub fn potential_energy(&self, length: f64) -> f64 {
        let stretch = length - self.parameters.natural_length;
        0.5 * self.parameters.stiffness * stretch * stretch
    }

    /// Get the underlying state
    pub fn state(&self) -> &ComponentState {
        &self.state
    }

    /// Copy this view into a builder for a successor view
    ///
    /// The endpoints are part of the assembly topology and cannot change.
    pub fn to_builder(&self) -> SpringModelBuilder {
        SpringModelBuilder {
            state: self.state.to_builder(),
            component_a: Arc::clone(&self.component_a),
            component_b: Arc::clone(&self.component_b),
            schema: Arc::clone(&self.schema),
        }
    }
}

impl PartialEq for SpringModel {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
            && self.component_a == other.component_a
            && self.component_b == other.component_b
    }
}

/// Builder for successor `SpringModel`s
#[derive(Debug, Clone)]
pub struct SpringModelBuilder {
    state: ComponentStateBuilder,
    component_a: Arc<str>,
    component_b: Arc<str>,
    schema: Arc<AttributeSchema>,
}

impl SpringModelBuilder {
    /// Override the spring constant
    pub fn stiffness(mut self, stiffness: f64) -> Self {
        self.state.insert(self.schema.spring.stiffness.clone(), stiffness);
        self
    }

    /// Override the unstretched length
    pub fn natural_length(mut self, natural_length: f64) -> Self {
        self.state
            .insert(self.schema.spring.natural_length.clone(), natural_length);
        self
    }

    /// Override any attribute
    pub fn attribute(mut self, attribute: Attribute, value: f64) -> Self {
        self.state.insert(attribute, value);
        self
    }

    /// Build the successor view
    pub fn build(self) -> Result<SpringModel> {
        SpringModel::new(
            self.state.build(),
            &self.component_a,
            &self.component_b,
            self.schema,
        )
    }
}

/// A component's view inside a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicModel {
    /// Static body view
    Static(StaticModel),
    /// Dynamic body view
    Dynamic(DynamicModel),
    /// Connector view
    Connector(SpringModel),
}

impl KinematicModel {
    /// Get the kind tag
    pub fn kind(&self) -> ModelKind {
        match self {
            KinematicModel::Static(_) => ModelKind::StaticBody,
            KinematicModel::Dynamic(_) => ModelKind::DynamicBody,
            KinematicModel::Connector(_) => ModelKind::Connector,
        }
    }

    /// Get the underlying state
    pub fn state(&self) -> &ComponentState {
        match self {
            KinematicModel::Static(model) => model.state(),
            KinematicModel::Dynamic(model) => model.state(),
            KinematicModel::Connector(model) => model.state(),
        }
    }

    /// Pose of a body; `None` for connectors
    pub fn pose(&self) -> Option<Pose> {
        match self {
            KinematicModel::Static(model) => Some(model.pose()),
            KinematicModel::Dynamic(model) => Some(model.pose()),
            KinematicModel::Connector(_) => None,
        }
    }

    /// Local frame of a body; `None` for connectors
    pub fn frame(&self) -> Option<CoordinateSystem> {
        self.pose()
            .map(|pose| CoordinateSystem::rotated(pose.position, pose.theta))
    }

    /// Get the static body view, if this is one
    pub fn as_static(&self) -> Option<&StaticModel> {
        match self {
            KinematicModel::Static(model) => Some(model),
            _ => None,
        }
    }

    /// Get the dynamic body view, if this is one
    pub fn as_dynamic(&self) -> Option<&DynamicModel> {
        match self {
            KinematicModel::Dynamic(model) => Some(model),
            _ => None,
        }
    }

    /// Get the connector view, if this is one
    pub fn as_connector(&self) -> Option<&SpringModel> {
        match self {
            KinematicModel::Connector(model) => Some(model),
            _ => None,
        }
    }
}

impl From<StaticModel> for KinematicModel {
    fn from(model: StaticModel) -> Self {
        KinematicModel::Static(model)
    }
}

impl From<DynamicModel> for KinematicModel {
    fn from(model: DynamicModel) -> Self {
        KinematicModel::Dynamic(model)
    }
}

impl From<SpringModel> for KinematicModel {
    fn from(model: SpringModel) -> Self {
        KinematicModel::Connector(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn mass_point(schema: &Arc<AttributeSchema>) -> DynamicModel {
        let pose = Pose {
            position: Coordinate::new(20.0, 0.0),
            theta: 0.0,
        };
        let motion = Motion {
            velocity: Coordinate::new(0.0, -30.0),
            omega: 0.0,
            mass: 10.0,
        };
        let state = schema
            .dynamic_body
            .write(ComponentState::builder(), pose, motion)
            .build();
        DynamicModel::new(state, Arc::clone(schema)).unwrap()
    }

    #[test]
    fn test_dynamic_accessors() {
        let schema = AttributeSchema::standalone();
        let model = mass_point(&schema);
        assert_eq!(model.x(), 20.0);
        assert_eq!(model.vy(), -30.0);
        assert_eq!(model.mass(), 10.0);
        assert_eq!(model.kinetic_energy(), 4500.0);
    }

    #[test]
    fn test_to_builder_leaves_original_untouched() {
        let schema = AttributeSchema::standalone();
        let model = mass_point(&schema);
        let moved = model.to_builder().y(-5.0).vy(0.0).build().unwrap();

        assert_eq!(model.y(), 0.0);
        assert_eq!(moved.y(), -5.0);
        assert_eq!(moved.vy(), 0.0);
        assert_eq!(moved.mass(), model.mass());
    }

    #[test]
    fn test_missing_attribute_rejected() {
        let schema = AttributeSchema::standalone();
        let state = ComponentState::builder()
            .set(schema.static_body.x.clone(), 1.0)
            .set(schema.static_body.y.clone(), 1.0)
            .build();
        let err = StaticModel::new(state, Arc::clone(&schema)).unwrap_err();
        assert_eq!(
            err,
            Error::AttributeNotSet {
                attribute: "theta".to_string()
            }
        );
    }

    #[test]
    fn test_kind_tags() {
        let schema = AttributeSchema::standalone();
        let model = KinematicModel::from(mass_point(&schema));
        assert_eq!(model.kind(), ModelKind::DynamicBody);
        assert!(model.as_dynamic().is_some());
        assert!(model.as_static().is_none());
        assert_eq!(model.pose().unwrap().position, Coordinate::new(20.0, 0.0));
    }

    #[test]
    fn test_spring_potential_energy() {
        let schema = AttributeSchema::standalone();
        let parameters = SpringParameters {
            stiffness: 30.0,
            natural_length: 100.0,
            ..SpringParameters::default()
        };
        let state = schema
            .spring
            .write(ComponentState::builder(), parameters)
            .build();
        let spring = SpringModel::new(state, "circ", "wall", Arc::clone(&schema)).unwrap();
        assert_eq!(spring.component_a(), "circ");
        assert_eq!(spring.potential_energy(102.0), 60.0);
        assert_eq!(spring.potential_energy(100.0), 0.0);
    }
}
