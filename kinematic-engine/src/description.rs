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
//! Fully resolved assembly and timeline descriptions
//!
//! A description is the boundary between an external configuration layer
//! and the engine: names, kinds and numeric parameters, already parsed.
//! Reading them from text is left to the caller; with the `serde` feature
//! every description type derives `Serialize` and `Deserialize`.
//!
//! # Schema Versioning
//!
//! Each `AssemblyDescription` carries the schema version it was written
//! against. It is checked with semantic versioning rules against
//! `DESCRIPTION_SCHEMA_VERSION` before anything is built.
//!
//! # Example
//!
//! ```
//! use kinematic_engine::description::{
//!     AssemblyDescription, BodyDescription, BodyKind, ConnectorDescription,
//! };
//! use kinematic_engine::model::{Assembly, AttributeSchema};
//!
//! let description = AssemblyDescription::new("single circle")
//!     .with_body(
//!         BodyDescription::new("circ", BodyKind::MassPoint)
//!             .parameter("x", 20.0)
//!             .parameter("y", 0.0)
//!             .parameter("vy", -30.0)
//!             .parameter("mass", 10.0)
//!             .parameter("radius", 5.0),
//!     )
//!     .with_body(
//!         BodyDescription::new("wall", BodyKind::StaticModel)
//!             .parameter("x", 20.0)
//!             .parameter("y", 100.0),
//!     )
//!     .with_connector(
//!         ConnectorDescription::spring("spring", "wall", "circ")
//!             .parameter("stiffness", 30.0)
//!             .parameter("natural_length", 100.0),
//!     );
//!
//! let assembly = Assembly::from_description(&description, AttributeSchema::standalone())?;
//! assert_eq!(assembly.len(), 3);
//! # Ok::<(), kinematic_engine::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::geometry::Coordinate;
use crate::model::attributes::names;
use crate::model::{Assembly, AssemblySnapshot, AttributeSchema, Component};
use crate::solver::{IntegratorKind, NumericEvolution, UniformGravity};
use crate::timeline::{EvolutionFunction, FixedIntervalTimeline, FunctionTimeline};
use semver::Version;
use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Version of the description schema understood by this engine
///
/// Format: MAJOR.MINOR.PATCH following semantic versioning.
pub const DESCRIPTION_SCHEMA_VERSION: &str = "0.1.0";

/// Default animation refresh period in seconds
pub const DEFAULT_REFRESH_PERIOD: f64 = 0.02;

/// Named numeric parameters of one description entry
pub type Parameters = BTreeMap<String, f64>;

/// Check a description schema version against `DESCRIPTION_SCHEMA_VERSION`
///
/// Uses semantic versioning rules:
/// - Major version must match
/// - For major version 0.x.y, minor versions must match (breaking changes)
/// - For major version >= 1, the description minor version can be less
///   than or equal to the supported one
/// - Patch version is ignored
///
/// # Errors
///
/// `InvalidSchemaVersion` if `version` is not semver;
/// `IncompatibleSchemaVersion` if it is not compatible.
pub fn check_schema_version(version: &str) -> Result<Version> {
    let found = parse_version(version)?;
    let supported = parse_version(DESCRIPTION_SCHEMA_VERSION)?;
    if is_version_compatible(&found, &supported) {
        Ok(found)
    } else {
        Err(Error::IncompatibleSchemaVersion {
            found: version.to_string(),
            supported: DESCRIPTION_SCHEMA_VERSION,
        })
    }
}

fn parse_version(version: &str) -> Result<Version> {
    Version::parse(version).map_err(|_| Error::InvalidSchemaVersion {
        version: version.to_string(),
    })
}

fn is_version_compatible(found: &Version, supported: &Version) -> bool {
    if found.major != supported.major {
        return false;
    }
    if found.major != 0 {
        found.minor <= supported.minor
    } else {
        found.minor == supported.minor
    }
}

/// Description of a whole assembly
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssemblyDescription {
    /// Assembly name
    pub name: String,
    /// Schema version the description was written against
    pub version: String,
    /// Bodies, added first and in order
    #[cfg_attr(feature = "serde", serde(default))]
    pub bodies: Vec<BodyDescription>,
    /// Connectors, added after every body
    #[cfg_attr(feature = "serde", serde(default))]
    pub connectors: Vec<ConnectorDescription>,
    /// Force fields acting on dynamic bodies
    #[cfg_attr(feature = "serde", serde(default))]
    pub fields: Vec<FieldDescription>,
}

impl AssemblyDescription {
    /// Empty description at the current schema version
    pub fn new(name: impl Into<String>) -> Self {
        AssemblyDescription {
            name: name.into(),
            version: DESCRIPTION_SCHEMA_VERSION.to_string(),
            bodies: Vec::new(),
            connectors: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Append a body
    pub fn with_body(mut self, body: BodyDescription) -> Self {
        self.bodies.push(body);
        self
    }

    /// Append a connector
    pub fn with_connector(mut self, connector: ConnectorDescription) -> Self {
        self.connectors.push(connector);
        self
    }

    /// Append a force field
    pub fn with_field(mut self, field: FieldDescription) -> Self {
        self.fields.push(field);
        self
    }

    /// Check the schema version of this description
    pub fn check_version(&self) -> Result<Version> {
        check_schema_version(&self.version)
    }
}

/// Kinds of body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BodyKind {
    /// Dynamic point mass
    MassPoint,
    /// Immovable body such as a wall
    StaticModel,
}

/// Description of one body
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyDescription {
    /// Unique component name
    pub name: String,
    /// Body kind
    pub kind: BodyKind,
    /// Pose, motion and shape parameters
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: Parameters,
}

impl BodyDescription {
    /// Body with no parameters
    pub fn new(name: impl Into<String>, kind: BodyKind) -> Self {
        BodyDescription {
            name: name.into(),
            kind,
            parameters: Parameters::new(),
        }
    }

    /// Set a parameter
    pub fn parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Build the component
    ///
    /// Parameters that are not pose or motion attributes are kept as extra
    /// attributes of the component state.
    pub fn to_component(&self, schema: &AttributeSchema) -> Result<Component> {
        match self.kind {
            BodyKind::StaticModel => {
                let mut builder = Component::static_body(&self.name);
                for (key, &value) in &self.parameters {
                    builder = match key.as_str() {
                        names::X => builder.x(value),
                        names::Y => builder.y(value),
                        names::THETA => builder.theta(value),
                        _ => builder.attribute(key.as_str(), value),
                    };
                }
                builder.build(schema)
            }
            BodyKind::MassPoint => {
                let mut builder = Component::dynamic_body(&self.name);
                for (key, &value) in &self.parameters {
                    builder = match key.as_str() {
                        names::X => builder.x(value),
                        names::Y => builder.y(value),
                        names::THETA => builder.theta(value),
                        names::VX => builder.vx(value),
                        names::VY => builder.vy(value),
                        names::OMEGA => builder.omega(value),
                        names::MASS => builder.mass(value),
                        _ => builder.attribute(key.as_str(), value),
                    };
                }
                builder.build(schema)
            }
        }
    }
}

/// Kinds of connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConnectorKind {
    /// Hookean spring
    Spring,
}

/// Description of one connector
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConnectorDescription {
    /// Unique component name
    pub name: String,
    /// Connector kind
    pub kind: ConnectorKind,
    /// Name of the first joined body
    pub component_a: String,
    /// Name of the second joined body
    pub component_b: String,
    /// Spring and shape parameters
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: Parameters,
}

impl ConnectorDescription {
    /// Spring joining `component_a` and `component_b`
    pub fn spring(
        name: impl Into<String>,
        component_a: impl Into<String>,
        component_b: impl Into<String>,
    ) -> Self {
        ConnectorDescription {
            name: name.into(),
            kind: ConnectorKind::Spring,
            component_a: component_a.into(),
            component_b: component_b.into(),
            parameters: Parameters::new(),
        }
    }

    /// Set a parameter
    pub fn parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Build the component
    pub fn to_component(&self, schema: &AttributeSchema) -> Result<Component> {
        let ConnectorKind::Spring = self.kind;
        let mut builder = Component::spring(&self.name)
            .component_a(&self.component_a)
            .component_b(&self.component_b);
        let mut point_a = Coordinate::origin();
        let mut point_b = Coordinate::origin();
        for (key, &value) in &self.parameters {
            match key.as_str() {
                names::STIFFNESS => builder = builder.stiffness(value),
                names::NATURAL_LENGTH => builder = builder.natural_length(value),
                names::CONNECTING_POINT_AX => point_a = point_a.with_x(value),
                names::CONNECTING_POINT_AY => point_a = point_a.with_y(value),
                names::CONNECTING_POINT_BX => point_b = point_b.with_x(value),
                names::CONNECTING_POINT_BY => point_b = point_b.with_y(value),
                _ => builder = builder.attribute(key.as_str(), value),
            }
        }
        builder
            .connecting_point_a(point_a)
            .connecting_point_b(point_b)
            .build(schema)
    }
}

/// Kinds of force field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldKind {
    /// Uniform gravity with acceleration `(gx, gy)`
    Gravity,
}

/// Description of one force field
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDescription {
    /// Field name, used in error messages
    pub name: String,
    /// Field kind
    pub kind: FieldKind,
    /// Field parameters
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: Parameters,
}

impl FieldDescription {
    /// Gravity field with acceleration `(gx, gy)`
    pub fn gravity(name: impl Into<String>, gx: f64, gy: f64) -> Self {
        FieldDescription {
            name: name.into(),
            kind: FieldKind::Gravity,
            parameters: Parameters::from([("gx".to_string(), gx), ("gy".to_string(), gy)]),
        }
    }

    /// Build the field
    ///
    /// # Errors
    ///
    /// `MissingParameter` if `gy` is absent (`gx` defaults to zero);
    /// `InvalidParameter` for non-finite values.
    pub fn to_gravity(&self) -> Result<UniformGravity> {
        let FieldKind::Gravity = self.kind;
        let gx = self.parameters.get("gx").copied().unwrap_or(0.0);
        let gy = self
            .parameters
            .get("gy")
            .copied()
            .ok_or_else(|| Error::missing(&self.name, "gy"))?;
        UniformGravity::new(gx, gy)
    }
}

/// How a timeline computes snapshots
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum TimelineKind {
    /// A closed-form evolution function supplied by the caller
    Fixed,
    /// Numeric integration of the assembly's equations of motion
    Numeric {
        /// Integration method
        integrator: IntegratorKind,
        /// Largest integration step in seconds
        max_step: f64,
    },
}

/// Description of a timeline driven at a fixed refresh period
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimelineDescription {
    /// Animation refresh period in seconds
    #[cfg_attr(feature = "serde", serde(default = "default_refresh_period"))]
    pub refresh_period: f64,
    /// Evolution strategy
    pub kind: TimelineKind,
}

#[cfg(feature = "serde")]
fn default_refresh_period() -> f64 {
    DEFAULT_REFRESH_PERIOD
}

impl TimelineDescription {
    /// Fixed timeline at the default refresh period
    pub fn fixed() -> Self {
        TimelineDescription {
            refresh_period: DEFAULT_REFRESH_PERIOD,
            kind: TimelineKind::Fixed,
        }
    }

    /// Numeric timeline at the default refresh period
    pub fn numeric(integrator: IntegratorKind, max_step: f64) -> Self {
        TimelineDescription {
            refresh_period: DEFAULT_REFRESH_PERIOD,
            kind: TimelineKind::Numeric {
                integrator,
                max_step,
            },
        }
    }

    /// Build the timeline for `initial`
    ///
    /// A fixed timeline uses `closed_form`; a numeric timeline integrates
    /// the snapshot under the given fields and ignores `closed_form`.
    ///
    /// # Errors
    ///
    /// - `MissingEvolutionFunction` for a fixed timeline without `closed_form`
    /// - `InvalidParameter` for a fixed timeline given force fields, which a
    ///   closed-form function cannot apply
    /// - `InvalidParameter` for a bad refresh period or step
    pub fn build(
        &self,
        initial: AssemblySnapshot,
        fields: &[FieldDescription],
        closed_form: Option<Arc<dyn EvolutionFunction>>,
    ) -> Result<FixedIntervalTimeline> {
        let timeline = match self.kind {
            TimelineKind::Fixed => {
                if !fields.is_empty() {
                    ftlog::warn!(
                        "Fixed timeline cannot apply {} described force fields",
                        fields.len()
                    );
                    return Err(Error::InvalidParameter {
                        parameter: "fields".to_string(),
                        value: fields.len() as f64,
                        reason: "a fixed timeline cannot apply force fields",
                    });
                }
                let evolution = closed_form.ok_or(Error::MissingEvolutionFunction)?;
                FunctionTimeline::from_shared(initial, evolution)
            }
            TimelineKind::Numeric {
                integrator,
                max_step,
            } => {
                let mut evolution = NumericEvolution::new(integrator, max_step)?;
                for field in fields {
                    evolution = evolution.with_field(field.to_gravity()?);
                }
                ftlog::debug!("Numeric timeline: {evolution:?}");
                FunctionTimeline::new(initial, evolution)
            }
        };
        FixedIntervalTimeline::new(timeline, self.refresh_period)
    }
}

impl Default for TimelineDescription {
    fn default() -> Self {
        Self::fixed()
    }
}

impl Assembly {
    /// Build an assembly from a description
    ///
    /// Bodies are added before connectors so endpoints always resolve.
    ///
    /// # Errors
    ///
    /// Schema version errors, then the first component build or
    /// `with_component` error.
    pub fn from_description(
        description: &AssemblyDescription,
        schema: Arc<AttributeSchema>,
    ) -> Result<Self> {
        description.check_version()?;
        let mut assembly = Assembly::new(description.name.as_str(), schema);
        for body in &description.bodies {
            let component = body.to_component(assembly.schema())?;
            assembly.with_component(component)?;
        }
        for connector in &description.connectors {
            let component = connector.to_component(assembly.schema())?;
            assembly.with_component(component)?;
        }
        Ok(assembly)
    }
}
