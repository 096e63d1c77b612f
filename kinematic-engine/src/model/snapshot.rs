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
//! Immutable snapshots of a whole assembly
//!
//! An `AssemblySnapshot` maps component names to their kinematic views at
//! one timestamp. Snapshots are built once through `AssemblySnapshotBuilder`
//! and never change afterwards; cloning shares the underlying map, so a
//! snapshot can be handed to a rendering thread and a UI thread at once.

use crate::error::{Error, Result};
use crate::geometry::Coordinate;
use crate::model::{DynamicModel, KinematicModel, ModelKind, SpringModel, StaticModel};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Immutable mapping from component name to kinematic view
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssemblySnapshot {
    models: Arc<BTreeMap<String, KinematicModel>>,
}

impl AssemblySnapshot {
    /// Start building a new snapshot
    pub fn builder() -> AssemblySnapshotBuilder {
        AssemblySnapshotBuilder::new()
    }

    /// Copy every entry into a builder so some can be replaced
    pub fn to_builder(&self) -> AssemblySnapshotBuilder {
        AssemblySnapshotBuilder {
            models: (*self.models).clone(),
        }
    }

    /// Get the view of a component
    ///
    /// # Errors
    ///
    /// `UnknownComponentName` if the snapshot has no such component.
    pub fn get(&self, name: &str) -> Result<&KinematicModel> {
        self.models.get(name).ok_or_else(|| Error::unknown(name))
    }

    /// Get a view the caller expects to be present
    ///
    /// Used by consumers such as renderers that were promised a complete
    /// snapshot; an absent entry is reported as `IncompleteSnapshot`.
    pub fn require(&self, name: &str) -> Result<&KinematicModel> {
        self.models.get(name).ok_or_else(|| Error::IncompleteSnapshot {
            missing: vec![name.to_string()],
        })
    }

    /// Get a static body view
    pub fn get_static(&self, name: &str) -> Result<&StaticModel> {
        let model = self.get(name)?;
        model
            .as_static()
            .ok_or_else(|| kind_mismatch(name, ModelKind::StaticBody, model.kind()))
    }

    /// Get a dynamic body view
    pub fn get_dynamic(&self, name: &str) -> Result<&DynamicModel> {
        let model = self.get(name)?;
        model
            .as_dynamic()
            .ok_or_else(|| kind_mismatch(name, ModelKind::DynamicBody, model.kind()))
    }

    /// Get a connector view
    pub fn get_connector(&self, name: &str) -> Result<&SpringModel> {
        let model = self.get(name)?;
        model
            .as_connector()
            .ok_or_else(|| kind_mismatch(name, ModelKind::Connector, model.kind()))
    }

    /// Check whether a component is present
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Get the number of components
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Check if the snapshot has no components
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Iterate over component names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Iterate over (name, view) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KinematicModel)> {
        self.models.iter().map(|(name, model)| (name.as_str(), model))
    }

    /// Check that this snapshot has exactly the components of `reference`
    ///
    /// # Errors
    ///
    /// - `IncompleteSnapshot` listing every component of `reference` that is absent here
    /// - `UnknownComponentName` for the first component present here but not in `reference`
    pub fn ensure_complete(&self, reference: &AssemblySnapshot) -> Result<()> {
        let missing: Vec<String> = reference
            .names()
            .filter(|name| !self.contains(name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(Error::IncompleteSnapshot { missing });
        }
        match self.names().find(|name| !reference.contains(name)) {
            Some(extra) => Err(Error::unknown(extra)),
            None => Ok(()),
        }
    }

    /// Resolve the two bodies a connector joins
    ///
    /// # Errors
    ///
    /// `UnknownComponentName`/`KindMismatch` for the connector itself and
    /// `IncompleteSnapshot` if an endpoint is absent.
    pub fn connector_endpoints(&self, name: &str) -> Result<(&KinematicModel, &KinematicModel)> {
        let spring = self.get_connector(name)?;
        Ok((
            self.require(spring.component_a())?,
            self.require(spring.component_b())?,
        ))
    }

    /// Natural-frame positions of a connector's two attachment points
    ///
    /// Each attachment offset is given in the local frame of its endpoint
    /// body and transformed through that body's pose.
    pub fn attachment_points(&self, name: &str) -> Result<(Coordinate, Coordinate)> {
        let spring = self.get_connector(name)?;
        let (a, b) = self.connector_endpoints(name)?;
        let frame_a = a.frame().ok_or_else(|| not_a_body(spring.component_a(), a))?;
        let frame_b = b.frame().ok_or_else(|| not_a_body(spring.component_b(), b))?;
        Ok((
            frame_a.to_natural(spring.connecting_point_a()),
            frame_b.to_natural(spring.connecting_point_b()),
        ))
    }
}

fn kind_mismatch(name: &str, expected: ModelKind, found: ModelKind) -> Error {
    Error::KindMismatch {
        name: name.to_string(),
        expected: expected.as_str(),
        found: found.as_str(),
    }
}

fn not_a_body(name: &str, model: &KinematicModel) -> Error {
    Error::KindMismatch {
        name: name.to_string(),
        expected: "body",
        found: model.kind().as_str(),
    }
}

/// Stages entries for a new `AssemblySnapshot`
///
/// Staging the same name twice keeps the last view.
#[derive(Debug, Clone, Default)]
pub struct AssemblySnapshotBuilder {
    models: BTreeMap<String, KinematicModel>,
}

impl AssemblySnapshotBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the view of a component
    pub fn kinematic_model(
        mut self,
        name: impl Into<String>,
        model: impl Into<KinematicModel>,
    ) -> Self {
        self.models.insert(name.into(), model.into());
        self
    }

    /// Stage a view through a mutable reference
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        model: impl Into<KinematicModel>,
    ) -> &mut Self {
        self.models.insert(name.into(), model.into());
        self
    }

    /// Materialize the immutable snapshot
    pub fn build(self) -> AssemblySnapshot {
        AssemblySnapshot {
            models: Arc::new(self.models),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeSchema, Component};

    fn snapshot() -> AssemblySnapshot {
        let schema = AttributeSchema::standalone();
        let circ = Component::dynamic_body("circ")
            .x(20.0)
            .y(0.0)
            .mass(10.0)
            .build(&schema)
            .unwrap();
        let wall = Component::static_body("wall")
            .x(20.0)
            .y(100.0)
            .theta(-std::f64::consts::FRAC_PI_2)
            .build(&schema)
            .unwrap();
        let spring = Component::spring("spring")
            .stiffness(30.0)
            .natural_length(100.0)
            .connecting_point_b(Coordinate::new(5.0, 0.0))
            .component_a("circ")
            .component_b("wall")
            .build(&schema)
            .unwrap();
        AssemblySnapshot::builder()
            .kinematic_model("circ", circ.initial_model(&schema).unwrap())
            .kinematic_model("wall", wall.initial_model(&schema).unwrap())
            .kinematic_model("spring", spring.initial_model(&schema).unwrap())
            .build()
    }

    #[test]
    fn test_get_unknown_name() {
        let snapshot = snapshot();
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot.get("circ").is_ok());
        assert_eq!(
            snapshot.get("ghost").unwrap_err(),
            Error::UnknownComponentName {
                name: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_typed_getters() {
        let snapshot = snapshot();
        assert_eq!(snapshot.get_dynamic("circ").unwrap().mass(), 10.0);
        assert_eq!(snapshot.get_connector("spring").unwrap().stiffness(), 30.0);
        assert!(matches!(
            snapshot.get_dynamic("wall"),
            Err(Error::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_require_reports_incomplete() {
        let snapshot = snapshot();
        assert_eq!(
            snapshot.require("ghost").unwrap_err(),
            Error::IncompleteSnapshot {
                missing: vec!["ghost".to_string()]
            }
        );
    }

    #[test]
    fn test_ensure_complete() {
        let full = snapshot();
        let mut partial = AssemblySnapshot::builder();
        partial.insert("circ", full.get("circ").unwrap().clone());
        let partial = partial.build();

        assert!(full.ensure_complete(&full).is_ok());
        assert_eq!(
            partial.ensure_complete(&full).unwrap_err(),
            Error::IncompleteSnapshot {
                missing: vec!["spring".to_string(), "wall".to_string()]
            }
        );
        assert_eq!(
            full.ensure_complete(&partial).unwrap_err(),
            Error::UnknownComponentName {
                name: "spring".to_string()
            }
        );
    }

    #[test]
    fn test_attachment_points_follow_body_frames() {
        let snapshot = snapshot();
        let (a, b) = snapshot.attachment_points("spring").unwrap();
        assert_eq!(a, Coordinate::new(20.0, 0.0));
        // wall is rotated by -90 degrees, so its local +x points down
        assert!((b.x() - 20.0).abs() < 1e-9);
        assert!((b.y() - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_builder_replaces_entries() {
        let original = snapshot();
        let moved = original.get_dynamic("circ").unwrap().to_builder().y(-3.0).build().unwrap();
        let next = original.to_builder().kinematic_model("circ", moved).build();

        assert_eq!(original.get_dynamic("circ").unwrap().y(), 0.0);
        assert_eq!(next.get_dynamic("circ").unwrap().y(), -3.0);
        assert_eq!(next.get("wall").unwrap(), original.get("wall").unwrap());
        assert_ne!(next, original);
    }
}
