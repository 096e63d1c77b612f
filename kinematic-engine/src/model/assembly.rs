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
//! Assemblies: the component topology of one simulated system
//!
//! An assembly is filled during a single-threaded setup phase and then
//! treated as frozen: its initial snapshot seeds a timeline, and from then
//! on only the numeric state of each member changes, never membership.
//!
//! # Setup Precondition
//!
//! `with_component` takes `&mut self`, so it cannot race with snapshot
//! queries on the same value. Building timelines while another thread is
//! still adding components to a shared copy is not supported.

use crate::error::{Error, Result};
use crate::model::{AssemblySnapshot, AttributeSchema, Component, ComponentKind, ModelKind};
use std::collections::HashMap;
use std::sync::Arc;

/// A named collection of uniquely named components
///
/// # Example
///
/// ```
/// use kinematic_engine::model::{Assembly, AttributeSchema, Component};
///
/// let schema = AttributeSchema::standalone();
/// let mut assembly = Assembly::new("assembly", schema.clone());
/// assembly
///     .with_component(Component::dynamic_body("circ").x(20.0).y(0.0).mass(10.0).build(&schema)?)?
///     .with_component(Component::static_body("wall").x(20.0).y(100.0).build(&schema)?)?;
///
/// let snapshot = assembly.initial_snapshot()?;
/// assert_eq!(snapshot.len(), 2);
/// # Ok::<(), kinematic_engine::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Assembly {
    name: String,
    schema: Arc<AttributeSchema>,
    /// Components in insertion order
    components: Vec<Component>,
    /// Component name to index in `components`
    index: HashMap<String, usize>,
}

impl Assembly {
    /// Create an empty assembly
    pub fn new(name: impl Into<String>, schema: Arc<AttributeSchema>) -> Self {
        Assembly {
            name: name.into(),
            schema,
            components: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a component
    ///
    /// Connector endpoints must already be part of the assembly, so add
    /// bodies before the springs that join them.
    ///
    /// # Errors
    ///
    /// - `DuplicateComponentName` if the name is taken
    /// - `UnresolvedConnectorEndpoint` if a connector endpoint is absent
    /// - `KindMismatch` if a connector endpoint is itself a connector
    /// - `AttributeNotSet` if the initial state does not fit the kind
    pub fn with_component(&mut self, component: Component) -> Result<&mut Self> {
        if self.index.contains_key(component.name()) {
            return Err(Error::DuplicateComponentName {
                name: component.name().to_string(),
            });
        }

        if let ComponentKind::Connector(endpoints) = component.kind() {
            for endpoint in [&endpoints.component_a, &endpoints.component_b] {
                let target = self.component(endpoint).map_err(|_| {
                    Error::UnresolvedConnectorEndpoint {
                        connector: component.name().to_string(),
                        endpoint: endpoint.clone(),
                    }
                })?;
                if target.kind().model_kind() == ModelKind::Connector {
                    return Err(Error::KindMismatch {
                        name: endpoint.clone(),
                        expected: "body",
                        found: ModelKind::Connector.as_str(),
                    });
                }
            }
        }

        // Decode once so a malformed state fails here rather than at snapshot time
        component.initial_model(&self.schema)?;

        ftlog::debug!(
            "Assembly '{}': added {} '{}'",
            self.name,
            component.kind().model_kind(),
            component.name()
        );
        self.index
            .insert(component.name().to_string(), self.components.len());
        self.components.push(component);
        Ok(self)
    }

    /// Build a fresh snapshot from every component's initial state
    ///
    /// Side-effect free; repeated calls on an unchanged assembly return
    /// equal snapshots.
    pub fn initial_snapshot(&self) -> Result<AssemblySnapshot> {
        let mut builder = AssemblySnapshot::builder();
        for component in &self.components {
            builder.insert(component.name(), component.initial_model(&self.schema)?);
        }
        ftlog::info!(
            "Assembly '{}': initial snapshot with {} components",
            self.name,
            self.components.len()
        );
        Ok(builder.build())
    }

    /// Get a component by name
    pub fn component(&self, name: &str) -> Result<&Component> {
        self.index
            .get(name)
            .map(|&i| &self.components[i])
            .ok_or_else(|| Error::unknown(name))
    }

    /// Iterate over components in insertion order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Get the assembly name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the attribute schema components are decoded with
    pub fn schema(&self) -> &Arc<AttributeSchema> {
        &self.schema
    }

    /// Get the number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the assembly has no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
