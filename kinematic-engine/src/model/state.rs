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
//! Immutable per-component state
//!
//! A `ComponentState` maps attribute handles to `f64` values and is never
//! mutated after construction. Successor states are made by copying a state
//! into a `ComponentStateBuilder`, overriding some entries and building a
//! new state.

use crate::error::{Error, Result};
use crate::model::Attribute;
use std::collections::BTreeMap;

/// Immutable mapping from attribute to value
///
/// # Examples
///
/// ```
/// use kinematic_engine::model::{AttributeRegistry, ComponentState};
///
/// let registry = AttributeRegistry::new();
/// let mass = registry.register("mass");
/// let state = ComponentState::builder().set(mass.clone(), 10.0).build();
/// assert_eq!(state.get(&mass).unwrap(), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentState {
    values: BTreeMap<Attribute, f64>,
}

impl ComponentState {
    /// Start building a new state
    pub fn builder() -> ComponentStateBuilder {
        ComponentStateBuilder::new()
    }

    /// Copy this state into a builder so entries can be overridden
    pub fn to_builder(&self) -> ComponentStateBuilder {
        ComponentStateBuilder {
            values: self.values.clone(),
        }
    }

    /// Read the value of an attribute
    ///
    /// # Errors
    ///
    /// `AttributeNotSet` if the attribute was never set on this state.
    pub fn get(&self, attribute: &Attribute) -> Result<f64> {
        self.values
            .get(attribute)
            .copied()
            .ok_or_else(|| Error::AttributeNotSet {
                attribute: attribute.name().to_string(),
            })
    }

    /// Check whether an attribute is set
    pub fn contains(&self, attribute: &Attribute) -> bool {
        self.values.contains_key(attribute)
    }

    /// Get the number of attributes set
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no attribute is set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (attribute, value) pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, f64)> {
        self.values.iter().map(|(attribute, value)| (attribute, *value))
    }
}

/// Accumulates attribute values for a new `ComponentState`
///
/// Setting the same attribute twice keeps the last value.
#[derive(Debug, Clone, Default)]
pub struct ComponentStateBuilder {
    values: BTreeMap<Attribute, f64>,
}

impl ComponentStateBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute value
    pub fn set(mut self, attribute: Attribute, value: f64) -> Self {
        self.values.insert(attribute, value);
        self
    }

    /// Set an attribute value through a mutable reference
    pub fn insert(&mut self, attribute: Attribute, value: f64) -> &mut Self {
        self.values.insert(attribute, value);
        self
    }

    /// Build the immutable state
    pub fn build(self) -> ComponentState {
        ComponentState {
            values: self.values,
        }
    }
}
