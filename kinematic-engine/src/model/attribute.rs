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
//! Attribute handles and the registry that issues them
//!
//! An attribute is a named numeric field ("x", "vy", "stiffness", ...)
//! shared by every component kind. Handles are issued by an
//! `AttributeRegistry`, which is append-only: the first registration of a
//! name allocates a handle, later registrations return the same one.
//!
//! Registries are ordinary values owned by the composition root (usually
//! behind an `Arc`), so tests can build isolated ones. Handles from
//! different registries never compare equal.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(0);

/// Handle to a registered attribute
///
/// Equality, ordering and hashing use only the (registry, index) pair; the
/// name is carried along for diagnostics.
#[derive(Debug, Clone)]
pub struct Attribute {
    registry: u64,
    index: u32,
    name: Arc<str>,
}

impl Attribute {
    /// Get the name this attribute was registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the registration index within the owning registry
    pub fn index(&self) -> u32 {
        self.index
    }

    fn key(&self) -> (u64, u32) {
        (self.registry, self.index)
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Attribute {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Attribute {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Append-only table mapping attribute names to handles
///
/// # Thread Safety
///
/// Registration takes a write lock and re-checks the table before
/// inserting, so concurrent first registrations of the same name always
/// observe a single handle. Lookups of existing names only take the read
/// lock.
pub struct AttributeRegistry {
    id: u64,
    attributes: RwLock<HashMap<Arc<str>, Attribute>>,
}

impl AttributeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        AttributeRegistry {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            attributes: RwLock::new(HashMap::new()),
        }
    }

    /// Return the handle for `name`, allocating it on first use
    ///
    /// # Example
    ///
    /// ```
    /// use kinematic_engine::model::AttributeRegistry;
    ///
    /// let registry = AttributeRegistry::new();
    /// let vx = registry.register("vx");
    /// assert_eq!(vx, registry.register("vx"));
    /// assert_ne!(vx, registry.register("vy"));
    /// ```
    pub fn register(&self, name: &str) -> Attribute {
        if let Some(existing) = self.lookup(name) {
            return existing;
        }

        // Entries are only ever inserted whole, so a poisoned map is still consistent
        let mut attributes = self
            .attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = attributes.get(name) {
            return existing.clone();
        }

        let name: Arc<str> = Arc::from(name);
        let attribute = Attribute {
            registry: self.id,
            index: attributes.len() as u32,
            name: Arc::clone(&name),
        };
        attributes.insert(name, attribute.clone());
        ftlog::debug!(
            "Registered attribute '{}' with index {}",
            attribute.name(),
            attribute.index()
        );
        attribute
    }

    /// Find the handle for `name` without registering it
    pub fn lookup(&self, name: &str) -> Option<Attribute> {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Get the number of registered attributes
    pub fn len(&self) -> usize {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no attribute has been registered yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get all registered attributes in registration order
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut all: Vec<Attribute> = self
            .attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort();
        all
    }
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AttributeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeRegistry")
            .field("id", &self.id)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_register_is_idempotent() {
        let registry = AttributeRegistry::new();
        let first = registry.register("omega");
        let second = registry.register("omega");
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(first.name(), "omega");
    }

    #[test]
    fn test_distinct_names_get_distinct_handles() {
        let registry = AttributeRegistry::new();
        let names = ["x", "y", "theta", "vx", "vy", "omega", "mass"];
        let handles: Vec<Attribute> = names.iter().map(|n| registry.register(n)).collect();
        for (i, a) in handles.iter().enumerate() {
            for b in &handles[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(registry.len(), names.len());
    }

    #[test]
    fn test_registries_are_isolated() {
        let a = AttributeRegistry::new();
        let b = AttributeRegistry::new();
        assert_ne!(a.register("x"), b.register("x"));
        assert!(a.lookup("y").is_none());
    }

    #[test]
    fn test_attributes_in_registration_order() {
        let registry = AttributeRegistry::new();
        registry.register("b");
        registry.register("a");
        let names: Vec<String> = registry
            .attributes()
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_concurrent_registration_issues_one_handle() {
        let registry = Arc::new(AttributeRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    (0..100)
                        .map(|i| registry.register(&format!("attr{}", i % 10)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<Vec<Attribute>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(registry.len(), 10);
        for result in &results[1..] {
            assert_eq!(result, &results[0]);
        }
    }
}
