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
//! Assembly construction and snapshot access
//!
//! Covers the attribute registry, component states, assembly topology
//! validation and snapshot lookups through the public API only.

use kinematic_engine::model::{
    Assembly, AttributeRegistry, AttributeSchema, Component, ComponentState, KinematicModel,
};
use kinematic_engine::Error;
use std::sync::Arc;

fn three_components() -> Assembly {
    let schema = AttributeSchema::standalone();
    let mut assembly = Assembly::new("abc", schema.clone());
    assembly
        .with_component(Component::static_body("a").x(0.0).y(0.0).build(&schema).unwrap())
        .unwrap()
        .with_component(
            Component::dynamic_body("b")
                .x(1.0)
                .y(0.0)
                .mass(2.0)
                .build(&schema)
                .unwrap(),
        )
        .unwrap()
        .with_component(
            Component::spring("c")
                .stiffness(1.0)
                .natural_length(1.0)
                .component_a("a")
                .component_b("b")
                .build(&schema)
                .unwrap(),
        )
        .unwrap();
    assembly
}

#[test]
fn test_registry_handles_are_unique_per_name() {
    let registry = AttributeRegistry::new();
    let names = ["vx", "vy", "omega", "mass", "stiffness"];
    let handles: Vec<_> = names.iter().map(|n| registry.register(n)).collect();
    for (i, a) in handles.iter().enumerate() {
        for b in &handles[i + 1..] {
            assert_ne!(a, b);
        }
    }
    for (name, handle) in names.iter().zip(&handles) {
        assert_eq!(&registry.register(name), handle);
    }
    assert_eq!(registry.len(), names.len());
}

#[test]
fn test_isolated_registries_do_not_share_handles() {
    let first = AttributeRegistry::new();
    let second = AttributeRegistry::new();
    assert_ne!(first.register("x"), second.register("x"));
}

#[test]
fn test_concurrent_registration_issues_one_handle() {
    let registry = Arc::new(AttributeRegistry::new());
    let handles: Vec<_> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                scope.spawn(move || registry.register("omega"))
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });
    assert!(handles.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_component_state_reads_what_was_set() {
    let registry = AttributeRegistry::new();
    let (x, y, radius) = (
        registry.register("x"),
        registry.register("y"),
        registry.register("radius"),
    );
    let state = ComponentState::builder()
        .set(x.clone(), 1.0)
        .set(y.clone(), 2.0)
        .set(x.clone(), 3.0)
        .build();
    assert_eq!(state.get(&x), Ok(3.0));
    assert_eq!(state.get(&y), Ok(2.0));
    assert_eq!(
        state.get(&radius),
        Err(Error::AttributeNotSet {
            attribute: "radius".to_string()
        })
    );
}

#[test]
fn test_snapshot_lookup() {
    let snapshot = three_components().initial_snapshot().unwrap();
    for name in ["a", "b", "c"] {
        assert!(snapshot.get(name).is_ok());
    }
    assert_eq!(
        snapshot.get("d").unwrap_err(),
        Error::UnknownComponentName {
            name: "d".to_string()
        }
    );
    assert!(matches!(snapshot.get("a").unwrap(), KinematicModel::Static(_)));
    assert_eq!(snapshot.get_dynamic("b").unwrap().mass(), 2.0);
    assert_eq!(snapshot.get_connector("c").unwrap().component_b(), "b");
}

#[test]
fn test_initial_snapshot_is_idempotent() {
    let assembly = three_components();
    let first = assembly.initial_snapshot().unwrap();
    let second = assembly.initial_snapshot().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
}

#[test]
fn test_duplicate_name_rejected() {
    let mut assembly = three_components();
    let schema = assembly.schema().clone();
    let err = assembly
        .with_component(Component::static_body("b").x(0.0).y(0.0).build(&schema).unwrap())
        .unwrap_err();
    assert_eq!(err, Error::DuplicateComponentName { name: "b".to_string() });
    assert_eq!(assembly.len(), 3);
}

#[test]
fn test_connector_before_endpoint_rejected() {
    let schema = AttributeSchema::standalone();
    let mut assembly = Assembly::new("early", schema.clone());
    assembly
        .with_component(Component::static_body("wall").x(0.0).y(0.0).build(&schema).unwrap())
        .unwrap();
    let spring = Component::spring("spring")
        .stiffness(1.0)
        .natural_length(1.0)
        .component_a("wall")
        .component_b("mass")
        .build(&schema)
        .unwrap();
    assert_eq!(
        assembly.with_component(spring).unwrap_err(),
        Error::UnresolvedConnectorEndpoint {
            connector: "spring".to_string(),
            endpoint: "mass".to_string()
        }
    );
    assert!(assembly.component("spring").is_err());
}

#[test]
fn test_renderer_access_to_missing_entry() {
    let snapshot = three_components().initial_snapshot().unwrap();
    assert!(snapshot.require("b").is_ok());
    let empty = kinematic_engine::AssemblySnapshot::default();
    assert_eq!(
        empty.require("b").unwrap_err(),
        Error::IncompleteSnapshot {
            missing: vec!["b".to_string()]
        }
    );
}

#[test]
fn test_successor_state_leaves_original_untouched() {
    let snapshot = three_components().initial_snapshot().unwrap();
    let body = snapshot.get_dynamic("b").unwrap();
    let moved = body.to_builder().x(5.0).vx(1.0).build().unwrap();
    let next = snapshot.to_builder().kinematic_model("b", moved).build();
    assert_eq!(next.get_dynamic("b").unwrap().x(), 5.0);
    assert_eq!(snapshot.get_dynamic("b").unwrap().x(), 1.0);
    assert_eq!(next.get("a").unwrap(), snapshot.get("a").unwrap());
}

#[test]
fn test_shared_schema_across_assemblies() {
    let schema = Arc::new(AttributeSchema::new(Arc::new(AttributeRegistry::new())));
    let build = |name: &str| {
        let mut assembly = Assembly::new(name, Arc::clone(&schema));
        assembly
            .with_component(
                Component::static_body("wall")
                    .x(1.0)
                    .y(2.0)
                    .attribute("width", 4.0)
                    .build(&schema)
                    .unwrap(),
            )
            .unwrap();
        assembly.initial_snapshot().unwrap()
    };
    assert_eq!(build("first"), build("second"));
    assert_eq!(
        build("first").get_static("wall").unwrap().state().get(&schema.attribute("width")),
        Ok(4.0)
    );
}
