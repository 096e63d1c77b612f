//! Component and assembly model
//!
//! This module provides, leaves first:
//! - The attribute registry and attribute handles
//! - Immutable component states and their builders
//! - Attribute sets for each built-in component kind
//! - Components and assemblies
//! - Kind-specific views and immutable assembly snapshots

mod assembly;
mod attribute;
pub mod attributes;
mod component;
mod kinematic;
mod snapshot;
mod state;

pub use assembly::Assembly;
pub use attribute::{Attribute, AttributeRegistry};
pub use attributes::{
    AttributeSchema, DynamicBodyAttributes, Motion, Pose, SpringAttributes, SpringParameters,
    StaticBodyAttributes,
};
pub use component::{
    Component, ComponentKind, ConnectorEndpoints, DynamicBodyBuilder, SpringBuilder,
    StaticBodyBuilder,
};
pub use kinematic::{
    DynamicModel, DynamicModelBuilder, KinematicModel, ModelKind, SpringModel, SpringModelBuilder,
    StaticModel, StaticModelBuilder,
};
pub use snapshot::{AssemblySnapshot, AssemblySnapshotBuilder};
pub use state::{ComponentState, ComponentStateBuilder};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_initial_snapshot_is_idempotent() {
        let schema = AttributeSchema::standalone();
        let mut assembly = Assembly::new("assembly", Arc::clone(&schema));
        assembly
            .with_component(
                Component::static_body("wall")
                    .x(0.0)
                    .y(1.0)
                    .build(&schema)
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(
            assembly.initial_snapshot().unwrap(),
            assembly.initial_snapshot().unwrap()
        );
    }
}
