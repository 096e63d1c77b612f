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
//! # Kinematic Engine
//!
//! A kinematic state and timeline engine for small mechanical assemblies:
//! point masses, static walls and springs, advanced over time for
//! visualization and parameter exploration.
//!
//! ## Features
//!
//! - **Attribute Model**: Extensible, type-safe attributes shared by every
//!   component kind through an injectable registry
//! - **Immutable Snapshots**: Whole-assembly state at one timestamp, cheap to
//!   clone and safe to read from any thread
//! - **Timelines**: Snapshots on demand for arbitrary timestamps from a pure
//!   evolution function, with fixed-interval stepping for animation
//! - **Solvers**: Closed-form spring oscillation and numeric integration
//!   (RK4, Velocity Verlet) with force fields
//! - **Parallelization**: Optional Rayon integration for sampling many
//!   timestamps at once
//!
//! ## Example
//!
//! ```rust
//! use kinematic_engine::model::{Assembly, AttributeSchema, Component};
//! use kinematic_engine::solver::SpringOscillation;
//! use kinematic_engine::timeline::{FunctionTimeline, Timeline};
//!
//! let schema = AttributeSchema::standalone();
//! let mut assembly = Assembly::new("single circle", schema.clone());
//! assembly
//!     .with_component(Component::dynamic_body("circ").x(20.0).y(0.0).vy(-30.0).mass(10.0).build(&schema)?)?
//!     .with_component(Component::static_body("wall").x(20.0).y(100.0).build(&schema)?)?
//!     .with_component(
//!         Component::spring("spring")
//!             .stiffness(30.0)
//!             .natural_length(100.0)
//!             .component_a("wall")
//!             .component_b("circ")
//!             .build(&schema)?,
//!     )?;
//!
//! let timeline = FunctionTimeline::new(
//!     assembly.initial_snapshot()?,
//!     SpringOscillation::new("circ", "spring"),
//! );
//! let later = timeline.snapshot_at(0.5)?;
//! assert!(later.get_dynamic("circ")?.y() < 0.0);
//! # Ok::<(), kinematic_engine::Error>(())
//! ```

#![warn(missing_docs)]

/// Error type and result alias
pub mod error;

/// 2D coordinates and orthogonal coordinate systems
pub mod geometry;

/// Attributes, component states, components, assemblies and snapshots
pub mod model;

/// Timelines and evolution functions
pub mod timeline;

/// Closed-form and numeric evolution functions
pub mod solver;

/// Resolved assembly and timeline descriptions
pub mod description;

pub use error::{Error, Result};
pub use geometry::{Coordinate, CoordinateSystem};
pub use model::{
    Assembly, AssemblySnapshot, AttributeRegistry, AttributeSchema, Component, KinematicModel,
};
pub use timeline::{EvolutionFunction, FixedIntervalTimeline, FunctionTimeline, Timeline};
