//! Planar geometry in the physics frame
//!
//! This module provides:
//! - `Coordinate`, a value-type 2D point/vector
//! - `CoordinateSystem`, an orthogonal frame (origin plus two axes)
//! - Frame-agnostic scalar helpers (`distance`, `are_orthogonal`, `angle_of`)
//!
//! Every operation returns a new value; nothing is mutated in place.

mod coordinate;
mod system;

pub use coordinate::{angle_of, are_orthogonal, distance, Coordinate};
pub use system::{transform, CoordinateSystem};
