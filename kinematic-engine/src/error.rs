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
//! Error types shared by every part of the engine
//!
//! All failures are construction-time or query-time programming and
//! configuration errors. None of them are transient, so nothing in the
//! engine retries; each is returned to the caller that triggered it.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by assemblies, snapshots, timelines and geometry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A component with this name is already part of the assembly
    #[error("component '{name}' is already part of the assembly")]
    DuplicateComponentName {
        /// The repeated name
        name: String,
    },

    /// A connector references a component the assembly does not contain
    #[error("connector '{connector}' references unknown component '{endpoint}'")]
    UnresolvedConnectorEndpoint {
        /// The connector being added
        connector: String,
        /// The endpoint name that could not be resolved
        endpoint: String,
    },

    /// No component with this name exists
    #[error("unknown component '{name}'")]
    UnknownComponentName {
        /// The requested name
        name: String,
    },

    /// The component state has no value for this attribute
    #[error("attribute '{attribute}' is not set")]
    AttributeNotSet {
        /// Name of the missing attribute
        attribute: String,
    },

    /// A snapshot is missing entries its consumer requires
    #[error("snapshot is missing components: {}", missing.join(", "))]
    IncompleteSnapshot {
        /// Names of the absent components
        missing: Vec<String>,
    },

    /// Coordinate system axes are not orthogonal
    #[error("coordinate system axes are not orthogonal (dot product {dot})")]
    NonOrthogonalAxes {
        /// Dot product of the two axis vectors
        dot: f64,
    },

    /// A coordinate system axis has zero length, a non-finite component or a
    /// length too large to project onto
    #[error("coordinate system axis is zero-length, non-finite or out of range")]
    DegenerateAxes,

    /// Timestamps must be finite and non-negative
    #[error("invalid timestamp {timestamp}: must be finite and non-negative")]
    InvalidTimestamp {
        /// The rejected timestamp
        timestamp: f64,
    },

    /// A component was read as a kind it is not
    #[error("component '{name}' is a {found}, expected a {expected}")]
    KindMismatch {
        /// Component name
        name: String,
        /// Requested kind
        expected: &'static str,
        /// Actual kind
        found: &'static str,
    },

    /// A required parameter was not provided
    #[error("component '{component}' is missing required parameter '{parameter}'")]
    MissingParameter {
        /// Component (or configuration section) being built
        component: String,
        /// The absent parameter
        parameter: String,
    },

    /// A numeric parameter is outside its valid range
    #[error("invalid value {value} for '{parameter}': {reason}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// The rejected value
        value: f64,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// A description was written against an incompatible schema version
    #[error("description schema version {found} is incompatible with supported version {supported}")]
    IncompatibleSchemaVersion {
        /// Version found in the description
        found: String,
        /// Version this engine supports
        supported: &'static str,
    },

    /// A description version string is not valid semver
    #[error("invalid description schema version '{version}'")]
    InvalidSchemaVersion {
        /// The unparseable version string
        version: String,
    },

    /// A fixed timeline was requested without a closed-form evolution function
    #[error("fixed timeline requires a closed-form evolution function")]
    MissingEvolutionFunction,

    /// A numeric solver produced NaN or infinite state
    #[error("state of component '{component}' became non-finite at t = {timestamp}")]
    NonFiniteState {
        /// Component whose state diverged
        component: String,
        /// Simulation time at which divergence was detected
        timestamp: f64,
    },
}

impl Error {
    pub(crate) fn unknown(name: &str) -> Self {
        Error::UnknownComponentName {
            name: name.to_string(),
        }
    }

    pub(crate) fn missing(component: &str, parameter: &str) -> Self {
        Error::MissingParameter {
            component: component.to_string(),
            parameter: parameter.to_string(),
        }
    }
}
